//! Aggregate statistics over a graded batch.

use serde::{Deserialize, Serialize};

use crate::model::ProblemDefinition;
use crate::results::GradedSubmission;

/// How often one rule decided a verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleHits {
    /// Zero-based rule index.
    pub rule: usize,
    pub pattern: String,
    pub is_valid: bool,
    /// Submissions this rule decided.
    pub hits: usize,
    /// `hits / total`, 0.0 for an empty batch.
    pub share: f64,
}

/// Aggregate statistics for a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeStats {
    pub total: usize,
    pub correct: usize,
    /// `correct / total`, 0.0 for an empty batch.
    pub accuracy: f64,
    /// Submissions no rule matched.
    pub no_match: usize,
    /// One entry per rule, in rule order, including rules never hit.
    pub rule_hits: Vec<RuleHits>,
}

impl GradeStats {
    /// Rules that decided no submission.
    pub fn unused_rules(&self) -> impl Iterator<Item = &RuleHits> {
        self.rule_hits.iter().filter(|r| r.hits == 0)
    }
}

fn ratio(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

/// Compute statistics for graded submissions against their definition.
pub fn compute_grade_stats(
    results: &[GradedSubmission],
    definition: &ProblemDefinition,
) -> GradeStats {
    let total = results.len();
    let correct = results.iter().filter(|r| r.verdict.is_correct).count();

    let mut hits = vec![0usize; definition.rules.len()];
    let mut no_match = 0usize;
    for result in results {
        match result.verdict.matched_rule {
            Some(index) if index < hits.len() => hits[index] += 1,
            Some(index) => {
                tracing::warn!(
                    submission = %result.submission_id,
                    "verdict names rule {index} but definition has {} rules",
                    hits.len()
                );
            }
            None => no_match += 1,
        }
    }

    let rule_hits = definition
        .rules
        .iter()
        .zip(hits)
        .enumerate()
        .map(|(index, (rule, hits))| RuleHits {
            rule: index,
            pattern: rule.pattern.clone(),
            is_valid: rule.is_valid,
            hits,
            share: ratio(hits, total),
        })
        .collect();

    GradeStats {
        total,
        correct,
        accuracy: ratio(correct, total),
        no_match,
        rule_hits,
    }
}
