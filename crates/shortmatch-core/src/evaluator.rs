//! First-match-wins grading of a submission against a problem definition.
//!
//! Patterns run on the `regex` crate, whose automata-based engine matches in
//! time linear in the input; there is no backtracking blow-up to guard
//! against. Program size is capped by [`MatchOptions::size_limit`].

use regex::{Regex, RegexBuilder};

use crate::error::PatternError;
use crate::model::{ProblemDefinition, Verdict};

/// Default cap on a compiled pattern's program size, in bytes.
pub const DEFAULT_SIZE_LIMIT: usize = 1 << 20;

/// Options applied when compiling rule patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    /// Maximum compiled program size; larger patterns are a `PatternError`.
    pub size_limit: usize,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            size_limit: DEFAULT_SIZE_LIMIT,
        }
    }
}

/// Grade `submission` against `definition` with default options.
///
/// Rules are tried in order and the first match decides; later rules are
/// never compiled or run. A rule whose pattern does not compile aborts the
/// evaluation with a [`PatternError`] carrying its index.
pub fn evaluate(
    definition: &ProblemDefinition,
    submission: &str,
) -> Result<Verdict, PatternError> {
    evaluate_with(definition, submission, &MatchOptions::default())
}

/// Like [`evaluate`], with explicit compile options.
pub fn evaluate_with(
    definition: &ProblemDefinition,
    submission: &str,
    options: &MatchOptions,
) -> Result<Verdict, PatternError> {
    for (index, rule) in definition.rules.iter().enumerate() {
        let regex = compile_rule(index, &rule.pattern, options)?;
        if matches_at_start(&regex, submission) {
            return Ok(decide(definition, Some(index)));
        }
    }
    Ok(decide(definition, None))
}

/// A definition with every pattern compiled up front.
///
/// Evaluation through this type cannot fail, and the value is `Send + Sync`
/// so one instance can be shared by any number of grading workers.
#[derive(Debug, Clone)]
pub struct CompiledDefinition {
    definition: ProblemDefinition,
    patterns: Vec<Regex>,
}

impl CompiledDefinition {
    /// Compile all rule patterns, failing on the first one that is invalid.
    pub fn compile(
        definition: &ProblemDefinition,
        options: &MatchOptions,
    ) -> Result<Self, PatternError> {
        let patterns = definition
            .rules
            .iter()
            .enumerate()
            .map(|(index, rule)| compile_rule(index, &rule.pattern, options))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            definition: definition.clone(),
            patterns,
        })
    }

    pub fn definition(&self) -> &ProblemDefinition {
        &self.definition
    }

    /// Grade one submission. Same semantics as [`evaluate`].
    pub fn evaluate(&self, submission: &str) -> Verdict {
        let matched = self
            .patterns
            .iter()
            .position(|regex| matches_at_start(regex, submission));
        decide(&self.definition, matched)
    }
}

/// Compile one rule's pattern.
pub fn compile_rule(
    index: usize,
    pattern: &str,
    options: &MatchOptions,
) -> Result<Regex, PatternError> {
    RegexBuilder::new(pattern)
        .size_limit(options.size_limit)
        .build()
        .map_err(|e| PatternError {
            index,
            pattern: pattern.to_string(),
            message: e.to_string(),
        })
}

/// True when some match of `regex` begins at offset 0.
///
/// The leftmost match starts at 0 exactly when any match does, so this is
/// an anchored-at-start test without rewriting the author's pattern.
fn matches_at_start(regex: &Regex, haystack: &str) -> bool {
    regex.find(haystack).is_some_and(|m| m.start() == 0)
}

fn decide(definition: &ProblemDefinition, matched: Option<usize>) -> Verdict {
    let (is_correct, feedback) = match matched {
        Some(index) => {
            let rule = &definition.rules[index];
            (rule.is_valid, rule.feedback.as_ref())
        }
        None => (false, definition.default_feedback.as_ref()),
    };

    tracing::debug!(?matched, is_correct, "graded submission");

    let feedback = if definition.centralize {
        None
    } else {
        feedback.cloned()
    };
    Verdict::new(is_correct, feedback, matched)
}
