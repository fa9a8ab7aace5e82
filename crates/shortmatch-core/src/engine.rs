//! Batch grading engine.
//!
//! Compiles a definition once and grades many submissions against it
//! concurrently, bounded by a semaphore.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::config::ShortmatchConfig;
use crate::evaluator::{CompiledDefinition, MatchOptions};
use crate::model::ProblemDefinition;
use crate::report::{DefinitionSummary, GradeReport};
use crate::results::{GradedSubmission, Submission};
use crate::statistics::compute_grade_stats;

/// Configuration for the grading engine.
#[derive(Debug, Clone)]
pub struct GradingEngineConfig {
    /// Maximum concurrent gradings.
    pub parallelism: usize,
    /// Pattern compile options.
    pub match_options: MatchOptions,
}

impl Default for GradingEngineConfig {
    fn default() -> Self {
        Self {
            parallelism: 4,
            match_options: MatchOptions::default(),
        }
    }
}

impl From<&ShortmatchConfig> for GradingEngineConfig {
    fn from(config: &ShortmatchConfig) -> Self {
        Self {
            parallelism: config.parallelism,
            match_options: config.match_options(),
        }
    }
}

/// Progress reporting trait.
pub trait ProgressReporter: Send + Sync {
    fn on_grade_complete(&self, result: &GradedSubmission);
    fn on_grade_error(&self, submission_id: &str, error: &str);
    fn on_batch_complete(&self, total: usize, graded: usize, failed: usize, elapsed: Duration);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_grade_complete(&self, _: &GradedSubmission) {}
    fn on_grade_error(&self, _: &str, _: &str) {}
    fn on_batch_complete(&self, _: usize, _: usize, _: usize, _: Duration) {}
}

/// The batch grading engine.
pub struct GradingEngine {
    config: GradingEngineConfig,
}

impl GradingEngine {
    pub fn new(config: GradingEngineConfig) -> Self {
        Self { config }
    }

    /// Grade every submission against `definition`.
    ///
    /// A pattern that fails to compile aborts the whole run before any
    /// submission is graded. Results come back in submission order.
    pub async fn run(
        &self,
        definition: &ProblemDefinition,
        submissions: &[Submission],
        progress: &dyn ProgressReporter,
    ) -> Result<GradeReport> {
        anyhow::ensure!(
            self.config.parallelism >= 1,
            "parallelism must be at least 1"
        );

        let start = Instant::now();
        let run_id = Uuid::new_v4();
        let compiled = Arc::new(
            CompiledDefinition::compile(definition, &self.config.match_options)
                .context("failed to compile definition")?,
        );
        let semaphore = Arc::new(Semaphore::new(self.config.parallelism));

        tracing::info!(
            %run_id,
            submissions = submissions.len(),
            rules = definition.rules.len(),
            parallelism = self.config.parallelism,
            "starting batch"
        );

        let mut futures = FuturesUnordered::new();

        for (position, submission) in submissions.iter().enumerate() {
            let compiled = Arc::clone(&compiled);
            let semaphore = Arc::clone(&semaphore);
            let submission = submission.clone();

            futures.push(async move {
                let submission_id = submission.id.clone();
                let inner = async move {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .map_err(|_| anyhow::anyhow!("semaphore closed"))?;

                    tokio::task::spawn_blocking(move || {
                        let grade_start = Instant::now();
                        let verdict = compiled.evaluate(&submission.answer);
                        GradedSubmission {
                            submission_id: submission.id,
                            answer: submission.answer,
                            verdict,
                            duration_us: grade_start.elapsed().as_micros() as u64,
                        }
                    })
                    .await
                    .context("grading task did not complete")
                };
                (position, submission_id, inner.await)
            });
        }

        let total = futures.len();
        let mut graded = Vec::with_capacity(total);
        let mut failed = Vec::new();

        while let Some((position, submission_id, result)) = futures.next().await {
            match result {
                Ok(result) => {
                    progress.on_grade_complete(&result);
                    graded.push((position, result));
                }
                Err(e) => {
                    tracing::error!("grading failed for {submission_id}: {e:#}");
                    progress.on_grade_error(&submission_id, &e.to_string());
                    failed.push(submission_id);
                }
            }
        }

        graded.sort_by_key(|(position, _)| *position);
        let results: Vec<GradedSubmission> = graded.into_iter().map(|(_, r)| r).collect();

        let elapsed = start.elapsed();
        progress.on_batch_complete(total, results.len(), failed.len(), elapsed);

        let stats = compute_grade_stats(&results, definition);

        Ok(GradeReport {
            id: run_id,
            created_at: chrono::Utc::now(),
            definition: DefinitionSummary::from(definition),
            results,
            failed,
            stats,
            duration_ms: elapsed.as_millis() as u64,
        })
    }
}
