//! The `shortmatch batch` command.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

use shortmatch_core::config::load_config_from;
use shortmatch_core::engine::{GradingEngine, GradingEngineConfig, ProgressReporter};
use shortmatch_core::parser;
use shortmatch_core::report::GradeReport;
use shortmatch_core::results::GradedSubmission;

/// Console progress reporter.
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_grade_complete(&self, result: &GradedSubmission) {
        let icon = if result.verdict.is_correct {
            "OK"
        } else {
            "WRONG"
        };
        tracing::debug!("  Graded: {} [{icon}]", result.submission_id);
    }

    fn on_grade_error(&self, submission_id: &str, error: &str) {
        eprintln!("  ERROR: {submission_id}: {error}");
    }

    fn on_batch_complete(&self, total: usize, graded: usize, failed: usize, elapsed: Duration) {
        eprintln!(
            "\nComplete: {graded}/{total} graded, {failed} failed ({:.1}s)",
            elapsed.as_secs_f64()
        );
    }
}

pub async fn execute(
    definition_path: PathBuf,
    submissions_path: PathBuf,
    parallelism: Option<usize>,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let mut config = load_config_from(config_path.as_deref())?;
    if let Some(parallelism) = parallelism {
        anyhow::ensure!(parallelism >= 1, "parallelism must be at least 1");
        config.parallelism = parallelism;
    }
    let output = output.unwrap_or_else(|| config.output_dir.clone());

    let definition = parser::parse_definition(&definition_path)?;
    let submissions = parser::load_submissions(&submissions_path)?;

    eprintln!(
        "shortmatch v{} — Grading {} submissions against {} rules",
        env!("CARGO_PKG_VERSION"),
        submissions.len(),
        definition.rules.len()
    );

    let engine = GradingEngine::new(GradingEngineConfig::from(&config));
    let report = engine
        .run(&definition, &submissions, &ConsoleReporter)
        .await?;

    print_summary(&report);

    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");
    let path = output.join(format!("report-{timestamp}.json"));
    report.save_json(&path)?;
    eprintln!("Results saved to: {}", path.display());

    Ok(())
}

fn print_summary(report: &GradeReport) {
    use comfy_table::{Cell, Table};

    let stats = &report.stats;

    let mut totals = Table::new();
    totals.set_header(vec!["Submissions", "Correct", "Accuracy", "No match"]);
    totals.add_row(vec![
        Cell::new(stats.total),
        Cell::new(stats.correct),
        Cell::new(format!("{:.1}%", stats.accuracy * 100.0)),
        Cell::new(stats.no_match),
    ]);

    let mut rules = Table::new();
    rules.set_header(vec!["Rule", "Pattern", "Valid", "Hits", "Share"]);
    for hit in &stats.rule_hits {
        rules.add_row(vec![
            Cell::new(hit.rule),
            Cell::new(&hit.pattern),
            Cell::new(if hit.is_valid { "yes" } else { "no" }),
            Cell::new(hit.hits),
            Cell::new(format!("{:.1}%", hit.share * 100.0)),
        ]);
    }

    eprintln!("\n{totals}");
    eprintln!("{rules}");
}
