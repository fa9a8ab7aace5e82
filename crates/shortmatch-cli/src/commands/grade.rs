//! The `shortmatch grade` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ValueEnum;

use shortmatch_core::config::load_config_from;
use shortmatch_core::{evaluate_with, parser};

/// How a verdict is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn execute(
    definition_path: PathBuf,
    answer: String,
    format: OutputFormat,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let definition = parser::parse_definition(&definition_path)?;

    let verdict = evaluate_with(&definition, &answer, &config.match_options())
        .with_context(|| format!("failed to grade against {}", definition_path.display()))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&verdict)?);
        }
        OutputFormat::Text => {
            let label = if verdict.is_correct {
                "correct"
            } else {
                "incorrect"
            };
            println!("Verdict: {label}");
            match verdict.matched_rule {
                Some(rule) => println!("Matched rule: {rule}"),
                None => println!("Matched rule: none"),
            }
            if let Some(feedback) = &verdict.feedback {
                println!("Feedback: {feedback}");
            }
        }
    }

    Ok(())
}
