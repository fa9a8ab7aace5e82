//! Grade report types with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::ProblemDefinition;
use crate::results::GradedSubmission;
use crate::statistics::GradeStats;

/// A complete batch grading report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Summary of the graded definition.
    pub definition: DefinitionSummary,
    /// Per-submission results, in submission order.
    pub results: Vec<GradedSubmission>,
    /// Submissions that could not be graded.
    #[serde(default)]
    pub failed: Vec<String>,
    /// Aggregate statistics.
    pub stats: GradeStats,
    /// Total wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

/// Summary of a definition (without its rule bodies).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefinitionSummary {
    pub header: String,
    pub rule_count: usize,
    pub centralize: bool,
}

impl From<&ProblemDefinition> for DefinitionSummary {
    fn from(definition: &ProblemDefinition) -> Self {
        Self {
            header: definition.header.clone(),
            rule_count: definition.rules.len(),
            centralize: definition.centralize,
        }
    }
}

impl GradeReport {
    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: GradeReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}
