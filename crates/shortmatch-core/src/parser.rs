//! Definition file parser.
//!
//! Loads raw problem definitions from JSON or TOML files and directories,
//! normalizes them, and lints them for authoring mistakes.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::evaluator::{compile_rule, MatchOptions};
use crate::model::{ProblemDefinition, RawDefinition};
use crate::normalize::normalize;
use crate::results::Submission;

/// On-disk encodings of a raw definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionFormat {
    Json,
    Toml,
}

impl DefinitionFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl fmt::Display for DefinitionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefinitionFormat::Json => write!(f, "json"),
            DefinitionFormat::Toml => write!(f, "toml"),
        }
    }
}

impl FromStr for DefinitionFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(DefinitionFormat::Json),
            "toml" => Ok(DefinitionFormat::Toml),
            other => Err(format!("unknown definition format: {other}")),
        }
    }
}

/// Parse a single definition file.
pub fn parse_definition(path: &Path) -> Result<ProblemDefinition> {
    let format = DefinitionFormat::from_path(path).with_context(|| {
        format!(
            "cannot tell definition format from extension: {}",
            path.display()
        )
    })?;

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read definition file: {}", path.display()))?;

    parse_definition_str(&content, format, path)
}

/// Parse definition text (useful for testing).
pub fn parse_definition_str(
    content: &str,
    format: DefinitionFormat,
    source_path: &Path,
) -> Result<ProblemDefinition> {
    let raw: RawDefinition = match format {
        DefinitionFormat::Json => serde_json::from_str(content)
            .with_context(|| format!("failed to parse JSON: {}", source_path.display()))?,
        DefinitionFormat::Toml => toml::from_str(content)
            .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?,
    };

    normalize(raw).with_context(|| format!("invalid definition: {}", source_path.display()))
}

/// Outcome of walking a definition directory.
#[derive(Debug, Default)]
pub struct DefinitionScan {
    /// Definitions that parsed and normalized.
    pub loaded: Vec<(PathBuf, ProblemDefinition)>,
    /// Definition files that failed, with the reason.
    pub failed: Vec<(PathBuf, anyhow::Error)>,
}

/// Recursively parse every `.json` / `.toml` definition under a directory,
/// keeping per-file failures instead of stopping at the first one.
pub fn scan_definition_directory(dir: &Path) -> Result<DefinitionScan> {
    let mut scan = DefinitionScan::default();
    scan_into(dir, &mut scan)?;
    Ok(scan)
}

fn scan_into(dir: &Path, scan: &mut DefinitionScan) -> Result<()> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            scan_into(&path, scan)?;
        } else if DefinitionFormat::from_path(&path).is_some() {
            match parse_definition(&path) {
                Ok(definition) => scan.loaded.push((path, definition)),
                Err(e) => scan.failed.push((path, e)),
            }
        }
    }

    Ok(())
}

/// Recursively load every `.json` / `.toml` definition under a directory.
///
/// Files that fail to parse are skipped with a warning.
pub fn load_definition_directory(dir: &Path) -> Result<Vec<(PathBuf, ProblemDefinition)>> {
    let scan = scan_definition_directory(dir)?;
    for (path, e) in &scan.failed {
        tracing::warn!("skipping {}: {:#}", path.display(), e);
    }
    Ok(scan.loaded)
}

/// Load submissions from a JSON array or JSON Lines file.
pub fn load_submissions(path: &Path) -> Result<Vec<Submission>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read submissions: {}", path.display()))?;
    parse_submissions_str(&content)
        .with_context(|| format!("failed to parse submissions: {}", path.display()))
}

/// Parse submissions text: a JSON array, or one JSON object per line.
pub fn parse_submissions_str(content: &str) -> Result<Vec<Submission>> {
    if content.trim_start().starts_with('[') {
        return Ok(serde_json::from_str(content)?);
    }

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            serde_json::from_str(line).with_context(|| format!("line {}", n + 1))
        })
        .collect()
}

/// A warning from definition linting.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// Index of the rule concerned, if any.
    pub rule: Option<usize>,
    /// Warning message.
    pub message: String,
}

/// Lint a normalized definition for authoring mistakes.
///
/// Nothing here changes grading; these are hints for the author.
pub fn validate_definition(
    definition: &ProblemDefinition,
    options: &MatchOptions,
) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    for (index, rule) in definition.rules.iter().enumerate() {
        if let Err(e) = compile_rule(index, &rule.pattern, options) {
            warnings.push(ValidationWarning {
                rule: Some(index),
                message: e.to_string(),
            });
        }
    }

    // An identical earlier pattern always wins first.
    for (index, rule) in definition.rules.iter().enumerate() {
        if let Some(first) = definition.rules[..index]
            .iter()
            .position(|earlier| earlier.pattern == rule.pattern)
        {
            warnings.push(ValidationWarning {
                rule: Some(index),
                message: format!("pattern is identical to rule {first} and can never match"),
            });
        }
    }

    if !definition.has_valid_rule() {
        warnings.push(ValidationWarning {
            rule: None,
            message: "no rule is marked valid, so no answer can be correct".into(),
        });
    }

    if definition.centralize {
        for (index, rule) in definition.rules.iter().enumerate() {
            if rule.feedback.is_some() {
                warnings.push(ValidationWarning {
                    rule: Some(index),
                    message: "feedback is never shown because feedback is centralized".into(),
                });
            }
        }
        if definition.default_feedback.is_some() {
            warnings.push(ValidationWarning {
                rule: None,
                message: "no_match_feedback is never shown because feedback is centralized"
                    .into(),
            });
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_JSON: &str = r#"{
        "header": "What is the capital of France?",
        "no_match_feedback": "Think about the Eiffel Tower.",
        "matches": {
            "1": {"regex": "(?i)paris\\s*$", "valid": "on", "feedback": "Correct!"},
            "2": {"regex": "(?i)lyon", "feedback": "That is a French city, but not the capital."}
        }
    }"#;

    const VALID_TOML: &str = r#"
header = "Name a prime below 10"

[matches.10]
regex = "[2357]$"
valid = true

[matches.2]
regex = "[0-9]+$"
feedback = "That number is not prime."
"#;

    #[test]
    fn parse_valid_json() {
        let def =
            parse_definition_str(VALID_JSON, DefinitionFormat::Json, Path::new("capital.json"))
                .unwrap();
        assert_eq!(def.header, "What is the capital of France?");
        assert_eq!(def.rules.len(), 2);
        assert!(def.rules[0].is_valid);
        assert!(!def.rules[1].is_valid);
        assert_eq!(
            def.default_feedback.as_deref(),
            Some("Think about the Eiffel Tower.")
        );
    }

    #[test]
    fn parse_valid_toml_orders_numerically() {
        let def = parse_definition_str(VALID_TOML, DefinitionFormat::Toml, Path::new("p.toml"))
            .unwrap();
        assert_eq!(def.rules[0].pattern, "[0-9]+$");
        assert_eq!(def.rules[1].pattern, "[2357]$");
    }

    #[test]
    fn parse_malformed_json() {
        let result = parse_definition_str("{ not json", DefinitionFormat::Json, Path::new("x"));
        assert!(result.is_err());
    }

    #[test]
    fn normalization_error_is_reported() {
        let err = parse_definition_str(
            r#"{"matches": {"one": {"regex": "a"}}}"#,
            DefinitionFormat::Json,
            Path::new("bad.json"),
        )
        .unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("bad.json"));
        assert!(msg.contains("'one' is not an integer"));
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(
            DefinitionFormat::from_path(Path::new("a/b.JSON")),
            Some(DefinitionFormat::Json)
        );
        assert_eq!(
            DefinitionFormat::from_path(Path::new("b.toml")),
            Some(DefinitionFormat::Toml)
        );
        assert_eq!(DefinitionFormat::from_path(Path::new("b.yaml")), None);
    }

    #[test]
    fn unknown_extension_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("def.yaml");
        std::fs::write(&path, "header: x").unwrap();
        assert!(parse_definition(&path).is_err());
    }

    #[test]
    fn load_directory_skips_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.json"), VALID_JSON).unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested/b.toml"), VALID_TOML).unwrap();
        std::fs::write(dir.path().join("broken.json"), "{").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let defs = load_definition_directory(dir.path()).unwrap();
        assert_eq!(defs.len(), 2);
        assert!(defs.iter().any(|(p, _)| p.ends_with("a.json")));
        assert!(defs.iter().any(|(p, _)| p.ends_with("b.toml")));
    }

    #[test]
    fn scan_directory_keeps_failures() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.json"), VALID_JSON).unwrap();
        std::fs::write(
            dir.path().join("bad.json"),
            r#"{"matches": {"first": {"regex": "a"}}}"#,
        )
        .unwrap();

        let scan = scan_definition_directory(dir.path()).unwrap();
        assert_eq!(scan.loaded.len(), 1);
        assert_eq!(scan.failed.len(), 1);
        let (path, err) = &scan.failed[0];
        assert!(path.ends_with("bad.json"));
        assert!(format!("{err:#}").contains("'first' is not an integer"));
    }

    #[test]
    fn load_directory_rejects_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.json");
        std::fs::write(&path, VALID_JSON).unwrap();
        assert!(load_definition_directory(&path).is_err());
    }

    #[test]
    fn parse_submissions_array() {
        let subs =
            parse_submissions_str(r#"[{"id": "a", "answer": "x"}, {"id": "b", "answer": ""}]"#)
                .unwrap();
        assert_eq!(subs, vec![Submission::new("a", "x"), Submission::new("b", "")]);
    }

    #[test]
    fn parse_submissions_json_lines() {
        let subs = parse_submissions_str(
            "{\"id\": \"a\", \"answer\": \"x\"}\n\n{\"id\": \"b\", \"answer\": \"y\"}\n",
        )
        .unwrap();
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[1].answer, "y");
    }

    #[test]
    fn parse_submissions_reports_bad_line() {
        let err = parse_submissions_str("{\"id\": \"a\", \"answer\": \"x\"}\n{oops}\n")
            .unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
    }

    #[test]
    fn load_submissions_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subs.jsonl");
        std::fs::write(&path, "{\"id\": \"a\", \"answer\": \"x\"}\n").unwrap();
        assert_eq!(load_submissions(&path).unwrap().len(), 1);
    }

    #[test]
    fn validate_clean_definition() {
        let def =
            parse_definition_str(VALID_JSON, DefinitionFormat::Json, Path::new("capital.json"))
                .unwrap();
        assert!(validate_definition(&def, &MatchOptions::default()).is_empty());
    }

    #[test]
    fn validate_reports_bad_and_shadowed_patterns() {
        let def = parse_definition_str(
            r#"{"matches": {
                "0": {"regex": "a", "valid": true},
                "1": {"regex": "(", "valid": true},
                "2": {"regex": "a"}
            }}"#,
            DefinitionFormat::Json,
            Path::new("x.json"),
        )
        .unwrap();
        let warnings = validate_definition(&def, &MatchOptions::default());
        assert!(warnings
            .iter()
            .any(|w| w.rule == Some(1) && w.message.contains("invalid pattern")));
        assert!(warnings
            .iter()
            .any(|w| w.rule == Some(2) && w.message.contains("identical to rule 0")));
    }

    #[test]
    fn validate_reports_missing_valid_rule() {
        let def = parse_definition_str(
            r#"{"matches": {"0": {"regex": "a"}}}"#,
            DefinitionFormat::Json,
            Path::new("x.json"),
        )
        .unwrap();
        let warnings = validate_definition(&def, &MatchOptions::default());
        assert!(warnings.iter().any(|w| w.message.contains("no rule is marked valid")));
    }

    #[test]
    fn validate_reports_hidden_feedback_when_centralized() {
        let def = parse_definition_str(
            r#"{"centralize": "on", "no_match_feedback": "nope",
                "matches": {"0": {"regex": "a", "valid": 1, "feedback": "yes"}}}"#,
            DefinitionFormat::Json,
            Path::new("x.json"),
        )
        .unwrap();
        let warnings = validate_definition(&def, &MatchOptions::default());
        assert_eq!(
            warnings
                .iter()
                .filter(|w| w.message.contains("centralized"))
                .count(),
            2
        );
    }
}
