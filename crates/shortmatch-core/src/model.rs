//! Core data model types for shortmatch.
//!
//! The canonical types (`Rule`, `ProblemDefinition`, `Verdict`) are what the
//! evaluator works on. The raw types (`RawDefinition`, `RawRule`) mirror the
//! authoring wire format and exist only at the normalization boundary.

use std::collections::BTreeMap;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One ordered matching directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Regular expression, matched anchored at the start of the submission.
    pub pattern: String,
    /// Whether a match marks the submission correct.
    #[serde(default)]
    pub is_valid: bool,
    /// Feedback shown when this rule decides the verdict. Never `Some("")`.
    #[serde(default)]
    pub feedback: Option<String>,
}

impl Rule {
    /// A non-validating rule with no feedback.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            is_valid: false,
            feedback: None,
        }
    }

    /// Mark matches of this rule as correct.
    pub fn valid(mut self) -> Self {
        self.is_valid = true;
        self
    }

    /// Attach feedback; blank text is dropped.
    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback = non_blank(Some(feedback.into()));
        self
    }
}

/// Canonical configuration for one question instance.
///
/// Built once by [`crate::normalize::normalize`] and never mutated after.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemDefinition {
    /// Display text, opaque to grading.
    #[serde(default)]
    pub header: String,
    /// Suppress per-rule and default feedback from verdicts.
    #[serde(default)]
    pub centralize: bool,
    /// Feedback used when no rule matches.
    #[serde(default)]
    pub default_feedback: Option<String>,
    /// Rules in evaluation order.
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl ProblemDefinition {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self {
            rules,
            ..Default::default()
        }
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    pub fn centralized(mut self) -> Self {
        self.centralize = true;
        self
    }

    pub fn with_default_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.default_feedback = non_blank(Some(feedback.into()));
        self
    }

    /// Whether at least one rule can mark a submission correct.
    pub fn has_valid_rule(&self) -> bool {
        self.rules.iter().any(|r| r.is_valid)
    }
}

/// Result of grading one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub is_correct: bool,
    /// `None` when centralized or when the deciding rule has no feedback.
    pub feedback: Option<String>,
    /// Always 0; reserved for partial credit.
    pub score_delta: i32,
    /// Always empty; reserved.
    pub extra_message: String,
    /// Zero-based index of the deciding rule, `None` if nothing matched.
    pub matched_rule: Option<usize>,
}

impl Verdict {
    pub(crate) fn new(
        is_correct: bool,
        feedback: Option<String>,
        matched_rule: Option<usize>,
    ) -> Self {
        Self {
            is_correct,
            feedback,
            score_delta: 0,
            extra_message: String::new(),
            matched_rule,
        }
    }
}

/// Marks whether a key was present in the raw authoring data.
///
/// The authoring form serializes checkboxes by emitting the key when checked,
/// so the *value* carries no meaning: `"centralize": false` still means
/// "checked". This type accepts any value (including `null`) as `Present` so
/// that producers cannot pass a boolean and expect it to be honored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Presence {
    #[default]
    Absent,
    Present,
}

impl Presence {
    pub fn is_present(self) -> bool {
        self == Presence::Present
    }

    pub fn is_absent(&self) -> bool {
        *self == Presence::Absent
    }
}

impl<'de> Deserialize<'de> for Presence {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        IgnoredAny::deserialize(deserializer)?;
        Ok(Presence::Present)
    }
}

impl Serialize for Presence {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bool(self.is_present())
    }
}

/// A problem definition as authored, before normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDefinition {
    #[serde(default)]
    pub header: Option<String>,
    #[serde(default, skip_serializing_if = "Presence::is_absent")]
    pub centralize: Presence,
    #[serde(default)]
    pub no_match_feedback: Option<String>,
    /// Ordinal key (string-encoded integer) to rule.
    #[serde(default)]
    pub matches: Option<BTreeMap<String, RawRule>>,
}

/// One match entry as authored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRule {
    #[serde(default)]
    pub regex: Option<String>,
    #[serde(default, skip_serializing_if = "Presence::is_absent")]
    pub valid: Presence,
    #[serde(default)]
    pub feedback: Option<String>,
}

/// Drop empty or whitespace-only text.
pub(crate) fn non_blank(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}
