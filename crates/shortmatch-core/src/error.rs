//! Error types for normalization and evaluation.
//!
//! Both kinds are terminal for the operation that raised them. Neither is
//! ever folded into a "neutral" verdict: a caller always receives a real
//! verdict or one of these.

use thiserror::Error;

/// A raw definition could not be turned into a `ProblemDefinition`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A `matches` key did not parse as an integer.
    #[error("match ordinal '{key}' is not an integer")]
    InvalidOrdinal { key: String },

    /// Two `matches` keys share the same numeric value (e.g. "1" and "01").
    #[error("match ordinal {ordinal} appears more than once")]
    DuplicateOrdinal { ordinal: i64 },

    /// A match entry carries no `regex`.
    #[error("match {ordinal} has no regex")]
    MissingPattern { ordinal: i64 },
}

/// A rule's pattern could not be compiled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("rule {index} has an invalid pattern '{pattern}': {message}")]
pub struct PatternError {
    /// Zero-based position of the rule in the definition.
    pub index: usize,
    /// The offending pattern, as authored.
    pub pattern: String,
    /// Compiler diagnostic.
    pub message: String,
}

/// Errors from grading a task input through a problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GradeError {
    /// The task input has no entry for this problem.
    #[error("task input has no answer for problem '{problem_id}'")]
    MissingInput { problem_id: String },

    #[error(transparent)]
    Pattern(#[from] PatternError),
}
