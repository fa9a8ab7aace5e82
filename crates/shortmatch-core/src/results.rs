//! Submission and graded-submission types.

use serde::{Deserialize, Serialize};

use crate::model::Verdict;

/// One learner answer to grade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    /// Caller-chosen identifier (learner, attempt, ...).
    pub id: String,
    /// The raw answer text.
    pub answer: String,
}

impl Submission {
    pub fn new(id: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            answer: answer.into(),
        }
    }
}

/// The verdict for one submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradedSubmission {
    pub submission_id: String,
    pub answer: String,
    pub verdict: Verdict,
    /// Time spent matching, in microseconds.
    pub duration_us: u64,
}
