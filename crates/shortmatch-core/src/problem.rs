//! The `regex_short_answer` problem type as a host sees it.
//!
//! Wraps a normalized definition with the problem id, answers the host's
//! consistency and grading questions, and renders views through the
//! capability traits.

use std::collections::HashMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::error::{GradeError, ValidationError};
use crate::evaluator::{evaluate_with, MatchOptions};
use crate::model::{ProblemDefinition, RawDefinition, Verdict};
use crate::normalize::normalize;
use crate::traits::{RenderParams, Renderer, Translator};

/// Problem type identifier registered with the host.
pub const PROBLEM_TYPE: &str = "regex_short_answer";

/// View rendered for learners.
pub const INPUT_VIEW: &str = "tasks/regex_short_answer.html";
/// View rendered in the authoring editor.
pub const EDITBOX_VIEW: &str = "course_admin/subproblems/regex_short_answer.html";
/// Row templates used by the authoring editor.
pub const EDITBOX_TEMPLATES_VIEW: &str =
    "course_admin/subproblems/regex_short_answer_templates.html";

/// Which raw fields hold translatable text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextFields {
    pub header: bool,
    pub no_match_feedback: bool,
    /// Per-match fields: `regex` and `feedback`.
    pub matches: MatchTextFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchTextFields {
    pub regex: bool,
    pub feedback: bool,
}

/// One regex short-answer problem inside a task.
#[derive(Debug, Clone)]
pub struct RegexShortAnswerProblem {
    id: String,
    definition: ProblemDefinition,
    options: MatchOptions,
}

impl RegexShortAnswerProblem {
    pub fn new(id: impl Into<String>, definition: ProblemDefinition) -> Self {
        Self {
            id: id.into(),
            definition,
            options: MatchOptions::default(),
        }
    }

    /// Normalize raw authored content and wrap it.
    pub fn from_raw(id: impl Into<String>, raw: RawDefinition) -> Result<Self, ValidationError> {
        Ok(Self::new(id, normalize(raw)?))
    }

    pub fn with_options(mut self, options: MatchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn definition(&self) -> &ProblemDefinition {
        &self.definition
    }

    pub fn problem_type(&self) -> &'static str {
        PROBLEM_TYPE
    }

    /// The task input carries an answer for this problem.
    pub fn input_is_consistent(&self, task_input: &HashMap<String, String>) -> bool {
        task_input.contains_key(&self.id)
    }

    /// Grade this problem's answer out of a whole task input.
    pub fn check_answer(
        &self,
        task_input: &HashMap<String, String>,
    ) -> Result<Verdict, GradeError> {
        let answer = task_input
            .get(&self.id)
            .ok_or_else(|| GradeError::MissingInput {
                problem_id: self.id.clone(),
            })?;
        let verdict = evaluate_with(&self.definition, answer, &self.options)?;
        tracing::debug!(problem = %self.id, is_correct = verdict.is_correct, "checked answer");
        Ok(verdict)
    }

    pub fn text_fields() -> TextFields {
        TextFields {
            header: true,
            no_match_feedback: true,
            matches: MatchTextFields {
                regex: true,
                feedback: true,
            },
        }
    }

    /// Render the learner input box with the translated header.
    pub fn show_input(
        &self,
        renderer: &dyn Renderer,
        translator: &dyn Translator,
        language: &str,
    ) -> Result<String> {
        let mut params = RenderParams::new();
        params.insert("pid".into(), self.id.clone());
        params.insert(
            "header".into(),
            translator.translate(&self.definition.header, language),
        );
        renderer.render(INPUT_VIEW, &params)
    }

    /// Render the authoring edit box for the problem at `key`.
    pub fn show_editbox(renderer: &dyn Renderer, key: &str) -> Result<String> {
        renderer.render(EDITBOX_VIEW, &key_params(key))
    }

    pub fn show_editbox_templates(renderer: &dyn Renderer, key: &str) -> Result<String> {
        renderer.render(EDITBOX_TEMPLATES_VIEW, &key_params(key))
    }
}

fn key_params(key: &str) -> RenderParams {
    let mut params = RenderParams::new();
    params.insert("key".into(), key.to_string());
    params
}
