//! Capability traits for the presentation layer.
//!
//! Grading never touches these. They let a host plug its own templating and
//! localization into [`crate::problem::RegexShortAnswerProblem`] without the
//! core depending on any presentation technology.

use std::collections::BTreeMap;

/// Named parameters passed to a view.
pub type RenderParams = BTreeMap<String, String>;

/// Renders a named view with parameters into markup.
pub trait Renderer: Send + Sync {
    /// Render `view` (e.g. "tasks/regex_short_answer.html").
    fn render(&self, view: &str, params: &RenderParams) -> anyhow::Result<String>;
}

/// Translates authored text into a display language.
pub trait Translator: Send + Sync {
    fn translate(&self, text: &str, language: &str) -> String;
}

/// Returns text unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTranslator;

impl Translator for IdentityTranslator {
    fn translate(&self, text: &str, _language: &str) -> String {
        text.to_string()
    }
}
