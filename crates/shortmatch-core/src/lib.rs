//! shortmatch-core — Rule normalization and first-match regex grading.
//!
//! A problem definition is authored as a loose key/value document, normalized
//! once into an ordered rule list, and then used to grade any number of
//! free-text submissions. The first rule whose pattern matches at the start of
//! the answer decides the verdict.

pub mod config;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod model;
pub mod normalize;
pub mod parser;
pub mod problem;
pub mod report;
pub mod results;
pub mod statistics;
pub mod traits;

pub use error::{GradeError, PatternError, ValidationError};
pub use evaluator::{evaluate, evaluate_with, CompiledDefinition, MatchOptions};
pub use model::{ProblemDefinition, RawDefinition, RawRule, Rule, Verdict};
pub use normalize::normalize;
