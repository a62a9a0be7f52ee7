//! Build errors for flow and step definitions.

use crate::core::Step;
use thiserror::Error;

/// Errors that can occur when building a flow or a step definition.
#[derive(Debug, Error, PartialEq)]
pub enum BuildError {
    #[error("Step not specified. Call .step(step) before .build()")]
    MissingStep,

    #[error("Question for '{0}' not specified. Call .question(text)")]
    MissingQuestion(Step),

    #[error("Guard for '{0}' not specified. Call .guard(guard) or .when(predicate)")]
    MissingGuard(Step),

    #[error("Step '{0}' collects no fields. Call .field(field)")]
    NoFields(Step),

    #[error("Step '{0}' is defined more than once")]
    DuplicateStep(Step),

    #[error("Flow has no definition for step '{0}'")]
    UndefinedStep(Step),
}
