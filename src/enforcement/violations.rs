//! Submission violations.

use crate::core::Step;
use thiserror::Error;

/// Reasons a step submission may not go ahead
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ViolationError {
    #[error("Step '{submitted}' is not the step awaiting an answer ('{expected}')")]
    StepMismatch { expected: Step, submitted: Step },

    #[error("The flow is already complete")]
    FlowComplete,

    #[error("The answer for '{step}' is incomplete")]
    AnswerIncomplete { step: Step },

    #[error("Custom check failed: {message}")]
    CustomCheckFailed { message: String },
}
