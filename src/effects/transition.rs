//! Actions accepted by the transition engine and the errors it reports.

use crate::core::{Cursor, Field, RawData, Step};
use crate::enforcement::ViolationError;
use serde::{Deserialize, Serialize};

/// Everything that can change a `FormState`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Action {
    /// Archive the answer for `step` and advance past it.
    SubmitStep {
        question: String,
        answer_summary: String,
        step: Step,
        raw: RawData,
    },

    /// Reopen an answered step, discarding it and every later answer.
    EditStep(Step),

    /// Move the cursor without touching the ledger (navigation sync).
    SetStep(Step),

    /// Overwrite one field while the user types.
    SetField { field: Field, value: String },
}

impl Action {
    pub fn set_field(field: Field, value: impl Into<String>) -> Self {
        Action::SetField {
            field,
            value: value.into(),
        }
    }

    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SubmitStep { .. } => "submit-step",
            Self::EditStep(_) => "edit-step",
            Self::SetStep(_) => "set-step",
            Self::SetField { .. } => "set-field",
        }
    }
}

/// Errors that can occur during transitions
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransitionError {
    #[error("Step '{submitted}' submitted while '{expected}' is awaiting an answer")]
    OutOfOrder { expected: Step, submitted: Step },

    #[error("Step '{0}' submitted after the flow completed")]
    FlowComplete(Step),

    #[error("Step '{0}' cannot be edited before it has been answered")]
    NotAnswered(Step),

    #[error("Step '{step}' is beyond the first unanswered step '{frontier}'")]
    Unreachable { step: Step, frontier: Cursor },

    #[error("Submission of '{step}' rejected: {}", join_violations(.violations))]
    Rejected {
        step: Step,
        violations: Vec<ViolationError>,
    },
}

fn join_violations(violations: &[ViolationError]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
