//! Submission rules using Validation.

use crate::core::Cursor;
use crate::enforcement::context::SubmitContext;
use crate::enforcement::violations::ViolationError;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Type alias for validation check functions
pub type ValidationCheck =
    Box<dyn Fn(&SubmitContext<'_>) -> Validation<(), NonEmptyVec<ViolationError>> + Send + Sync>;

/// Rules checked before a step submission.
///
/// The cursor, completion and completeness checks always run; custom
/// checks are added with [`SubmitRules::require`] and
/// [`SubmitRules::require_pred`].
#[derive(Default)]
pub struct SubmitRules {
    required_checks: Vec<ValidationCheck>,
}

impl SubmitRules {
    /// Rules with only the built-in checks.
    pub fn standard() -> Self {
        Self::default()
    }

    /// Add a custom validation check
    pub fn require<F>(mut self, check: F) -> Self
    where
        F: Fn(&SubmitContext<'_>) -> Validation<(), NonEmptyVec<ViolationError>>
            + Send
            + Sync
            + 'static,
    {
        self.required_checks.push(Box::new(check));
        self
    }

    /// Add a simple predicate check with error message
    pub fn require_pred<F>(mut self, predicate: F, error_msg: String) -> Self
    where
        F: Fn(&SubmitContext<'_>) -> bool + Send + Sync + 'static,
    {
        let check = move |ctx: &SubmitContext<'_>| {
            if predicate(ctx) {
                Validation::success(())
            } else {
                Validation::fail(ViolationError::CustomCheckFailed {
                    message: error_msg.clone(),
                })
            }
        };
        self.required_checks.push(Box::new(check));
        self
    }

    /// Enforce all rules, accumulating ALL violations.
    pub fn enforce(
        &self,
        context: &SubmitContext<'_>,
    ) -> Validation<(), NonEmptyVec<ViolationError>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<ViolationError>>> = Vec::new();

        let cursor_check = match context.cursor {
            Cursor::Complete => Validation::fail(ViolationError::FlowComplete),
            Cursor::Active(expected) if expected != context.step => {
                Validation::fail(ViolationError::StepMismatch {
                    expected,
                    submitted: context.step,
                })
            }
            Cursor::Active(_) => Validation::success(()),
        };
        checks.push(cursor_check);

        let completeness_check = if context.is_answer_complete() {
            Validation::success(())
        } else {
            Validation::fail(ViolationError::AnswerIncomplete { step: context.step })
        };
        checks.push(completeness_check);

        for check_fn in &self.required_checks {
            checks.push(check_fn(context));
        }

        Validation::all_vec(checks).map(|_| ())
    }

    /// Flatten a failed enforcement into a plain list.
    pub fn violations(&self, context: &SubmitContext<'_>) -> Vec<ViolationError> {
        match self.enforce(context) {
            Validation::Success(_) => Vec::new(),
            Validation::Failure(errors) => errors.iter().cloned().collect(),
        }
    }
}
