//! Context provided to submission checks.

use crate::core::{Answers, Cursor, Guard, Step};

/// What a check sees when a step is about to be submitted
#[derive(Clone, Copy, Debug)]
pub struct SubmitContext<'a> {
    pub step: Step,
    pub cursor: Cursor,
    pub answers: &'a Answers,
    pub guard: &'a Guard,
}

impl SubmitContext<'_> {
    /// Whether the step's completeness guard passes (pure)
    pub fn is_answer_complete(&self) -> bool {
        self.guard.check(self.answers)
    }
}
