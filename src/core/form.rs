//! Combined form state.
//!
//! The answer store, history ledger and step cursor live together in one
//! value owned by a single coordinator. All changes go through the reducer;
//! nothing else mutates a `FormState`.

use super::answers::Answers;
use super::history::Ledger;
use super::step::{Cursor, Step};
use serde::{Deserialize, Serialize};

/// Answers, ledger and cursor for one session.
///
/// # Example
///
/// ```rust
/// use chatform::core::{Cursor, FormState, Step};
///
/// let state = FormState::default();
/// assert_eq!(state.cursor, Cursor::Active(Step::Email));
/// assert!(state.ledger.is_empty());
/// assert!(state.is_settled());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FormState {
    pub answers: Answers,
    pub ledger: Ledger,
    pub cursor: Cursor,
}

impl FormState {
    /// Initial state: the given answers, empty ledger, first step.
    pub fn new(answers: Answers) -> Self {
        Self {
            answers,
            ledger: Ledger::new(),
            cursor: Cursor::default(),
        }
    }

    /// The first step without a ledger entry.
    ///
    /// This is the furthest the cursor may be moved without answering.
    pub fn frontier(&self) -> Cursor {
        Step::from_ordinal(self.ledger.len() + 1).map_or(Cursor::Complete, Cursor::Active)
    }

    /// Whether the cursor sits exactly one past the last ledger entry.
    ///
    /// Holds after every submission and edit. Backward navigation may
    /// leave the cursor behind the frontier until the step is re-answered.
    pub fn is_settled(&self) -> bool {
        self.cursor == self.frontier()
    }

    /// Whether `step` may be visited without answering anything first.
    pub fn is_reachable(&self, step: Step) -> bool {
        step.ordinal() <= self.frontier().ordinal()
    }

    pub fn is_complete(&self) -> bool {
        self.cursor.is_complete()
    }
}
