//! Step identity and the step cursor.
//!
//! Steps form a fixed linear order known at compile time. The cursor
//! points at the step currently awaiting an answer, or past the last
//! step once the flow is complete.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One question/answer unit in the fixed linear flow.
///
/// Ordinals are 1-based and strictly increasing in flow order.
///
/// # Example
///
/// ```rust
/// use chatform::core::Step;
///
/// assert_eq!(Step::Email.ordinal(), 1);
/// assert_eq!(Step::Email.next(), Some(Step::Phone));
/// assert_eq!(Step::Moved.next(), None);
/// assert!(Step::Moved.is_last());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Step {
    Email,
    Phone,
    Moved,
}

impl Step {
    /// Every step, in flow order.
    pub const ALL: [Step; 3] = [Step::Email, Step::Phone, Step::Moved];

    /// The first step of the flow.
    pub const FIRST: Step = Step::Email;

    /// Get the step's name for display/logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::Moved => "Moved",
        }
    }

    /// 1-based position in the fixed order.
    pub fn ordinal(&self) -> usize {
        match self {
            Self::Email => 1,
            Self::Phone => 2,
            Self::Moved => 3,
        }
    }

    /// Inverse of [`Step::ordinal`].
    pub fn from_ordinal(ordinal: usize) -> Option<Step> {
        ordinal
            .checked_sub(1)
            .and_then(|index| Self::ALL.get(index))
            .copied()
    }

    /// The following step, or `None` after the last one.
    pub fn next(&self) -> Option<Step> {
        Self::from_ordinal(self.ordinal() + 1)
    }

    pub fn is_last(&self) -> bool {
        self.next().is_none()
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pointer to the step currently awaiting an answer.
///
/// `Complete` is the terminal position one past the last defined step.
/// Once reached, the surrounding application stops rendering an active
/// step and runs its completion action instead.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Cursor {
    Active(Step),
    Complete,
}

impl Cursor {
    /// The cursor position that follows a submission of `step`.
    pub fn after(step: Step) -> Cursor {
        step.next().map_or(Cursor::Complete, Cursor::Active)
    }

    /// The active step, if the flow is not complete.
    pub fn step(&self) -> Option<Step> {
        match self {
            Self::Active(step) => Some(*step),
            Self::Complete => None,
        }
    }

    /// 1-based ordinal; `Complete` is one past the last step.
    pub fn ordinal(&self) -> usize {
        match self {
            Self::Active(step) => step.ordinal(),
            Self::Complete => Step::ALL.len() + 1,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Cursor::Active(Step::FIRST)
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active(step) => write!(f, "{step}"),
            Self::Complete => f.write_str("Complete"),
        }
    }
}
