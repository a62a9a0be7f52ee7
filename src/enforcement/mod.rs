//! Validation-based checks run before a step submission.
//!
//! Uses Stillwater's `Validation` type to accumulate ALL violations instead
//! of stopping at the first one, so a rejected submission reports every
//! reason at once.
//!
//! # Example
//!
//! ```rust
//! use chatform::core::{Answers, Cursor, Guard, Step};
//! use chatform::enforcement::{SubmitContext, SubmitRules};
//!
//! let rules = SubmitRules::standard();
//! let answers = Answers::new();
//! let guard = Guard::email();
//!
//! let context = SubmitContext {
//!     step: Step::Email,
//!     cursor: Cursor::Active(Step::Email),
//!     answers: &answers,
//!     guard: &guard,
//! };
//!
//! assert!(rules.enforce(&context).is_failure());
//! ```

pub mod context;
pub mod rules;
pub mod violations;

pub use context::SubmitContext;
pub use rules::SubmitRules;
pub use violations::ViolationError;
