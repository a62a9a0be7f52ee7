//! Chatform: a conversational, step-by-step form as a pure state machine
//!
//! Chatform follows the "pure core, imperative shell" philosophy. Every
//! change to the form goes through a pure reducer; location updates and
//! the completion callback are isolated in effects run by [`FormMachine`].
//!
//! # Core Concepts
//!
//! - **Steps**: A fixed, ordered set of questions with a cursor over them
//! - **Guards**: Pure predicates deciding when a step may be submitted
//! - **Ledger**: Immutable ordered record of answered steps
//! - **Effects**: Navigation and completion performed against an environment
//!
//! # Example
//!
//! ```rust
//! use chatform::core::{Cursor, FormState, Step};
//! use chatform::effects::{reduce, Action};
//! use chatform::flow::Flow;
//!
//! let flow = Flow::standard();
//! let state = FormState::default();
//!
//! let email = flow.definition(Step::Email);
//! let state = reduce(&state, &Action::set_field(email.primary_field(), "a@b.com")).unwrap();
//! let submit = email.submission(&state.answers).unwrap();
//! let state = reduce(&state, &submit).unwrap();
//!
//! assert_eq!(state.cursor, Cursor::Active(Step::Phone));
//! assert_eq!(state.ledger.len(), 1);
//! ```

pub mod config;
pub mod console;
pub mod core;
pub mod effects;
pub mod enforcement;
pub mod flow;
pub mod logging;
pub mod progress;
pub mod reveal;
pub mod snapshot;

// Re-export commonly used types
pub use core::{Answers, Cursor, Field, FormState, Guard, HistoryEntry, Ledger, Step};
pub use effects::{reduce, Action, FormMachine, TransitionError};
pub use flow::Flow;
pub use snapshot::Snapshot;
