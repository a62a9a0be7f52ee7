//! Core form types and logic.
//!
//! This module contains the pure functional core of the intake form:
//! - Step identity and the step cursor
//! - The answer store
//! - The history ledger of answered steps
//! - Completeness guards
//! - The step/path route table
//!
//! All logic in this module is pure (no side effects), following
//! the "pure core, imperative shell" philosophy.

mod answers;
mod form;
mod guard;
mod history;
mod route;
mod step;

pub use answers::{Answers, Field, RawData, UnknownField};
pub use form::FormState;
pub use guard::{is_email_complete, is_moved_complete, is_phone_complete, phone_digits, Guard};
pub use history::{HistoryEntry, Ledger};
pub use route::{RouteError, RouteTable, ROOT_PATH};
pub use step::{Cursor, Step};
