//! Transition engine and its effectful shell.
//!
//! The reducer is the pure heart: it turns a state and an action into the
//! next state. The machine is the "imperative shell" around it, mirroring
//! cursor changes into a navigator and delivering the completion snapshot,
//! using Stillwater's effect system.
//!
//! # Key Concepts
//!
//! - **Actions**: submit-step, edit-step, set-step and set-field
//! - **Reducer**: pure function computing the next `FormState`
//! - **Machine**: owns the state, runs effects, applies results

mod env;
mod machine;
mod reducer;
mod transition;

pub use env::{BrowserHistory, CompletionSink, Navigator};
pub use machine::{Dispatched, FormMachine, Navigation, Report};
pub use reducer::reduce;
pub use transition::{Action, TransitionError};
