//! The transition engine.
//!
//! A pure reducer over the four action kinds. It never performs I/O and
//! never mutates its input; callers receive the next state or an error
//! describing why the action does not apply.

use crate::core::{Cursor, FormState, HistoryEntry, RawData, Step};
use crate::effects::transition::{Action, TransitionError};

/// Compute the state that follows `action`.
///
/// # Example
///
/// ```rust
/// use chatform::core::{Cursor, Field, FormState, RawData, Step};
/// use chatform::effects::{reduce, Action};
///
/// let state = FormState::default();
/// let next = reduce(
///     &state,
///     &Action::SubmitStep {
///         question: "email?".to_string(),
///         answer_summary: "a@b.com".to_string(),
///         step: Step::Email,
///         raw: RawData::from([(Field::Email, "a@b.com".to_string())]),
///     },
/// )
/// .unwrap();
///
/// assert_eq!(next.cursor, Cursor::Active(Step::Phone));
/// assert_eq!(next.ledger.len(), 1);
/// assert_eq!(next.answers.get(Field::Email), "a@b.com");
/// ```
pub fn reduce(state: &FormState, action: &Action) -> Result<FormState, TransitionError> {
    match action {
        Action::SubmitStep {
            question,
            answer_summary,
            step,
            raw,
        } => submit_step(state, question, answer_summary, *step, raw),
        Action::EditStep(target) => edit_step(state, *target),
        Action::SetStep(step) => set_step(state, *step),
        Action::SetField { field, value } => Ok(FormState {
            answers: state.answers.set_field(*field, value.clone()),
            ..state.clone()
        }),
    }
}

fn submit_step(
    state: &FormState,
    question: &str,
    answer_summary: &str,
    step: Step,
    raw: &RawData,
) -> Result<FormState, TransitionError> {
    match state.cursor {
        Cursor::Complete => return Err(TransitionError::FlowComplete(step)),
        Cursor::Active(expected) if expected != step => {
            return Err(TransitionError::OutOfOrder {
                expected,
                submitted: step,
            })
        }
        Cursor::Active(_) => {}
    }

    let answers = state.answers.merge_raw(raw);
    let ledger = state
        .ledger
        .record(HistoryEntry::new(step, question, answer_summary));

    Ok(FormState {
        answers,
        ledger,
        cursor: Cursor::after(step),
    })
}

fn edit_step(state: &FormState, target: Step) -> Result<FormState, TransitionError> {
    match state.ledger.position(target) {
        Some(index) => Ok(FormState {
            answers: state.answers.clone(),
            ledger: state.ledger.truncate(index),
            cursor: Cursor::Active(target),
        }),
        // Already reopened; a repeated edit changes nothing.
        None if state.cursor == Cursor::Active(target) => Ok(state.clone()),
        None => Err(TransitionError::NotAnswered(target)),
    }
}

fn set_step(state: &FormState, step: Step) -> Result<FormState, TransitionError> {
    if !state.is_reachable(step) {
        return Err(TransitionError::Unreachable {
            step,
            frontier: state.frontier(),
        });
    }

    Ok(FormState {
        cursor: Cursor::Active(step),
        ..state.clone()
    })
}
