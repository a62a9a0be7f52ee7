//! Form machine that runs transitions and mirrors them to collaborators.

use crate::core::{Answers, Cursor, FormState, RouteTable, Step, ROOT_PATH};
use crate::effects::env::{CompletionSink, Navigator};
use crate::effects::reducer::reduce;
use crate::effects::transition::{Action, TransitionError};
use crate::enforcement::{SubmitContext, SubmitRules};
use crate::flow::{Flow, StepDefinition};
use crate::snapshot::Snapshot;
use std::marker::PhantomData;
use stillwater::effect::BoxedEffect;
use stillwater::prelude::*;
use tracing::{debug, info, warn};

/// Location change that accompanies a transition.
#[derive(Clone, Debug, PartialEq)]
pub enum Navigation {
    /// Location already matches (or the change came from navigation)
    Stay,
    Push(String),
    Replace(String),
}

/// What a transition did besides changing state.
#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    pub navigation: Navigation,
    /// Present only on the transition that completed the flow
    pub snapshot: Option<Snapshot>,
}

/// Output of a dispatched effect, ready to be applied.
#[derive(Clone, Debug)]
pub struct Dispatched {
    pub state: FormState,
    pub report: Report,
}

/// Coordinator owning the form state.
///
/// Every change goes through [`FormMachine::dispatch`] (or the navigation
/// entry points), whose effect must be run and then handed to
/// [`FormMachine::apply`].
pub struct FormMachine<Env> {
    state: FormState,
    flow: Flow,
    routes: RouteTable,
    rules: SubmitRules,
    _env: PhantomData<Env>,
}

impl<Env> FormMachine<Env>
where
    Env: Navigator + CompletionSink + Clone + Send + Sync + 'static,
{
    /// Create a machine at the first step with the given answers
    pub fn new(answers: Answers) -> Self {
        Self {
            state: FormState::new(answers),
            flow: Flow::standard(),
            routes: RouteTable::standard(),
            rules: SubmitRules::standard(),
            _env: PhantomData,
        }
    }

    pub fn with_flow(mut self, flow: Flow) -> Self {
        self.flow = flow;
        self
    }

    pub fn with_routes(mut self, routes: RouteTable) -> Self {
        self.routes = routes;
        self
    }

    pub fn with_rules(mut self, rules: SubmitRules) -> Self {
        self.rules = rules;
        self
    }

    /// Get current state (pure)
    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn flow(&self) -> &Flow {
        &self.flow
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Definition of the step awaiting an answer, if any (pure)
    pub fn current_step(&self) -> Option<&StepDefinition> {
        self.state
            .cursor
            .step()
            .map(|step| self.flow.definition(step))
    }

    /// Whether the current step's guard passes (pure)
    pub fn can_submit(&self) -> bool {
        self.current_step()
            .is_some_and(|definition| definition.is_complete(&self.state.answers))
    }

    /// Location matching the cursor.
    pub fn location(&self) -> &str {
        let step = self.state.cursor.step().unwrap_or(Step::ALL[Step::ALL.len() - 1]);
        self.routes.path_for(step)
    }

    /// Compute the transition for `action` and mirror it to the environment.
    /// After running the effect, call apply() to update the machine state.
    pub fn dispatch(&self, action: Action) -> BoxedEffect<Dispatched, TransitionError, Env> {
        if let Action::SubmitStep { step, raw, .. } = &action {
            let merged = self.state.answers.merge_raw(raw);
            let context = SubmitContext {
                step: *step,
                cursor: self.state.cursor,
                answers: &merged,
                guard: &self.flow.definition(*step).guard,
            };
            let violations = self.rules.violations(&context);
            if !violations.is_empty() {
                warn!(step = %step, count = violations.len(), "Submission rejected");
                return fail(TransitionError::Rejected {
                    step: *step,
                    violations,
                })
                .boxed();
            }
        }

        let next = match reduce(&self.state, &action) {
            Ok(next) => next,
            Err(error) => {
                debug!(action = action.kind(), %error, "Transition refused");
                return fail(error).boxed();
            }
        };

        let navigation = match &action {
            Action::SubmitStep { .. } => match next.cursor {
                Cursor::Active(step) => Navigation::Push(self.routes.path_for(step).to_string()),
                Cursor::Complete => Navigation::Stay,
            },
            Action::EditStep(target) => Navigation::Push(self.routes.path_for(*target).to_string()),
            Action::SetStep(_) | Action::SetField { .. } => Navigation::Stay,
        };

        let snapshot = (!self.state.is_complete() && next.is_complete())
            .then(|| Snapshot::capture(&next));

        debug!(
            action = action.kind(),
            from = %self.state.cursor,
            to = %next.cursor,
            ledger = next.ledger.len(),
            "Transition computed"
        );
        perform(next, Report { navigation, snapshot })
    }

    /// React to a location change (back/forward or a typed URL).
    ///
    /// A location past the first unanswered step is put back to the
    /// cursor's location instead of moving the cursor.
    pub fn navigated(&self, path: &str) -> BoxedEffect<Dispatched, TransitionError, Env> {
        let step = self.routes.step_for_path(path);
        match reduce(&self.state, &Action::SetStep(step)) {
            Ok(next) => {
                debug!(path, step = %step, "Cursor synced from location");
                perform(
                    next,
                    Report {
                        navigation: Navigation::Stay,
                        snapshot: None,
                    },
                )
            }
            Err(TransitionError::Unreachable { .. }) => {
                let location = self.location().to_string();
                warn!(path, %location, "Location is past the first unanswered step");
                perform(
                    self.state.clone(),
                    Report {
                        navigation: Navigation::Replace(location),
                        snapshot: None,
                    },
                )
            }
            Err(error) => fail(error).boxed(),
        }
    }

    /// Sync the cursor with the location the session starts on.
    pub fn start(&self, location: &str) -> BoxedEffect<Dispatched, TransitionError, Env> {
        if location != ROOT_PATH {
            return self.navigated(location);
        }

        let initial = self.routes.initial_path().to_string();
        match reduce(&self.state, &Action::SetStep(Step::FIRST)) {
            Ok(next) => perform(
                next,
                Report {
                    navigation: Navigation::Replace(initial),
                    snapshot: None,
                },
            ),
            Err(error) => fail(error).boxed(),
        }
    }

    /// Apply the result of a dispatched effect.
    pub fn apply(&mut self, dispatched: Dispatched) -> Report {
        let Dispatched { state, report } = dispatched;
        if report.snapshot.is_some() {
            let elapsed_ms = state.ledger.duration().map_or(0, |d| d.as_millis() as u64);
            info!(answered = state.ledger.len(), elapsed_ms, "Flow complete");
        }
        self.state = state;
        report
    }

    /// Dispatch, run against `env`, and apply in one call.
    pub async fn send(&mut self, action: Action, env: &Env) -> Result<Report, TransitionError> {
        let dispatched = self.dispatch(action).run(env).await?;
        Ok(self.apply(dispatched))
    }
}

/// Effect mirroring a computed transition to the environment.
fn perform<Env>(state: FormState, report: Report) -> BoxedEffect<Dispatched, TransitionError, Env>
where
    Env: Navigator + CompletionSink + Clone + Send + Sync + 'static,
{
    from_fn(move |env: &Env| {
        match &report.navigation {
            Navigation::Push(path) => env.push(path),
            Navigation::Replace(path) => env.replace(path),
            Navigation::Stay => {}
        }
        if let Some(snapshot) = &report.snapshot {
            env.complete(snapshot);
        }
        Ok::<_, TransitionError>(Dispatched {
            state: state.clone(),
            report: report.clone(),
        })
    })
    .boxed()
}
