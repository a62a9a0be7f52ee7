//! Line-oriented console front end.
//!
//! Each input line is either an answer to the current question or a
//! `:command`. Answers are written to the step's primary field, then
//! submitted once the step's guard passes. Output is paced by the reveal
//! sequencer so answered steps appear question first, then answer.

use crate::config::FormConfig;
use crate::core::Step;
use crate::effects::{Action, BrowserHistory, CompletionSink, FormMachine, Navigator, Report};
use crate::progress::{progress, SectionStatus};
use crate::reveal::{RevealCue, RevealPlan, RevealTracker, Sequencer};
use crate::snapshot::{Snapshot, SnapshotError};
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};
use stillwater::prelude::*;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, info};

const HELP: &str = "\
Type an answer and press enter, or use a command:
  :edit <step>   change an earlier answer (email, phone)
  :back          go to the previous location
  :forward       go to the next location
  :status        show progress and answers so far
  :help          show this message
  :quit          leave";

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("Console I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error("Reveal sequencer stopped before the plan finished")]
    RevealStopped,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CommandError {
    #[error("Unknown command ':{0}', try :help")]
    UnknownCommand(String),

    #[error("Unknown step '{0}', expected email, phone or moved")]
    UnknownStep(String),

    #[error(":edit needs a step name")]
    MissingStep,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Answer(String),
    Edit(Step),
    Back,
    Forward,
    Status,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let Some(rest) = line.strip_prefix(':') else {
        return Ok(Command::Answer(line.to_string()));
    };

    let mut words = rest.split_whitespace();
    match words.next().unwrap_or_default() {
        "edit" => {
            let name = words.next().ok_or(CommandError::MissingStep)?;
            parse_step(name).map(Command::Edit)
        }
        "back" => Ok(Command::Back),
        "forward" => Ok(Command::Forward),
        "status" => Ok(Command::Status),
        "help" => Ok(Command::Help),
        "quit" | "q" => Ok(Command::Quit),
        other => Err(CommandError::UnknownCommand(other.to_string())),
    }
}

/// Case-insensitive step lookup by name.
pub fn parse_step(name: &str) -> Result<Step, CommandError> {
    Step::ALL
        .into_iter()
        .find(|step| step.name().eq_ignore_ascii_case(name))
        .ok_or_else(|| CommandError::UnknownStep(name.to_string()))
}

fn retry_hint(step: Step) -> &'static str {
    match step {
        Step::Email => "Please enter a valid email address.",
        Step::Phone => "Please enter a 10 digit phone number.",
        Step::Moved => "Please answer yes or no.",
    }
}

/// Environment for console sessions: in-memory location history plus the
/// snapshots of completed flows.
#[derive(Clone, Debug)]
pub struct TerminalEnv {
    history: BrowserHistory,
    completed: Arc<Mutex<Vec<Snapshot>>>,
}

impl TerminalEnv {
    pub fn new(initial: &str) -> Self {
        Self {
            history: BrowserHistory::new(initial),
            completed: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn history(&self) -> &BrowserHistory {
        &self.history
    }

    pub fn completed(&self) -> Vec<Snapshot> {
        self.completed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for TerminalEnv {
    fn push(&self, path: &str) {
        debug!(path, "Location pushed");
        self.history.push(path);
    }

    fn replace(&self, path: &str) {
        debug!(path, "Location replaced");
        self.history.replace(path);
    }
}

impl CompletionSink for TerminalEnv {
    fn complete(&self, snapshot: &Snapshot) {
        info!(id = %snapshot.id, "Snapshot captured");
        self.completed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(snapshot.clone());
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Quit,
}

/// One interactive run of the flow.
pub struct Session {
    machine: FormMachine<TerminalEnv>,
    env: TerminalEnv,
    tracker: RevealTracker,
    sequencer: Sequencer,
    cues: mpsc::UnboundedReceiver<RevealCue>,
    json: bool,
}

impl Session {
    pub fn new(config: &FormConfig) -> Self {
        let (sequencer, cues) = Sequencer::new();
        Self {
            machine: FormMachine::new(config.answers()),
            env: TerminalEnv::new(crate::core::ROOT_PATH),
            tracker: RevealTracker::new(config.reveal),
            sequencer,
            cues,
            json: false,
        }
    }

    /// Also print the completion snapshot as JSON.
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    pub fn machine(&self) -> &FormMachine<TerminalEnv> {
        &self.machine
    }

    pub fn env(&self) -> &TerminalEnv {
        &self.env
    }

    /// Read commands until `:quit` or end of input.
    pub async fn run<R>(&mut self, input: R, out: &mut impl Write) -> Result<(), ConsoleError>
    where
        R: AsyncBufRead + Unpin,
    {
        self.start(out).await?;

        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            let command = match parse_command(&line) {
                Ok(command) => command,
                Err(error) => {
                    writeln!(out, "! {error}")?;
                    continue;
                }
            };
            debug!(?command, "Console command");
            if self.handle(command, out).await? == Outcome::Quit {
                break;
            }
            out.flush()?;
        }
        Ok(())
    }

    /// Sync the cursor with the starting location and show the first prompt.
    pub async fn start(&mut self, out: &mut impl Write) -> Result<(), ConsoleError> {
        let location = self.env.history.current();
        match self.machine.start(&location).run(&self.env).await {
            Ok(dispatched) => {
                self.machine.apply(dispatched);
            }
            Err(error) => writeln!(out, "! {error}")?,
        }
        let plan = self.tracker.on_ledger(&self.machine.state().ledger);
        self.reveal(plan, out).await
    }

    pub async fn handle(
        &mut self,
        command: Command,
        out: &mut impl Write,
    ) -> Result<Outcome, ConsoleError> {
        match command {
            Command::Answer(text) => self.answer(&text, out).await?,
            Command::Edit(step) => self.edit(step, out).await?,
            Command::Back => {
                let location = self.env.history.back();
                self.travel(location, out).await?;
            }
            Command::Forward => {
                let location = self.env.history.forward();
                self.travel(location, out).await?;
            }
            Command::Status => self.status(out)?,
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => return Ok(Outcome::Quit),
        }
        Ok(Outcome::Continue)
    }

    async fn answer(&mut self, text: &str, out: &mut impl Write) -> Result<(), ConsoleError> {
        let Some(definition) = self.machine.current_step() else {
            writeln!(out, "bot: You're all done. Use :edit <step> to change an answer.")?;
            return Ok(());
        };
        let step = definition.step;
        let field = definition.primary_field();
        let value = definition.sanitize(field, text);

        if let Err(error) = self
            .machine
            .send(Action::set_field(field, value), &self.env)
            .await
        {
            writeln!(out, "! {error}")?;
            return Ok(());
        }

        let submission = self
            .machine
            .current_step()
            .and_then(|definition| definition.submission(&self.machine.state().answers));
        let Some(action) = submission else {
            writeln!(out, "bot: {}", retry_hint(step))?;
            return Ok(());
        };

        match self.machine.send(action, &self.env).await {
            Ok(report) => self.submitted(report, out).await,
            Err(error) => {
                writeln!(out, "! {error}")?;
                Ok(())
            }
        }
    }

    async fn submitted(&mut self, report: Report, out: &mut impl Write) -> Result<(), ConsoleError> {
        let plan = self.tracker.on_ledger(&self.machine.state().ledger);
        self.reveal(plan, out).await?;

        if let Some(snapshot) = report.snapshot {
            writeln!(out, "bot: {}", snapshot.completion_message())?;
            if self.json {
                writeln!(out, "{}", snapshot.to_json()?)?;
            }
        }
        Ok(())
    }

    async fn edit(&mut self, step: Step, out: &mut impl Write) -> Result<(), ConsoleError> {
        let definition = self.machine.flow().definition(step);
        if !definition.editable {
            writeln!(out, "! The {step} answer can't be edited")?;
            return Ok(());
        }
        let field = definition.primary_field();

        if let Err(error) = self.machine.send(Action::EditStep(step), &self.env).await {
            writeln!(out, "! {error}")?;
            return Ok(());
        }

        let plan = self.tracker.on_edit();
        self.reveal(plan, out).await?;
        let current = self.machine.state().answers.get(field);
        if !current.is_empty() {
            writeln!(out, "     current: {current}")?;
        }
        Ok(())
    }

    async fn travel(
        &mut self,
        location: Option<String>,
        out: &mut impl Write,
    ) -> Result<(), ConsoleError> {
        let Some(location) = location else {
            writeln!(out, "! Nowhere to go")?;
            return Ok(());
        };

        match self.machine.navigated(&location).run(&self.env).await {
            Ok(dispatched) => {
                self.machine.apply(dispatched);
                let plan = self.tracker.on_navigation();
                self.reveal(plan, out).await
            }
            Err(error) => {
                writeln!(out, "! {error}")?;
                Ok(())
            }
        }
    }

    fn status(&self, out: &mut impl Write) -> std::io::Result<()> {
        let state = self.machine.state();
        for (section, status) in progress(state.cursor) {
            let marker = match status {
                SectionStatus::Completed => 'x',
                SectionStatus::Active => '>',
                SectionStatus::Upcoming => ' ',
            };
            writeln!(out, "[{marker}] {section}")?;
        }
        for entry in state.ledger.entries() {
            writeln!(out, "    {}: {}", entry.step, entry.answer)?;
        }
        if let Some(elapsed) = state.ledger.duration().filter(|_| state.is_complete()) {
            writeln!(out, "    answered in {:.1}s", elapsed.as_secs_f64())?;
        }
        Ok(())
    }

    /// Play `plan` and render each cue as it fires.
    async fn reveal(&mut self, plan: RevealPlan, out: &mut impl Write) -> Result<(), ConsoleError> {
        let expected = plan.cues().len();
        self.sequencer.play(plan);
        for _ in 0..expected {
            let cue = self.cues.recv().await.ok_or(ConsoleError::RevealStopped)?;
            self.render(cue, out)?;
        }
        Ok(())
    }

    fn render(&self, cue: RevealCue, out: &mut impl Write) -> std::io::Result<()> {
        let ledger = &self.machine.state().ledger;
        match cue {
            RevealCue::ShowQuestion(step) => match ledger.get(step) {
                Some(entry) => writeln!(out, "bot: {}", entry.question),
                None => Ok(()),
            },
            RevealCue::ShowAnswer(step) => match ledger.get(step) {
                Some(entry) if self.machine.flow().definition(step).editable => writeln!(
                    out,
                    "you: {}  (:edit {})",
                    entry.answer,
                    step.name().to_ascii_lowercase()
                ),
                Some(entry) => writeln!(out, "you: {}", entry.answer),
                None => Ok(()),
            },
            RevealCue::ShowInput => match self.machine.current_step() {
                Some(definition) => writeln!(out, "bot: {}", definition.question),
                None => Ok(()),
            },
            RevealCue::HideInput | RevealCue::ScrollToInput => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Cursor, Field};
    use crate::reveal::RevealTimings;

    fn instant_config() -> FormConfig {
        FormConfig {
            reveal: RevealTimings {
                question_ms: 0,
                answer_ms: 0,
                input_ms: 0,
                scroll_ms: 0,
                initial_scroll_ms: 0,
            },
            ..FormConfig::default()
        }
    }

    async fn run(session: &mut Session, input: &str) -> String {
        let mut out = Vec::new();
        session.run(input.as_bytes(), &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn parses_commands() {
        assert_eq!(
            parse_command("  a@b.com "),
            Ok(Command::Answer("a@b.com".to_string()))
        );
        assert_eq!(parse_command(":edit Phone"), Ok(Command::Edit(Step::Phone)));
        assert_eq!(parse_command(":back"), Ok(Command::Back));
        assert_eq!(parse_command(":q"), Ok(Command::Quit));
        assert_eq!(parse_command(":edit"), Err(CommandError::MissingStep));
        assert_eq!(
            parse_command(":edit age"),
            Err(CommandError::UnknownStep("age".to_string()))
        );
        assert_eq!(
            parse_command(":jump"),
            Err(CommandError::UnknownCommand("jump".to_string()))
        );
    }

    #[tokio::test]
    async fn completes_the_flow() {
        let mut session = Session::new(&instant_config());
        let output = run(&mut session, "a@b.com\n555 123 4567\ny\n").await;

        assert!(output.contains("you: a@b.com  (:edit email)"));
        assert!(output.contains("you: (555) 123-4567  (:edit phone)"));
        assert!(output.contains("you: YES\n"));
        assert!(output
            .contains("Thanks, Hasya! Your flow is complete. Moved in last 2 months: YES."));
        assert!(session.machine().state().is_complete());
        assert_eq!(session.env().completed().len(), 1);
        assert_eq!(session.env().history().current(), "/moved");
    }

    #[tokio::test]
    async fn invalid_answer_keeps_the_step() {
        let mut session = Session::new(&instant_config());
        let output = run(&mut session, "not an email\n").await;

        assert!(output.contains(retry_hint(Step::Email)));
        assert_eq!(session.machine().state().cursor, Cursor::Active(Step::Email));
        assert!(session.machine().state().ledger.is_empty());
        assert_eq!(
            session.machine().state().answers.get(Field::Email),
            "not an email"
        );
    }

    #[tokio::test]
    async fn edit_reopens_step_with_current_value() {
        let mut session = Session::new(&instant_config());
        let output = run(&mut session, "a@b.com\n5551234567\n:edit email\n").await;

        let state = session.machine().state();
        assert_eq!(state.cursor, Cursor::Active(Step::Email));
        assert!(state.ledger.is_empty());
        assert!(output.contains("current: a@b.com"));
        assert_eq!(session.env().history().current(), "/email");
    }

    #[tokio::test]
    async fn last_step_is_not_editable() {
        let mut session = Session::new(&instant_config());
        let output = run(&mut session, ":edit moved\n").await;

        assert!(output.contains("can't be edited"));
    }

    #[tokio::test]
    async fn back_moves_cursor_without_truncating() {
        let mut session = Session::new(&instant_config());
        run(&mut session, "a@b.com\n:back\n").await;

        let state = session.machine().state();
        assert_eq!(state.cursor, Cursor::Active(Step::Email));
        assert_eq!(state.ledger.len(), 1);
        assert_eq!(session.env().history().current(), "/email");
    }

    #[tokio::test]
    async fn json_flag_prints_snapshot() {
        let mut session = Session::new(&instant_config()).with_json(true);
        let output = run(&mut session, "a@b.com\n5551234567\nno\n").await;

        assert!(output.contains("\"version\": 1"));
        assert!(output.contains("Moved in last 2 months: NO."));
    }

    #[tokio::test]
    async fn status_shows_answers_and_elapsed_time_once_complete() {
        let mut session = Session::new(&instant_config());
        let output = run(&mut session, "a@b.com\n:status\n5551234567\nyes\n:status\n").await;

        assert!(output.contains("[>] About You"));
        assert!(output.contains("    Email: a@b.com"));
        assert!(output.contains("[ ] About You"));
        assert_eq!(output.matches("answered in").count(), 1);
        assert!(output.trim_end().ends_with('s'));
    }

    #[tokio::test]
    async fn quit_stops_reading() {
        let mut session = Session::new(&instant_config());
        run(&mut session, ":quit\na@b.com\n").await;

        assert!(session.machine().state().ledger.is_empty());
    }
}
