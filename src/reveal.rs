//! Sequential reveal of answered steps.
//!
//! After a submission the newest ledger entry is revealed in stages: the
//! question, then the answer, then the next step's input, then a scroll to
//! it. Deciding *what* to reveal is pure ([`RevealTracker`]); playing the
//! cues on a timer is the [`Sequencer`]'s job. State transitions are never
//! delayed; only their presentation is.

use crate::core::{Ledger, Step};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::trace;

/// Offsets of each reveal stage, in milliseconds from the submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealTimings {
    pub question_ms: u64,
    pub answer_ms: u64,
    pub input_ms: u64,
    pub scroll_ms: u64,
    /// Scroll delay on first mount, when only the input is shown
    pub initial_scroll_ms: u64,
}

impl Default for RevealTimings {
    fn default() -> Self {
        Self {
            question_ms: 0,
            answer_ms: 300,
            input_ms: 600,
            scroll_ms: 700,
            initial_scroll_ms: 50,
        }
    }
}

/// One visual change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealCue {
    HideInput,
    ShowQuestion(Step),
    ShowAnswer(Step),
    ShowInput,
    ScrollToInput,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimedCue {
    pub at: Duration,
    pub cue: RevealCue,
}

/// Cues ordered by offset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RevealPlan {
    cues: Vec<TimedCue>,
}

impl RevealPlan {
    pub fn new(mut cues: Vec<TimedCue>) -> Self {
        cues.sort_by_key(|timed| timed.at);
        Self { cues }
    }

    /// Staged reveal of a freshly answered step.
    pub fn after_submit(step: Step, timings: &RevealTimings) -> Self {
        let at = Duration::from_millis;
        Self::new(vec![
            TimedCue {
                at: Duration::ZERO,
                cue: RevealCue::HideInput,
            },
            TimedCue {
                at: at(timings.question_ms),
                cue: RevealCue::ShowQuestion(step),
            },
            TimedCue {
                at: at(timings.answer_ms),
                cue: RevealCue::ShowAnswer(step),
            },
            TimedCue {
                at: at(timings.input_ms),
                cue: RevealCue::ShowInput,
            },
            TimedCue {
                at: at(timings.scroll_ms),
                cue: RevealCue::ScrollToInput,
            },
        ])
    }

    /// Input shown at once, scroll shortly after.
    pub fn initial(timings: &RevealTimings) -> Self {
        Self::new(vec![
            TimedCue {
                at: Duration::ZERO,
                cue: RevealCue::ShowInput,
            },
            TimedCue {
                at: Duration::from_millis(timings.initial_scroll_ms),
                cue: RevealCue::ScrollToInput,
            },
        ])
    }

    /// Input shown at once, skipping the staged reveal.
    pub fn immediate() -> Self {
        Self::new(vec![TimedCue {
            at: Duration::ZERO,
            cue: RevealCue::ShowInput,
        }])
    }

    pub fn cues(&self) -> &[TimedCue] {
        &self.cues
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }
}

/// Decides which reveal, if any, a state change calls for.
#[derive(Clone, Debug, Default)]
pub struct RevealTracker {
    timings: RevealTimings,
    mounted: bool,
    last_animated: Option<Step>,
}

impl RevealTracker {
    pub fn new(timings: RevealTimings) -> Self {
        Self {
            timings,
            mounted: false,
            last_animated: None,
        }
    }

    /// Plan for the ledger as it stands after a transition.
    ///
    /// Only a ledger whose newest step differs from the last one animated
    /// gets the staged reveal.
    pub fn on_ledger(&mut self, ledger: &Ledger) -> RevealPlan {
        if !self.mounted {
            self.mounted = true;
            self.last_animated = ledger.last().map(|entry| entry.step);
            return if ledger.is_empty() {
                RevealPlan::initial(&self.timings)
            } else {
                RevealPlan::immediate()
            };
        }

        match ledger.last() {
            Some(entry) if Some(entry.step) != self.last_animated => {
                self.last_animated = Some(entry.step);
                RevealPlan::after_submit(entry.step, &self.timings)
            }
            _ => RevealPlan::default(),
        }
    }

    /// An edit reopens a step; show its input straight away.
    pub fn on_edit(&mut self) -> RevealPlan {
        self.last_animated = None;
        RevealPlan::immediate()
    }

    /// Back/forward navigation bypasses the staged reveal. A step answered
    /// again afterwards animates as if new.
    pub fn on_navigation(&mut self) -> RevealPlan {
        self.last_animated = None;
        RevealPlan::immediate()
    }
}

/// Plays reveal plans on the tokio timer.
///
/// Starting a new plan cancels whatever is still pending from the previous
/// one, as does dropping the sequencer.
pub struct Sequencer {
    tx: mpsc::UnboundedSender<RevealCue>,
    task: Option<JoinHandle<()>>,
}

impl Sequencer {
    /// Create a sequencer and the receiver its cues arrive on.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<RevealCue>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx, task: None }, rx)
    }

    /// Must be called from within a tokio runtime.
    pub fn play(&mut self, plan: RevealPlan) {
        self.cancel();
        if plan.is_empty() {
            return;
        }

        let tx = self.tx.clone();
        self.task = Some(tokio::spawn(async move {
            let started = Instant::now();
            for timed in plan.cues {
                tokio::time::sleep_until(started + timed.at).await;
                trace!(cue = ?timed.cue, at_ms = timed.at.as_millis() as u64, "Reveal cue");
                if tx.send(timed.cue).is_err() {
                    return;
                }
            }
        }));
    }

    /// Drop any cues that have not fired yet.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for Sequencer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::HistoryEntry;

    fn ledger(steps: &[Step]) -> Ledger {
        steps.iter().fold(Ledger::new(), |ledger, step| {
            ledger.record(HistoryEntry::new(*step, "q", "a"))
        })
    }

    fn cue_list(plan: &RevealPlan) -> Vec<RevealCue> {
        plan.cues().iter().map(|timed| timed.cue).collect()
    }

    #[test]
    fn submit_plan_uses_default_offsets() {
        let plan = RevealPlan::after_submit(Step::Email, &RevealTimings::default());
        let offsets: Vec<u128> = plan.cues().iter().map(|t| t.at.as_millis()).collect();

        assert_eq!(offsets, vec![0, 0, 300, 600, 700]);
        assert_eq!(
            cue_list(&plan),
            vec![
                RevealCue::HideInput,
                RevealCue::ShowQuestion(Step::Email),
                RevealCue::ShowAnswer(Step::Email),
                RevealCue::ShowInput,
                RevealCue::ScrollToInput,
            ]
        );
    }

    #[test]
    fn first_mount_shows_input_then_scrolls() {
        let mut tracker = RevealTracker::default();
        let plan = tracker.on_ledger(&Ledger::new());

        assert_eq!(
            cue_list(&plan),
            vec![RevealCue::ShowInput, RevealCue::ScrollToInput]
        );
        assert_eq!(plan.cues()[1].at, Duration::from_millis(50));
    }

    #[test]
    fn new_entry_triggers_staged_reveal_once() {
        let mut tracker = RevealTracker::default();
        tracker.on_ledger(&Ledger::new());

        let answered = ledger(&[Step::Email]);
        assert_eq!(tracker.on_ledger(&answered).cues().len(), 5);
        assert!(tracker.on_ledger(&answered).is_empty());
    }

    #[test]
    fn edit_resets_so_resubmission_animates_again() {
        let mut tracker = RevealTracker::default();
        tracker.on_ledger(&Ledger::new());
        tracker.on_ledger(&ledger(&[Step::Email]));

        assert_eq!(cue_list(&tracker.on_edit()), vec![RevealCue::ShowInput]);
        assert!(tracker.on_ledger(&Ledger::new()).is_empty());
        assert!(!tracker.on_ledger(&ledger(&[Step::Email])).is_empty());
    }

    #[test]
    fn navigation_shows_input_immediately() {
        let mut tracker = RevealTracker::default();
        tracker.on_ledger(&Ledger::new());
        let answered = ledger(&[Step::Email]);
        tracker.on_ledger(&answered);

        assert_eq!(tracker.on_navigation(), RevealPlan::immediate());
        assert_eq!(tracker.on_ledger(&answered).cues().len(), 5);
    }

    fn fast_timings() -> RevealTimings {
        RevealTimings {
            question_ms: 0,
            answer_ms: 5,
            input_ms: 10,
            scroll_ms: 15,
            initial_scroll_ms: 1,
        }
    }

    #[tokio::test]
    async fn sequencer_delivers_cues_in_order() {
        let (mut sequencer, mut rx) = Sequencer::new();
        sequencer.play(RevealPlan::after_submit(Step::Phone, &fast_timings()));

        let mut received = Vec::new();
        for _ in 0..5 {
            received.push(rx.recv().await.unwrap());
        }

        assert_eq!(received[0], RevealCue::HideInput);
        assert_eq!(received[4], RevealCue::ScrollToInput);
    }

    #[tokio::test]
    async fn new_plan_cancels_pending_cues() {
        let (mut sequencer, mut rx) = Sequencer::new();
        sequencer.play(RevealPlan::new(vec![TimedCue {
            at: Duration::from_millis(200),
            cue: RevealCue::ShowAnswer(Step::Email),
        }]));
        sequencer.play(RevealPlan::immediate());

        assert_eq!(rx.recv().await, Some(RevealCue::ShowInput));
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn dropping_sequencer_cancels_pending_cues() {
        let (mut sequencer, mut rx) = Sequencer::new();
        sequencer.play(RevealPlan::new(vec![TimedCue {
            at: Duration::from_millis(100),
            cue: RevealCue::ScrollToInput,
        }]));
        drop(sequencer);

        assert_eq!(rx.recv().await, None);
    }
}
