//! The history ledger of answered steps.
//!
//! Provides immutable tracking of completed steps, following functional
//! programming principles: every update returns a new ledger.

use super::step::Step;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Archived question and answer summary for a completed step.
///
/// Entries are immutable snapshots taken at submit time.
///
/// # Example
///
/// ```rust
/// use chatform::core::{HistoryEntry, Step};
///
/// let entry = HistoryEntry::new(Step::Email, "email?", "a@b.com");
/// assert_eq!(entry.step, Step::Email);
/// assert_eq!(entry.answer, "a@b.com");
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// The step that was answered
    pub step: Step,
    /// The question text shown for the step
    pub question: String,
    /// Human-readable answer summary
    pub answer: String,
    /// When the answer was submitted
    pub answered_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(step: Step, question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            step,
            question: question.into(),
            answer: answer.into(),
            answered_at: Utc::now(),
        }
    }
}

// The submit time is bookkeeping; two entries are the same answer when the
// step, question and summary agree.
impl PartialEq for HistoryEntry {
    fn eq(&self, other: &Self) -> bool {
        self.step == other.step && self.question == other.question && self.answer == other.answer
    }
}

/// Ordered ledger of completed steps.
///
/// Holds at most one entry per step, and the steps read in order always
/// form a gap-free prefix of the fixed step order.
///
/// # Example
///
/// ```rust
/// use chatform::core::{HistoryEntry, Ledger, Step};
///
/// let ledger = Ledger::new()
///     .record(HistoryEntry::new(Step::Email, "email?", "a@b.com"))
///     .record(HistoryEntry::new(Step::Phone, "phone?", "(555) 123-4567"));
///
/// assert_eq!(ledger.steps(), vec![Step::Email, Step::Phone]);
///
/// let edited = ledger.truncate(1);
/// assert_eq!(edited.steps(), vec![Step::Email]);
/// assert_eq!(ledger.len(), 2); // Original unchanged
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    entries: Vec<HistoryEntry>,
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record an entry, returning a new ledger.
    ///
    /// If the step already has an entry at index `i`, that entry is
    /// replaced and everything after it is discarded. Otherwise the entry
    /// is appended.
    pub fn record(&self, entry: HistoryEntry) -> Self {
        let mut entries = self.entries.clone();
        match self.position(entry.step) {
            Some(index) => {
                entries.truncate(index + 1);
                entries[index] = entry;
            }
            None => entries.push(entry),
        }
        Self { entries }
    }

    /// Keep only the first `len` entries.
    pub fn truncate(&self, len: usize) -> Self {
        let mut entries = self.entries.clone();
        entries.truncate(len);
        Self { entries }
    }

    /// Index of the entry for `step`, if it was answered.
    pub fn position(&self, step: Step) -> Option<usize> {
        self.entries.iter().position(|entry| entry.step == step)
    }

    pub fn get(&self, step: Step) -> Option<&HistoryEntry> {
        self.entries.iter().find(|entry| entry.step == step)
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Steps in ledger order.
    pub fn steps(&self) -> Vec<Step> {
        self.entries.iter().map(|entry| entry.step).collect()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Check the prefix invariant: entry `i` holds the `i`-th step.
    pub fn is_ordered_prefix(&self) -> bool {
        self.entries
            .iter()
            .zip(Step::ALL)
            .all(|(entry, step)| entry.step == step)
            && self.entries.len() <= Step::ALL.len()
    }

    /// Time from the first to the last submission.
    ///
    /// Returns `None` for an empty ledger.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.entries.first(), self.entries.last()) {
            let duration = last.answered_at.signed_duration_since(first.answered_at);
            duration.to_std().ok()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(step: Step, answer: &str) -> HistoryEntry {
        HistoryEntry::new(step, format!("{step}?"), answer)
    }

    fn full_ledger() -> Ledger {
        Ledger::new()
            .record(entry(Step::Email, "a@b.com"))
            .record(entry(Step::Phone, "(555) 123-4567"))
            .record(entry(Step::Moved, "NO"))
    }

    #[test]
    fn new_ledger_is_empty() {
        let ledger = Ledger::new();
        assert!(ledger.is_empty());
        assert!(ledger.last().is_none());
        assert!(ledger.duration().is_none());
    }

    #[test]
    fn record_appends_new_steps() {
        let ledger = full_ledger();
        assert_eq!(ledger.steps(), vec![Step::Email, Step::Phone, Step::Moved]);
        assert!(ledger.is_ordered_prefix());
    }

    #[test]
    fn record_is_immutable() {
        let ledger = Ledger::new();
        let recorded = ledger.record(entry(Step::Email, "a@b.com"));

        assert_eq!(ledger.len(), 0);
        assert_eq!(recorded.len(), 1);
    }

    #[test]
    fn record_existing_step_replaces_and_truncates() {
        let ledger = full_ledger().record(entry(Step::Email, "new@b.com"));

        assert_eq!(ledger.steps(), vec![Step::Email]);
        assert_eq!(ledger.entries()[0].answer, "new@b.com");
    }

    #[test]
    fn record_never_duplicates_a_step() {
        let ledger = Ledger::new()
            .record(entry(Step::Email, "a@b.com"))
            .record(entry(Step::Email, "c@d.com"));

        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.get(Step::Email).unwrap().answer, "c@d.com");
    }

    #[test]
    fn truncate_drops_later_entries() {
        let ledger = full_ledger();
        let index = ledger.position(Step::Phone).unwrap();

        assert_eq!(ledger.truncate(index).steps(), vec![Step::Email]);
        assert_eq!(ledger.truncate(10).len(), 3);
    }

    #[test]
    fn gapped_ledger_is_not_an_ordered_prefix() {
        let ledger = Ledger::new().record(entry(Step::Phone, "(555) 123-4567"));
        assert!(!ledger.is_ordered_prefix());
    }

    #[test]
    fn entry_equality_ignores_submit_time() {
        let first = entry(Step::Moved, "YES");
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = entry(Step::Moved, "YES");

        assert_eq!(first, second);
        assert_ne!(first, entry(Step::Moved, "NO"));
    }

    #[test]
    fn duration_calculates_elapsed_time() {
        let ledger = Ledger::new().record(entry(Step::Email, "a@b.com"));
        std::thread::sleep(std::time::Duration::from_millis(10));
        let ledger = ledger.record(entry(Step::Phone, "(555) 123-4567"));

        let duration = ledger.duration().unwrap();
        assert!(duration >= std::time::Duration::from_millis(10));
    }

    #[test]
    fn ledger_serializes_correctly() {
        let ledger = full_ledger();
        let json = serde_json::to_string(&ledger).unwrap();
        let deserialized: Ledger = serde_json::from_str(&json).unwrap();

        assert_eq!(ledger, deserialized);
    }
}
