//! Completion snapshots.
//!
//! When the final step is submitted, the surrounding application receives
//! a snapshot of every answer and the full ledger. Snapshots can be encoded
//! as JSON for readability or bincode for compactness so they can be handed
//! to whatever performs the end-of-flow action. They are never written to
//! durable storage by this crate.

use crate::core::{Answers, Field, FormState, Ledger};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod error;

pub use error::SnapshotError;

/// Version identifier for snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

/// Name used in the completion message when no first name is known.
const ANONYMOUS: &str = "User";

/// Everything collected by a finished session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Snapshot format version
    pub version: u32,

    /// Unique snapshot identifier
    pub id: String,

    /// When the flow completed
    pub completed_at: DateTime<Utc>,

    /// Every field value at completion
    pub answers: Answers,

    /// Answered steps in order
    pub ledger: Ledger,
}

impl Snapshot {
    /// Capture the current answers and ledger.
    pub fn capture(state: &FormState) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            id: uuid::Uuid::new_v4().to_string(),
            completed_at: Utc::now(),
            answers: state.answers.clone(),
            ledger: state.ledger.clone(),
        }
    }

    /// Human-readable end-of-flow confirmation.
    pub fn completion_message(&self) -> String {
        let first_name = match self.answers.get(Field::FirstName) {
            "" => ANONYMOUS,
            name => name,
        };
        format!(
            "Thanks, {}! Your flow is complete. Moved in last 2 months: {}.",
            first_name,
            self.answers.get(Field::Moved)
        )
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Snapshot = serde_json::from_str(json)
            .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(self).map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: Snapshot = bincode::deserialize(bytes)
            .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    fn validate(&self) -> Result<(), SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        if !self.ledger.is_ordered_prefix() {
            return Err(SnapshotError::ValidationFailed(format!(
                "ledger steps {:?} are not in flow order",
                self.ledger.steps()
            )));
        }
        Ok(())
    }
}
