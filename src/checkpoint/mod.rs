//! Snapshots of a machine's runtime state.
//!
//! A snapshot captures where a machine is (its current state and history),
//! not what it is: edges and callbacks stay in code. Restoring a snapshot
//! into a machine built from the same definition resumes it where it left
//! off.

use crate::core::{StateHistory, StateId};
use crate::engine::Machine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

pub mod error;

pub use error::SnapshotError;

/// Version identifier for snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable record of a machine's runtime state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Snapshot format version
    pub version: u32,

    /// Unique snapshot identifier
    pub id: Uuid,

    /// When the snapshot was taken
    pub timestamp: DateTime<Utc>,

    /// Current state, unset for a machine that never transitioned
    pub current: Option<StateId>,

    /// Retained transition history
    pub history: StateHistory,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self).map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(text: &str) -> Result<Self, SnapshotError> {
        serde_json::from_str(text).map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))
    }

    /// Compact binary encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(self).map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        bincode::deserialize(bytes).map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))
    }
}

impl<P> Machine<P> {
    /// Capture the current state and history.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            version: SNAPSHOT_VERSION,
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            current: self.current().cloned(),
            history: self.history().clone(),
        }
    }

    /// Replace the current state and history with a snapshot's.
    ///
    /// No callbacks run. The machine keeps its own history limit; older
    /// records beyond it are dropped.
    pub fn restore(&mut self, snapshot: Snapshot) -> Result<(), SnapshotError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: snapshot.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        if self.is_transitioning() {
            return Err(SnapshotError::TransitionInProgress);
        }

        let mut history = match self.history().limit() {
            Some(limit) => StateHistory::bounded(limit),
            None => StateHistory::new(),
        };
        for transition in snapshot.history.transitions() {
            history.record(transition.clone());
        }

        debug!(id = %snapshot.id, current = ?snapshot.current, "restoring snapshot");
        self.reset_runtime(snapshot.current, history);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edges;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn walked() -> Machine<()> {
        let mut machine: Machine<()> = Machine::builder()
            .edges(edges!["A" => "B", "B" => "C", "C" => "A"])
            .initial("A")
            .build()
            .unwrap();
        machine.next(&()).unwrap();
        machine.next(&()).unwrap();
        machine
    }

    fn fresh() -> Machine<()> {
        Machine::builder()
            .edges(edges!["A" => "B", "B" => "C", "C" => "A"])
            .initial("A")
            .build()
            .unwrap()
    }

    #[test]
    fn snapshot_captures_runtime_state() {
        let snapshot = walked().snapshot();

        assert_eq!(snapshot.version, SNAPSHOT_VERSION);
        assert_eq!(snapshot.current, Some(StateId::new("C").unwrap()));
        assert_eq!(snapshot.history.len(), 2);
    }

    #[test]
    fn json_round_trip_resumes_machine() {
        let json = walked().snapshot().to_json().unwrap();

        let mut machine = fresh();
        machine.restore(Snapshot::from_json(&json).unwrap()).unwrap();

        assert_eq!(machine.current().unwrap(), "C");
        assert_eq!(machine.last(0).unwrap(), "B");
        assert_eq!(machine.last(1).unwrap(), "A");

        machine.next(&()).unwrap();
        assert_eq!(machine.current().unwrap(), "A");
    }

    #[test]
    fn binary_round_trip_preserves_snapshot() {
        let snapshot = walked().snapshot();
        let bytes = snapshot.to_bytes().unwrap();

        assert_eq!(Snapshot::from_bytes(&bytes).unwrap(), snapshot);
    }

    #[test]
    fn restore_rejects_unknown_version() {
        let mut snapshot = walked().snapshot();
        snapshot.version = 99;

        let mut machine = fresh();
        let result = machine.restore(snapshot);

        assert!(matches!(
            result,
            Err(SnapshotError::UnsupportedVersion {
                found: 99,
                supported: SNAPSHOT_VERSION
            })
        ));
        assert_eq!(machine.current().unwrap(), "A");
    }

    #[test]
    fn restore_applies_machine_history_limit() {
        let snapshot = walked().snapshot();

        let mut machine: Machine<()> = Machine::builder()
            .edges(edges!["A" => "B", "B" => "C", "C" => "A"])
            .history_limit(1)
            .build()
            .unwrap();
        machine.restore(snapshot).unwrap();

        assert_eq!(machine.history().len(), 1);
        assert_eq!(machine.last(0).unwrap(), "B");
        assert!(machine.last(1).is_none());
    }

    #[test]
    fn restore_runs_no_callbacks() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut machine: Machine<()> = Machine::builder()
            .edges(edges!["A" => "B", "B" => "C", "C" => "A"])
            .on_enter("C", move |_: &mut Machine<()>, _| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .build()
            .unwrap();
        machine.restore(walked().snapshot()).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(machine.current().unwrap(), "C");
    }

    #[test]
    fn restore_is_refused_during_transition() {
        let outcome = Arc::new(std::sync::Mutex::new(None));
        let record = Arc::clone(&outcome);
        let snapshot = fresh().snapshot();

        let mut machine: Machine<()> = Machine::builder()
            .edges(edges!["A" => "B"])
            .initial("A")
            .on_enter("B", move |m: &mut Machine<()>, _| {
                let refused = matches!(
                    m.restore(snapshot.clone()),
                    Err(SnapshotError::TransitionInProgress)
                );
                *record.lock().unwrap() = Some(refused);
            })
            .build()
            .unwrap();

        machine.transition("B", &()).unwrap();

        assert_eq!(*outcome.lock().unwrap(), Some(true));
        assert_eq!(machine.current().unwrap(), "B");
    }
}
