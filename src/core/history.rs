//! Transition history.
//!
//! Every completed transition is recorded with the state it left, the
//! state it entered and when it happened. The log is append-only and may be
//! bounded, in which case the oldest records fall off the front.

use super::state::StateId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Record of a single completed transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateTransition {
    /// The state that was departed
    pub from: StateId,
    /// The state that was entered
    pub to: StateId,
    /// When the transition completed
    pub timestamp: DateTime<Utc>,
}

impl StateTransition {
    pub fn now(from: StateId, to: StateId) -> Self {
        Self {
            from,
            to,
            timestamp: Utc::now(),
        }
    }
}

/// Ordered log of completed transitions, oldest first.
///
/// # Example
///
/// ```rust
/// use statewalk::core::{StateHistory, StateId, StateTransition};
///
/// let id = |s: &str| StateId::new(s).unwrap();
///
/// let mut history = StateHistory::new();
/// history.record(StateTransition::now(id("A"), id("B")));
/// history.record(StateTransition::now(id("B"), id("C")));
///
/// assert_eq!(history.last(0), Some(&id("B")));
/// assert_eq!(history.last(1), Some(&id("A")));
/// assert_eq!(history.last(2), None);
/// assert_eq!(history.path().len(), 3); // A -> B -> C
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StateHistory {
    transitions: VecDeque<StateTransition>,
    limit: Option<usize>,
}

impl StateHistory {
    /// Create an empty, unbounded history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty history that retains at most `limit` records.
    pub fn bounded(limit: usize) -> Self {
        Self {
            transitions: VecDeque::new(),
            limit: Some(limit),
        }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Append a transition, evicting the oldest record if over the limit.
    pub fn record(&mut self, transition: StateTransition) {
        self.transitions.push_back(transition);
        if let Some(limit) = self.limit {
            while self.transitions.len() > limit {
                self.transitions.pop_front();
            }
        }
    }

    /// The `index_from_top`-th most recently departed state.
    ///
    /// `0` is the state left by the latest transition. Returns `None` when
    /// fewer records are retained.
    pub fn last(&self, index_from_top: usize) -> Option<&StateId> {
        self.transitions
            .iter()
            .rev()
            .nth(index_from_top)
            .map(|transition| &transition.from)
    }

    /// Departed states, oldest first.
    pub fn departed(&self) -> impl Iterator<Item = &StateId> {
        self.transitions.iter().map(|transition| &transition.from)
    }

    /// States traversed: the first departed state, then every state entered.
    pub fn path(&self) -> Vec<&StateId> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.front() {
            path.push(&first.from);
        }
        path.extend(self.transitions.iter().map(|transition| &transition.to));
        path
    }

    /// Time between the first and last retained transitions.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.transitions.front()?, self.transitions.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn transitions(&self) -> impl Iterator<Item = &StateTransition> {
        self.transitions.iter()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
