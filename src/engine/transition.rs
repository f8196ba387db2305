//! Per-state callback slots and transition errors.

use crate::core::{InvalidStateId, StateId};
use crate::engine::machine::Machine;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Lifecycle callback invoked with the machine and the caller's payload.
pub type Callback<P> = Arc<dyn Fn(&mut Machine<P>, &P) + Send + Sync>;

/// Errors reported by [`Machine::transition`] and [`Machine::next`].
///
/// None of these leave the machine changed.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransitionError {
    #[error("invalid transition target {target:?}: {reason}")]
    InvalidArgument {
        target: String,
        reason: InvalidStateId,
    },

    #[error("no edge from '{from}' to '{to}'")]
    InvalidTransition { from: StateId, to: StateId },

    #[error("no unique next state from {}: candidates {choices:?}", describe(.current))]
    AmbiguousNext {
        current: Option<StateId>,
        choices: Vec<StateId>,
    },

    #[error("cannot start transition to '{requested}' while entering '{in_flight}'")]
    TransitionInProgress {
        requested: StateId,
        in_flight: StateId,
    },
}

fn describe(current: &Option<StateId>) -> String {
    match current {
        Some(state) => format!("'{state}'"),
        None => "an unstarted machine".to_string(),
    }
}

/// Callback slots of a single state.
///
/// Slots stay mutable for the life of the machine. Replacing a slot from
/// inside a running callback only affects later lookups; the invocation
/// already under way runs to completion.
pub struct StateDefinition<P> {
    id: StateId,
    pub on_enter: Option<Callback<P>>,
    pub on_exit: Option<Callback<P>>,
}

impl<P> StateDefinition<P> {
    pub(crate) fn new(id: StateId) -> Self {
        Self {
            id,
            on_enter: None,
            on_exit: None,
        }
    }

    pub fn id(&self) -> &StateId {
        &self.id
    }

    pub fn set_on_enter<F>(&mut self, callback: F)
    where
        F: Fn(&mut Machine<P>, &P) + Send + Sync + 'static,
    {
        self.on_enter = Some(Arc::new(callback));
    }

    pub fn set_on_exit<F>(&mut self, callback: F)
    where
        F: Fn(&mut Machine<P>, &P) + Send + Sync + 'static,
    {
        self.on_exit = Some(Arc::new(callback));
    }

    /// Handle that transitions a machine into this state.
    pub fn bound(&self) -> BoundTransition {
        BoundTransition {
            target: self.id.clone(),
        }
    }
}

impl<P> Clone for StateDefinition<P> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            on_enter: self.on_enter.clone(),
            on_exit: self.on_exit.clone(),
        }
    }
}

impl<P> fmt::Debug for StateDefinition<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateDefinition")
            .field("id", &self.id)
            .field("on_enter", &self.on_enter.is_some())
            .field("on_exit", &self.on_exit.is_some())
            .finish()
    }
}

/// A transition with its target fixed.
///
/// # Example
///
/// ```rust
/// use statewalk::{edges, Machine};
///
/// let mut machine: Machine = Machine::builder()
///     .edges(edges!["menu" => "playing", "playing" => "menu"])
///     .initial("menu")
///     .build()
///     .unwrap();
///
/// let play = machine.bound("playing").unwrap();
/// play.transition(&mut machine, &()).unwrap();
/// assert_eq!(machine.current().unwrap(), "playing");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoundTransition {
    target: StateId,
}

impl BoundTransition {
    pub fn target(&self) -> &StateId {
        &self.target
    }

    pub fn transition<P>(&self, machine: &mut Machine<P>, payload: &P) -> Result<(), TransitionError> {
        machine.transition_to(self.target.clone(), payload)
    }
}
