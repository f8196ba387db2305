//! The state machine and its transition engine.

use crate::builder::{ConfigurationError, MachineBuilder, MachineDefinition};
use crate::core::{Edge, StateHistory, StateId, StateTransition};
use crate::engine::transition::{BoundTransition, Callback, StateDefinition, TransitionError};
use std::collections::BTreeMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use tracing::{error, trace, warn};

/// What the machine is doing right now.
#[derive(Clone, Debug, PartialEq)]
enum Phase {
    Idle,
    /// First transition of an unstarted machine.
    Entering(StateId),
    Switching {
        from: StateId,
        to: StateId,
    },
}

impl Phase {
    fn in_flight(&self) -> Option<&StateId> {
        match self {
            Self::Idle => None,
            Self::Entering(to) | Self::Switching { to, .. } => Some(to),
        }
    }
}

/// Finite state machine driven by an edge table.
///
/// `P` is the payload type handed to every enter/exit callback alongside
/// the machine itself.
///
/// # Example
///
/// ```rust
/// use statewalk::{edges, Machine};
///
/// let mut machine: Machine = Machine::builder()
///     .edges(edges!["A" => ["B", "C"], "B" => "C"])
///     .initial("A")
///     .build()
///     .unwrap();
///
/// machine.transition("B", &()).unwrap();
/// machine.next(&()).unwrap();
///
/// assert_eq!(machine.current().unwrap(), "C");
/// assert_eq!(machine.last(0).unwrap(), "B");
/// assert_eq!(machine.last(1).unwrap(), "A");
/// ```
pub struct Machine<P = ()> {
    edges: Vec<Edge>,
    states: BTreeMap<StateId, StateDefinition<P>>,
    current: Option<StateId>,
    phase: Phase,
    history: StateHistory,
}

impl<P> Machine<P> {
    /// Start describing a machine.
    pub fn builder() -> MachineBuilder<P> {
        MachineBuilder::new()
    }

    /// Build a machine without callbacks from a declarative definition.
    pub fn from_definition(definition: MachineDefinition) -> Result<Self, ConfigurationError> {
        MachineBuilder::new().definition(definition).build()
    }

    /// Build a machine without callbacks from a JSON definition.
    pub fn from_json(text: &str) -> Result<Self, ConfigurationError> {
        Self::from_definition(MachineDefinition::from_json(text)?)
    }

    /// Assemble a machine from already validated parts.
    pub(crate) fn from_parts(
        edges: Vec<Edge>,
        states: BTreeMap<StateId, StateDefinition<P>>,
        current: Option<StateId>,
        history: StateHistory,
    ) -> Self {
        Self {
            edges,
            states,
            current,
            phase: Phase::Idle,
            history,
        }
    }

    pub fn current(&self) -> Option<&StateId> {
        self.current.as_ref()
    }

    /// The `index_from_top`-th most recently departed state.
    pub fn last(&self, index_from_top: usize) -> Option<&StateId> {
        self.history.last(index_from_top)
    }

    /// State being left, while a transition's callbacks run.
    pub fn from(&self) -> Option<&StateId> {
        match &self.phase {
            Phase::Switching { from, .. } => Some(from),
            _ => None,
        }
    }

    /// State being entered, while a transition's callbacks run.
    pub fn to(&self) -> Option<&StateId> {
        match &self.phase {
            Phase::Switching { to, .. } => Some(to),
            _ => None,
        }
    }

    pub fn is_transitioning(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn history(&self) -> &StateHistory {
        &self.history
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Every state named by the edge table, in name order.
    pub fn states(&self) -> impl Iterator<Item = &StateDefinition<P>> {
        self.states.values()
    }

    pub fn state(&self, name: &str) -> Option<&StateDefinition<P>> {
        self.states.get(name)
    }

    /// Callback slots of `name`, for reassignment.
    pub fn state_mut(&mut self, name: &str) -> Option<&mut StateDefinition<P>> {
        self.states.get_mut(name)
    }

    /// Transition handle with `name` fixed as the target.
    pub fn bound(&self, name: &str) -> Option<BoundTransition> {
        self.states.get(name).map(StateDefinition::bound)
    }

    /// The single deterministic successor of the current state.
    ///
    /// `None` when the machine has not started, when the current state has
    /// zero or several outgoing edges, or when its only edge fans out to a
    /// set of states.
    pub fn next_candidate(&self) -> Option<&StateId> {
        let current = self.current.as_ref()?;
        let mut outgoing = self.edges.iter().filter(|edge| edge.from == *current);
        let edge = outgoing.next()?;
        if outgoing.next().is_some() {
            return None;
        }
        edge.to.single()
    }

    /// All states reachable in one step, in first-declared order.
    pub fn candidates(&self) -> Vec<&StateId> {
        let Some(current) = self.current.as_ref() else {
            return Vec::new();
        };

        let mut candidates: Vec<&StateId> = Vec::new();
        for target in self
            .edges
            .iter()
            .filter(|edge| edge.from == *current)
            .flat_map(|edge| edge.to.iter())
        {
            if !candidates.contains(&target) {
                candidates.push(target);
            }
        }
        candidates
    }

    /// Whether the edge table would accept a move to `target` right now.
    pub fn can_transition(&self, target: &str) -> bool {
        let Ok(target) = StateId::new(target) else {
            return false;
        };
        match &self.current {
            None => true,
            Some(current) => self.find_edge(current, &target).is_some(),
        }
    }

    /// Move to `target`, running exit and enter callbacks with `payload`.
    ///
    /// An unstarted machine accepts any well-formed target. Otherwise the
    /// first edge leading from the current state to `target` is used.
    pub fn transition(&mut self, target: &str, payload: &P) -> Result<(), TransitionError> {
        match StateId::new(target) {
            Ok(target) => self.transition_to(target, payload),
            Err(reason) => {
                error!(requested = target, %reason, "rejected transition target");
                Err(TransitionError::InvalidArgument {
                    target: target.to_string(),
                    reason,
                })
            }
        }
    }

    /// [`Machine::transition`] for an already validated target.
    pub fn transition_to(&mut self, target: StateId, payload: &P) -> Result<(), TransitionError> {
        if let Some(in_flight) = self.phase.in_flight() {
            warn!(requested = %target, in_flight = %in_flight, "reentrant transition rejected");
            return Err(TransitionError::TransitionInProgress {
                requested: target,
                in_flight: in_flight.clone(),
            });
        }

        let Some(current) = self.current.clone() else {
            self.bootstrap(target, payload);
            return Ok(());
        };

        if self.find_edge(&current, &target).is_none() {
            error!(from = %current, to = %target, "invalid transition");
            return Err(TransitionError::InvalidTransition {
                from: current,
                to: target,
            });
        }

        self.phase = Phase::Switching {
            from: current.clone(),
            to: target.clone(),
        };
        self.guarded(|machine| {
            if let Some(on_exit) = machine.exit_hook(&current) {
                on_exit(&mut *machine, payload);
            }
            if let Some(on_enter) = machine.enter_hook(&target) {
                on_enter(&mut *machine, payload);
            }
        });

        trace!(from = %current, to = %target, "transition");
        self.history
            .record(StateTransition::now(current, target.clone()));
        self.current = Some(target);
        Ok(())
    }

    /// Move to the single candidate successor, if there is one.
    pub fn next(&mut self, payload: &P) -> Result<(), TransitionError> {
        if let Some(target) = self.next_candidate().cloned() {
            return self.transition_to(target, payload);
        }

        let choices: Vec<StateId> = self.candidates().into_iter().cloned().collect();
        match &self.current {
            Some(current) => warn!(current = %current, ?choices, "next() has no unique candidate"),
            None => warn!("next() called before the machine has a current state"),
        }
        Err(TransitionError::AmbiguousNext {
            current: self.current.clone(),
            choices,
        })
    }

    fn bootstrap(&mut self, target: StateId, payload: &P) {
        self.phase = Phase::Entering(target.clone());
        self.guarded(|machine| {
            if let Some(on_enter) = machine.enter_hook(&target) {
                on_enter(&mut *machine, payload);
            }
        });

        trace!(to = %target, "initial transition");
        self.current = Some(target);
    }

    /// Run callbacks, returning the machine to idle even if one panics.
    fn guarded(&mut self, callbacks: impl FnOnce(&mut Self)) {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| callbacks(&mut *self)));
        let phase = std::mem::replace(&mut self.phase, Phase::Idle);
        if let Err(cause) = outcome {
            error!(?phase, "transition callback panicked; state left unchanged");
            panic::resume_unwind(cause);
        }
    }

    fn find_edge(&self, from: &StateId, to: &StateId) -> Option<&Edge> {
        self.edges.iter().find(|edge| edge.allows(from, to))
    }

    fn enter_hook(&self, state: &StateId) -> Option<Callback<P>> {
        self.states.get(state).and_then(|s| s.on_enter.clone())
    }

    fn exit_hook(&self, state: &StateId) -> Option<Callback<P>> {
        self.states.get(state).and_then(|s| s.on_exit.clone())
    }

    /// Overwrite the runtime record. Only valid while idle.
    pub(crate) fn reset_runtime(&mut self, current: Option<StateId>, history: StateHistory) {
        self.current = current;
        self.history = history;
    }
}

impl<P> fmt::Debug for Machine<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("current", &self.current)
            .field("phase", &self.phase)
            .field("states", &self.states.keys().collect::<Vec<_>>())
            .field("edges", &self.edges.len())
            .field("history", &self.history.len())
            .finish()
    }
}
