//! Builder for constructing machines.

use crate::builder::definition::{EdgeSpec, MachineDefinition, TargetSpec};
use crate::builder::error::ConfigurationError;
use crate::core::{Edge, StateHistory, StateId};
use crate::engine::{Callback, Machine, StateDefinition};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

struct Hooks<P> {
    on_enter: Option<Callback<P>>,
    on_exit: Option<Callback<P>>,
}

impl<P> Default for Hooks<P> {
    fn default() -> Self {
        Self {
            on_enter: None,
            on_exit: None,
        }
    }
}

/// Builder for constructing machines with a fluent API.
///
/// Nothing is validated until [`MachineBuilder::build`], which reports every
/// problem with the definition at once.
pub struct MachineBuilder<P> {
    definition: MachineDefinition,
    hooks: BTreeMap<String, Hooks<P>>,
}

impl<P> MachineBuilder<P> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            definition: MachineDefinition::default(),
            hooks: BTreeMap::new(),
        }
    }

    /// Start from a declarative definition, replacing any edges and
    /// starting state set so far. Registered callbacks are kept.
    pub fn definition(mut self, definition: MachineDefinition) -> Self {
        self.definition = definition;
        self
    }

    /// Allow moving from `from` to `to` (one state or a list of states).
    pub fn edge(mut self, from: impl Into<String>, to: impl Into<TargetSpec>) -> Self {
        self.definition.edges.push(EdgeSpec::new(from, to));
        self
    }

    /// Add several edges at once.
    pub fn edges(mut self, edges: impl IntoIterator<Item = EdgeSpec>) -> Self {
        self.definition.edges.extend(edges);
        self
    }

    pub fn initial(mut self, state: impl Into<String>) -> Self {
        self.definition.initial = Some(state.into());
        self
    }

    /// Start in `state`; wins over [`MachineBuilder::initial`].
    pub fn current(mut self, state: impl Into<String>) -> Self {
        self.definition.current = Some(state.into());
        self
    }

    /// Keep at most `limit` history records.
    pub fn history_limit(mut self, limit: usize) -> Self {
        self.definition.history_limit = Some(limit);
        self
    }

    pub fn on_enter<F>(mut self, state: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&mut Machine<P>, &P) + Send + Sync + 'static,
    {
        self.hooks.entry(state.into()).or_default().on_enter = Some(Arc::new(callback));
        self
    }

    pub fn on_exit<F>(mut self, state: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&mut Machine<P>, &P) + Send + Sync + 'static,
    {
        self.hooks.entry(state.into()).or_default().on_exit = Some(Arc::new(callback));
        self
    }

    /// Validate the definition and build the machine.
    pub fn build(self) -> Result<Machine<P>, ConfigurationError> {
        let validated = self
            .definition
            .validate(self.hooks.keys().map(String::as_str))?;

        let mut states: BTreeMap<StateId, StateDefinition<P>> = BTreeMap::new();
        for state in validated.edges.iter().flat_map(Edge::states) {
            states
                .entry(state.clone())
                .or_insert_with(|| StateDefinition::new(state.clone()));
        }

        for (name, hooks) in self.hooks {
            if let Some(definition) = states.get_mut(name.as_str()) {
                definition.on_enter = hooks.on_enter;
                definition.on_exit = hooks.on_exit;
            }
        }

        let history = match validated.history_limit {
            Some(limit) => StateHistory::bounded(limit),
            None => StateHistory::new(),
        };

        debug!(
            edges = validated.edges.len(),
            states = states.len(),
            current = ?validated.current,
            "machine built"
        );
        Ok(Machine::from_parts(
            validated.edges,
            states,
            validated.current,
            history,
        ))
    }
}

impl<P> Default for MachineBuilder<P> {
    fn default() -> Self {
        Self::new()
    }
}
