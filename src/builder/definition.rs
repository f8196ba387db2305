//! Declarative machine definitions and their validation.
//!
//! A [`MachineDefinition`] is the untyped description of a machine, the
//! shape a caller writes by hand or loads from JSON. Validation turns it
//! into typed [`Edge`]s and reports every problem in one pass instead of
//! stopping at the first.

use crate::builder::error::{ConfigurationError, DefinitionProblem};
use crate::core::{Edge, StateId, Targets};
use serde::Deserialize;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Check = Validation<(), NonEmptyVec<DefinitionProblem>>;

/// Target side of an edge as written: one name or a list of names.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TargetSpec {
    One(String),
    Many(Vec<String>),
}

impl From<&str> for TargetSpec {
    fn from(name: &str) -> Self {
        Self::One(name.to_string())
    }
}

impl From<String> for TargetSpec {
    fn from(name: String) -> Self {
        Self::One(name)
    }
}

impl From<Vec<String>> for TargetSpec {
    fn from(names: Vec<String>) -> Self {
        Self::Many(names)
    }
}

impl From<Vec<&str>> for TargetSpec {
    fn from(names: Vec<&str>) -> Self {
        Self::Many(names.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for TargetSpec {
    fn from(names: [&str; N]) -> Self {
        Self::Many(names.iter().map(|name| name.to_string()).collect())
    }
}

/// One edge as written.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EdgeSpec {
    pub from: String,
    pub to: TargetSpec,
}

impl EdgeSpec {
    pub fn new(from: impl Into<String>, to: impl Into<TargetSpec>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Declarative description of a machine.
///
/// # Example
///
/// ```rust
/// use statewalk::builder::MachineDefinition;
///
/// let definition = MachineDefinition::from_json(
///     r#"{
///         "edges": [
///             { "from": "title", "to": ["playing", "options"] },
///             { "from": "options", "to": "title" }
///         ],
///         "initial": "title"
///     }"#,
/// )
/// .unwrap();
///
/// assert_eq!(definition.edges.len(), 2);
/// assert_eq!(definition.initial.as_deref(), Some("title"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MachineDefinition {
    pub edges: Vec<EdgeSpec>,
    #[serde(default)]
    pub initial: Option<String>,
    /// Takes precedence over `initial` when both are present.
    #[serde(default)]
    pub current: Option<String>,
    #[serde(default)]
    pub history_limit: Option<usize>,
}

/// Output of a successful validation pass.
#[derive(Debug)]
pub(crate) struct ValidatedDefinition {
    pub edges: Vec<Edge>,
    pub current: Option<StateId>,
    pub history_limit: Option<usize>,
}

impl MachineDefinition {
    /// Parse a definition from JSON. Unknown keys are rejected.
    pub fn from_json(text: &str) -> Result<Self, ConfigurationError> {
        serde_json::from_str(text).map_err(|e| ConfigurationError::Malformed(e.to_string()))
    }

    /// Check the definition's shape and produce typed edges.
    ///
    /// `callback_states` are the names callbacks were registered under;
    /// each must appear in some edge.
    pub(crate) fn validate<'a>(
        &self,
        callback_states: impl IntoIterator<Item = &'a str>,
    ) -> Result<ValidatedDefinition, ConfigurationError> {
        let mut checks: Vec<Check> = Vec::new();

        if self.edges.is_empty() {
            checks.push(Validation::fail(DefinitionProblem::NoEdges));
        }

        let mut edges = Vec::with_capacity(self.edges.len());
        for (index, spec) in self.edges.iter().enumerate() {
            let from = accept(
                &mut checks,
                StateId::new(spec.from.as_str())
                    .map_err(|reason| DefinitionProblem::InvalidFrom { index, reason }),
            );
            let to = parse_targets(&mut checks, index, &spec.to);
            if let (Some(from), Some(to)) = (from, to) {
                edges.push(Edge::new(from, to));
            }
        }

        let initial = self.initial.as_deref().and_then(|raw| {
            accept(
                &mut checks,
                StateId::new(raw).map_err(|reason| DefinitionProblem::InvalidInitial { reason }),
            )
        });
        let current = self.current.as_deref().and_then(|raw| {
            accept(
                &mut checks,
                StateId::new(raw).map_err(|reason| DefinitionProblem::InvalidCurrent { reason }),
            )
        });

        if self.history_limit == Some(0) {
            checks.push(Validation::fail(DefinitionProblem::ZeroHistoryLimit));
        }

        for state in callback_states {
            let known = self.edges.iter().any(|spec| spec.mentions(state));
            if !known {
                checks.push(Validation::fail(DefinitionProblem::UnknownCallbackState {
                    state: state.to_string(),
                }));
            }
        }

        match Validation::all_vec(checks).map(|_| ()) {
            Validation::Success(()) => Ok(ValidatedDefinition {
                edges,
                current: current.or(initial),
                history_limit: self.history_limit,
            }),
            Validation::Failure(errors) => Err(ConfigurationError::Invalid {
                problems: errors.iter().cloned().collect(),
            }),
        }
    }
}

impl EdgeSpec {
    fn mentions(&self, state: &str) -> bool {
        self.from == state
            || match &self.to {
                TargetSpec::One(name) => name == state,
                TargetSpec::Many(names) => names.iter().any(|name| name == state),
            }
    }
}

/// Record the outcome of one check, keeping the value when it passed.
fn accept<T>(checks: &mut Vec<Check>, result: Result<T, DefinitionProblem>) -> Option<T> {
    match result {
        Ok(value) => {
            checks.push(Validation::success(()));
            Some(value)
        }
        Err(problem) => {
            checks.push(Validation::fail(problem));
            None
        }
    }
}

fn parse_targets(checks: &mut Vec<Check>, index: usize, spec: &TargetSpec) -> Option<Targets> {
    let target = |position: usize, raw: &str| {
        StateId::new(raw).map_err(|reason| DefinitionProblem::InvalidTarget {
            index,
            position,
            reason,
        })
    };

    match spec {
        TargetSpec::One(raw) => accept(checks, target(0, raw)).map(Targets::Single),
        TargetSpec::Many(raws) if raws.is_empty() => {
            checks.push(Validation::fail(DefinitionProblem::EmptyTargetSet { index }));
            None
        }
        TargetSpec::Many(raws) => {
            let parsed: Vec<Option<StateId>> = raws
                .iter()
                .enumerate()
                .map(|(position, raw)| accept(checks, target(position, raw)))
                .collect();
            let states: Option<Vec<StateId>> = parsed.into_iter().collect();
            states.and_then(Targets::from_list)
        }
    }
}
