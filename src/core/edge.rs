//! Edges of the transition table.

use super::state::StateId;
use serde::{Deserialize, Serialize};

/// Target side of an edge: one state or a set of states.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Targets {
    Single(StateId),
    /// Two or more distinct states, in declaration order.
    Set(Vec<StateId>),
}

impl Targets {
    /// Normalize a list of targets.
    ///
    /// Duplicates are dropped (first occurrence wins) and a list that ends
    /// up with one member becomes [`Targets::Single`]. Returns `None` for an
    /// empty list.
    pub fn from_list(states: Vec<StateId>) -> Option<Self> {
        let mut unique: Vec<StateId> = Vec::with_capacity(states.len());
        for state in states {
            if !unique.contains(&state) {
                unique.push(state);
            }
        }

        match unique.len() {
            0 => None,
            1 => unique.pop().map(Self::Single),
            _ => Some(Self::Set(unique)),
        }
    }

    pub fn contains(&self, state: &StateId) -> bool {
        match self {
            Self::Single(target) => target == state,
            Self::Set(targets) => targets.contains(state),
        }
    }

    /// The target when exactly one is declared.
    pub fn single(&self) -> Option<&StateId> {
        match self {
            Self::Single(target) => Some(target),
            Self::Set(_) => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &StateId> {
        let slice = match self {
            Self::Single(target) => std::slice::from_ref(target),
            Self::Set(targets) => targets.as_slice(),
        };
        slice.iter()
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Set(targets) => targets.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One or more allowed transitions sharing a source state.
///
/// # Example
///
/// ```rust
/// use statewalk::core::{Edge, StateId, Targets};
///
/// let a = StateId::new("A").unwrap();
/// let b = StateId::new("B").unwrap();
/// let c = StateId::new("C").unwrap();
///
/// let edge = Edge::new(a.clone(), Targets::from_list(vec![b.clone(), c]).unwrap());
/// assert!(edge.allows(&a, &b));
/// assert!(!edge.allows(&b, &a));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub from: StateId,
    pub to: Targets,
}

impl Edge {
    pub fn new(from: StateId, to: Targets) -> Self {
        Self { from, to }
    }

    /// Whether this edge permits moving from `from` to `to`.
    pub fn allows(&self, from: &StateId, to: &StateId) -> bool {
        self.from == *from && self.to.contains(to)
    }

    /// Every state named by this edge, source first.
    pub fn states(&self) -> impl Iterator<Item = &StateId> {
        std::iter::once(&self.from).chain(self.to.iter())
    }
}
