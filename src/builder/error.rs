//! Errors raised while building a machine.

use crate::core::InvalidStateId;
use thiserror::Error;

/// A single defect found in a machine definition.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DefinitionProblem {
    #[error("edges must contain at least one edge")]
    NoEdges,

    #[error("edges[{index}].from: {reason}")]
    InvalidFrom { index: usize, reason: InvalidStateId },

    #[error("edges[{index}].to[{position}]: {reason}")]
    InvalidTarget {
        index: usize,
        position: usize,
        reason: InvalidStateId,
    },

    #[error("edges[{index}].to: target list is empty")]
    EmptyTargetSet { index: usize },

    #[error("initial: {reason}")]
    InvalidInitial { reason: InvalidStateId },

    #[error("current: {reason}")]
    InvalidCurrent { reason: InvalidStateId },

    #[error("callbacks registered for {state:?}, which no edge mentions")]
    UnknownCallbackState { state: String },

    #[error("history_limit must be at least 1")]
    ZeroHistoryLimit,
}

/// Errors that can occur when building a machine.
///
/// Construction either yields a complete machine or one of these; there is
/// no partially built machine.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("malformed machine definition: {0}")]
    Malformed(String),

    #[error("invalid machine definition: {}", join(.problems))]
    Invalid { problems: Vec<DefinitionProblem> },
}

impl ConfigurationError {
    /// Every problem found, empty for [`ConfigurationError::Malformed`].
    pub fn problems(&self) -> &[DefinitionProblem] {
        match self {
            Self::Malformed(_) => &[],
            Self::Invalid { problems } => problems,
        }
    }
}

fn join(problems: &[DefinitionProblem]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
