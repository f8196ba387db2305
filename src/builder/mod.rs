//! Building machines from declarative definitions.
//!
//! A machine can be described three ways, all validated by the same pass:
//! - the fluent [`MachineBuilder`]
//! - a [`MachineDefinition`] value, typically deserialized from JSON
//! - the [`edges!`](crate::edges) macro for the edge list

pub mod definition;
pub mod error;
pub mod machine;
pub mod macros;

pub use definition::{EdgeSpec, MachineDefinition, TargetSpec};
pub use error::{ConfigurationError, DefinitionProblem};
pub use machine::MachineBuilder;
