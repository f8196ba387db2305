//! Statewalk: a small edge-table finite state machine
//!
//! A machine is described by a list of allowed transitions ("edges") plus
//! optional enter/exit callbacks per state. It tracks the current state,
//! rejects moves the edge table does not allow, runs callbacks with a
//! caller-supplied payload and keeps a history of departed states.
//!
//! # Core Concepts
//!
//! - **Edges**: `from => to` pairs where `to` is one state or a set
//! - **Callbacks**: `on_enter`/`on_exit` slots, reassignable at any time
//! - **History**: departed states, queried with [`Machine::last`]
//! - **Next**: [`Machine::next`] follows the only outgoing edge, if unique
//!
//! # Example
//!
//! ```rust
//! use statewalk::{edges, Machine};
//! use std::sync::{Arc, Mutex};
//!
//! let log = Arc::new(Mutex::new(Vec::new()));
//! let exits = Arc::clone(&log);
//! let enters = Arc::clone(&log);
//!
//! let mut machine: Machine<String> = Machine::builder()
//!     .edges(edges!["title" => ["playing", "options"], "playing" => "title"])
//!     .initial("title")
//!     .on_exit("title", move |m: &mut Machine<String>, why: &String| {
//!         exits.lock().unwrap().push(format!("leave {} ({why})", m.from().unwrap()));
//!     })
//!     .on_enter("playing", move |m: &mut Machine<String>, _: &String| {
//!         enters.lock().unwrap().push(format!("enter {}", m.to().unwrap()));
//!     })
//!     .build()
//!     .unwrap();
//!
//! machine.transition("playing", &"start pressed".to_string()).unwrap();
//! assert!(machine.transition("options", &String::new()).is_err());
//!
//! assert_eq!(machine.current().unwrap(), "playing");
//! assert_eq!(machine.last(0).unwrap(), "title");
//! assert_eq!(
//!     *log.lock().unwrap(),
//!     vec!["leave title (start pressed)", "enter playing"]
//! );
//! ```

pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod engine;

// Re-export commonly used types
pub use builder::{
    ConfigurationError, DefinitionProblem, EdgeSpec, MachineBuilder, MachineDefinition, TargetSpec,
};
pub use checkpoint::{Snapshot, SnapshotError};
pub use crate::core::{Edge, StateHistory, StateId, StateTransition, Targets};
pub use engine::{BoundTransition, Machine, StateDefinition, TransitionError};
