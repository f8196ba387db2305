//! The transition engine.
//!
//! This module holds the mutable half of the crate: the [`Machine`] that
//! tracks the current state, checks requested moves against the edge
//! table, runs exit and enter callbacks and records history.
//!
//! # Transition order
//!
//! For a move from `A` to `B`:
//! 1. `from()`/`to()` become `A`/`B`
//! 2. `A`'s exit callback runs
//! 3. `B`'s enter callback runs
//! 4. `A` is appended to history and `current()` becomes `B`
//! 5. `from()`/`to()` are cleared
//!
//! A machine with no current state accepts any first target and only runs
//! that target's enter callback.

mod machine;
mod transition;

pub use machine::Machine;
pub use transition::{BoundTransition, Callback, StateDefinition, TransitionError};
