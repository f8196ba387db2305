//! Core value types of the state machine.
//!
//! This module contains the data the engine works on:
//! - State names via [`StateId`]
//! - The edge table via [`Edge`] and [`Targets`]
//! - Transition history via [`StateHistory`]
//!
//! Nothing here holds callbacks or runs side effects.

mod edge;
mod history;
mod state;

pub use edge::{Edge, Targets};
pub use history::{StateHistory, StateTransition};
pub use state::{InvalidStateId, StateId};
