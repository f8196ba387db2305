//! State identifiers.
//!
//! Every state a machine can occupy is named by a [`StateId`]: a non-empty
//! token of printable, non-whitespace characters. Ids are validated once at
//! the boundary so the rest of the machine can compare them freely.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use thiserror::Error;

/// Reasons a piece of text is not a usable state name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvalidStateId {
    #[error("state name is empty")]
    Empty,

    #[error("state name {0:?} contains whitespace or control characters")]
    NotPrintable(String),
}

/// Validated name of a state.
///
/// # Example
///
/// ```rust
/// use statewalk::core::StateId;
///
/// let menu = StateId::new("menu").unwrap();
/// assert_eq!(menu.as_str(), "menu");
///
/// assert!(StateId::new("").is_err());
/// assert!(StateId::new("main menu").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StateId(String);

impl StateId {
    /// Validate `name` and wrap it.
    pub fn new(name: impl Into<String>) -> Result<Self, InvalidStateId> {
        let name = name.into();
        if name.is_empty() {
            return Err(InvalidStateId::Empty);
        }
        if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(InvalidStateId::NotPrintable(name));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StateId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for StateId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for StateId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for StateId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl TryFrom<String> for StateId {
    type Error = InvalidStateId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for StateId {
    type Error = InvalidStateId;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StateId> for String {
    fn from(id: StateId) -> Self {
        id.0
    }
}
