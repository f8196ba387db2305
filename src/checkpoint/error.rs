//! Snapshot error types.

use thiserror::Error;

/// Errors that can occur while taking or restoring snapshots
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Serialization to JSON or binary format failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Deserialization from JSON or binary format failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Snapshot version is not supported by this version
    #[error("Unsupported snapshot version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Restore was attempted from inside a transition callback
    #[error("Cannot restore while a transition is in progress")]
    TransitionInProgress,
}
