//! Errors in the library.
use thiserror::Error;

/// Errors returned by replay buffers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReplayBufferError {
    /// The buffer was configured with a zero capacity or batch size.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A batch was requested before any record was added.
    #[error("Cannot sample from an empty replay buffer")]
    EmptyBuffer,
}
