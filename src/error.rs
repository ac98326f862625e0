//! Error types for task, profile and suggestion operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while managing tasks and progression state.
#[derive(Error, Debug)]
pub enum TickitError {
    /// No task matches the given id or reference.
    #[error("task '{0}' not found")]
    TaskNotFound(String),

    /// A task reference matched more than one task.
    #[error("'{query}' matches {count} tasks, use a longer id prefix")]
    AmbiguousTask { query: String, count: usize },

    /// User-supplied value could not be accepted.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Reading or writing the backing store failed.
    #[error("storage error at {}: {source}", path.display())]
    Store {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// The suggestion service answered with something unusable.
    #[error("suggestion service error: {0}")]
    Suggestion(String),

    /// Transport failure talking to the suggestion service.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error (invalid env vars or flags)
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for tickit operations.
pub type Result<T> = std::result::Result<T, TickitError>;
