//! Error types for the rl-games crate

use thiserror::Error;

/// Main error type for the rl-games crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid state for {operation}: {state}")]
    InvalidState { operation: String, state: String },

    #[error("illegal action {action} in state {state}")]
    IllegalAction { action: String, state: String },

    #[error("no legal actions to choose from")]
    NoLegalActions,

    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("could not read '{input}' (expected {expected})")]
    InvalidInput { input: String, expected: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },

    #[error("unsupported policy format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("policy was trained for '{found}', cannot load it for '{expected}'")]
    ArtifactMismatch { expected: String, found: String },

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

impl Error {
    /// Shorthand for building an [`Error::InvalidConfig`].
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Error::InvalidConfig {
            message: message.into(),
        }
    }

    /// Whether a human typing this move should simply be asked again.
    pub fn is_recoverable_input(&self) -> bool {
        matches!(self, Error::InvalidInput { .. } | Error::IllegalAction { .. })
    }
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
