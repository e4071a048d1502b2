//! Error types for hub-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from hub-core
    #[error(transparent)]
    Core(#[from] hub_core::Error),

    /// Error from hub-fs
    #[error(transparent)]
    Fs(#[from] hub_fs::Error),

    /// Failed to write JSON output
    #[error("Failed to encode JSON output: {0}")]
    Json(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }

    /// The hub-core error behind this one, if any.
    pub fn core(&self) -> Option<&hub_core::Error> {
        match self {
            CliError::Core(e) => Some(e),
            CliError::Fs(hub_fs::Error::Core(e)) => Some(e),
            _ => None,
        }
    }
}
