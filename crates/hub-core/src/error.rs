//! Error types for hub-core

/// Result type for hub-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in hub-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The document does not have the shape an operation requires
    #[error("Configuration shape error: {message}")]
    ConfigShape { message: String },

    /// A name that should identify a component does not
    #[error("Unknown component: {name}")]
    UnknownComponent { name: String },

    /// One or more semantic rules were violated
    #[error("Configuration validation failed: {}", errors.join("; "))]
    Validation { errors: Vec<String> },
}

impl Error {
    pub fn shape(message: impl Into<String>) -> Self {
        Self::ConfigShape {
            message: message.into(),
        }
    }
}
