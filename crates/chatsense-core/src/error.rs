//! Error types for ChatSense

/// Result type alias using ChatSense's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for ChatSense operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Sentiment capability errors
    #[error("sentiment error: {0}")]
    Sentiment(String),

    /// Transcript loading errors (raised before analysis starts)
    #[error("failed to load transcript {path}: {reason}")]
    Load { path: String, reason: String },

    /// Filesystem errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML configuration errors
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Timeout errors
    #[error("operation timed out")]
    Timeout,

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new sentiment error
    pub fn sentiment(msg: impl Into<String>) -> Self {
        Self::Sentiment(msg.into())
    }

    /// Create a new load error for the given source path
    pub fn load(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Load {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
