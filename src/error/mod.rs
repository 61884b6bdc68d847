//! Error types for Colloquy.

use thiserror::Error;

/// Primary error type for all Colloquy operations.
#[derive(Error, Debug)]
pub enum ColloquyError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Not ready: {reason}")]
    ResourceNotReady { reason: String },

    #[error("Timed out after {attempts} attempts")]
    Timeout { attempts: u32 },

    #[error("Turn interrupted awaiting input (history {history_id}): {question}")]
    Interrupted {
        history_id: String,
        question: String,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ColloquyError {
    /// Create an API error from a status code and server message.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a not-ready error carrying the server-reported reason.
    pub fn not_ready(reason: impl Into<String>) -> Self {
        Self::ResourceNotReady {
            reason: reason.into(),
        }
    }

    /// Whether the underlying operation may still complete server-side.
    ///
    /// Only a client-side poll timeout leaves the server state undecided;
    /// every other variant is a definitive outcome.
    pub fn is_indeterminate(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Whether this error is a caller error (bad input, bad credentials)
    /// that retrying verbatim cannot fix.
    pub fn is_caller_error(&self) -> bool {
        match self {
            Self::Authentication(_) | Self::Configuration(_) => true,
            Self::Api { status, .. } => (400..500).contains(status),
            _ => false,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ColloquyError>;
