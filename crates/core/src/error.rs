//! Core Error Types
//!
//! Error type shared by the template pipeline. Kept dependency-free
//! (thiserror + std) so the core crate stays lightweight; the application
//! crate wraps it in `AppError`.

use thiserror::Error;

/// Core error type for the Prompt Forge workspace.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Validation errors (e.g. required fields left empty)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unknown field type or other unparsable input
    #[error("Parse error: {0}")]
    Parse(String),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for core errors
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

/// Convert CoreError to a string
impl From<CoreError> for String {
    fn from(err: CoreError) -> String {
        err.to_string()
    }
}
