//! Shared error type for Trail crates.
//!
//! Lives at the bottom of the workspace so every crate can return it without
//! pulling in additional dependencies. Higher layers wrap it in richer error
//! enums where they need to.

use std::fmt;

/// Result alias over [`CommonError`].
pub type Result<T> = std::result::Result<T, CommonError>;

/// Common error type for Trail operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommonError {
    /// Input failed validation (empty id, unknown method name, ...)
    InvalidInput(String),

    /// A referenced entity does not exist
    NotFound(String),

    /// Serialization or deserialization failure
    Serialization(String),

    /// Anything else
    Other(String),
}

impl fmt::Display for CommonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommonError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            CommonError::NotFound(what) => write!(f, "Not found: {}", what),
            CommonError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            CommonError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for CommonError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let err = CommonError::InvalidInput("session key cannot be empty".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid input: session key cannot be empty"
        );
    }
}
