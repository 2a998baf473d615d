//! Unified error system for the directory core
//!
//! One error type covers the whole crate family. Permission denial is a
//! first-class decision value in `sia-authorization`, not an error; the
//! `PermissionDenied` variant exists for callers that convert a deny into a
//! raised error at their own boundary.

use serde::{Deserialize, Serialize};

/// Unified error type for all directory operations
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum SiaError {
    /// Invalid input or configuration
    #[error("Invalid: {message}")]
    Invalid {
        /// Error message describing the invalid input
        message: String,
    },

    /// Referenced entity does not resolve in the backing store
    #[error("Not found: {message}")]
    NotFound {
        /// Error message describing what was not found
        message: String,
    },

    /// Permission denied
    #[error("Permission denied: {message}")]
    PermissionDenied {
        /// Error message describing the permission issue
        message: String,
    },

    /// Structural data-integrity violation (parent cycle, depth overflow)
    #[error("Integrity violation: {message}")]
    Integrity {
        /// Error message describing the violated invariant
        message: String,
    },

    /// Backing store unreachable or timed out; callers must fail closed
    #[error("Dependency unavailable: {message}")]
    Unavailable {
        /// Error message describing the unavailable dependency
        message: String,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Error message describing the internal error
        message: String,
    },
}

impl SiaError {
    /// Create an invalid input error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a permission denied error
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: message.into(),
        }
    }

    /// Create an integrity violation error
    pub fn integrity(message: impl Into<String>) -> Self {
        Self::Integrity {
            message: message.into(),
        }
    }

    /// Create a dependency unavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether this error means the backing stores could not answer, as
    /// opposed to a definite (possibly empty) answer
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

/// Standard Result type for directory operations
pub type Result<T> = std::result::Result<T, SiaError>;

impl From<std::io::Error> for SiaError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::not_found(err.to_string()),
            std::io::ErrorKind::PermissionDenied => Self::permission_denied(err.to_string()),
            std::io::ErrorKind::TimedOut => Self::unavailable(err.to_string()),
            _ => Self::internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = SiaError::integrity("parent cycle");
        assert!(matches!(err, SiaError::Integrity { .. }));
        assert_eq!(err.to_string(), "Integrity violation: parent cycle");
    }

    #[test]
    fn test_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "row missing");
        let err = SiaError::from(io_err);
        assert!(matches!(err, SiaError::NotFound { .. }));

        let io_err = std::io::Error::new(std::io::ErrorKind::TimedOut, "db gone");
        let err = SiaError::from(io_err);
        assert!(err.is_unavailable());
    }

    #[test]
    fn test_unavailable_is_distinguishable() {
        let empty: Result<Vec<u32>> = Ok(vec![]);
        let down: Result<Vec<u32>> = Err(SiaError::unavailable("store timeout"));
        assert!(empty.is_ok());
        assert!(down.as_ref().is_err_and(SiaError::is_unavailable));
    }
}
