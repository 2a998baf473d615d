//! Service configuration
//!
//! A plain value handed to each service at construction. There is no
//! global configuration state; callers that need different limits build
//! different services.

use crate::errors::{Result, SiaError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the visibility and authorization services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DirectoryConfig {
    /// Hard cap on ancestor-walk depth. Exceeding it is an integrity
    /// error, never a silent root assignment.
    pub max_tree_depth: usize,

    /// Request-scoped timeout for backing-store calls, in milliseconds.
    /// Elapsing maps to `SiaError::Unavailable` (fail closed).
    pub store_timeout_ms: u64,

    /// Root units per page when paginating the projected forest.
    pub page_size: usize,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            max_tree_depth: 32,
            store_timeout_ms: 5_000,
            page_size: 10,
        }
    }
}

impl DirectoryConfig {
    /// Store-call timeout as a `Duration`
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_tree_depth == 0 {
            return Err(SiaError::invalid("max_tree_depth must be at least 1"));
        }
        if self.store_timeout_ms == 0 {
            return Err(SiaError::invalid("store_timeout_ms must be at least 1"));
        }
        if self.page_size == 0 {
            return Err(SiaError::invalid("page_size must be at least 1"));
        }
        Ok(())
    }
}
