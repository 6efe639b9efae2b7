//! Store configuration.

use serde::{Deserialize, Serialize};

/// Configuration for a room store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// How many times a transaction is attempted before a write conflict
    /// is reported to the caller. Must be at least 1.
    pub max_attempts: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { max_attempts: 5 }
    }
}
