//! Storage error types
//!
//! Storage faults are the fatal, unclassified channel of the core: the
//! services propagate them unchanged and an upstream layer maps them to a
//! generic failure response.

use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Faults raised by a storage engine
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// The engine rejected or failed the operation
    #[error("Storage backend failure: {reason}")]
    Backend { reason: String },

    /// The engine cannot be reached at all
    #[error("Storage unavailable: {reason}")]
    Unavailable { reason: String },
}

impl StorageError {
    pub fn backend(reason: impl Into<String>) -> Self {
        Self::Backend {
            reason: reason.into(),
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}
