//! Write-pipeline error taxonomy
//!
//! Every rejection a caller can provoke has its own variant carrying the
//! offending value, so an edge layer can map each to a distinct response
//! without parsing message strings. Storage faults pass through unchanged
//! as the unclassified fatal channel.

use thiserror::Error;
use uuid::Uuid;

use crate::storage::StorageError;

/// Rejections of the create pipeline
#[derive(Debug, Error)]
pub enum CreateError {
    /// The candidate failed validation; one message per violated rule
    #[error("Candidate violates {} constraint(s)", messages.len())]
    ConstraintViolations { messages: Vec<String> },

    /// An item with this title already exists
    #[error("An item titled {title:?} already exists")]
    TitleExists { title: String },

    /// An item with this ISSN already exists
    #[error("An item with ISSN {issn:?} already exists")]
    IssnExists { issn: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Rejections of the update pipeline
#[derive(Debug, Error)]
pub enum UpdateError {
    /// No item exists under the given id (or the id is malformed)
    #[error("No item exists with id {id:?}")]
    ItemNotExists { id: String },

    /// The candidate failed validation; one message per violated rule
    #[error("Candidate violates {} constraint(s)", messages.len())]
    ConstraintViolations { messages: Vec<String> },

    /// A different item already owns this title
    #[error("An item titled {title:?} already exists under id {id}")]
    TitleExists { title: String, id: Uuid },

    /// The version token is missing or not a quoted integer
    #[error("Version token {token:?} is not a quoted integer")]
    VersionInvalid { token: Option<String> },

    /// The supplied version lags the stored one
    #[error("Version {version} is outdated for item {id}")]
    VersionOutdated { id: Uuid, version: i64 },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_violations_counts_messages() {
        let err = CreateError::ConstraintViolations {
            messages: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(err.to_string(), "Candidate violates 2 constraint(s)");
    }

    #[test]
    fn test_storage_error_passes_through() {
        let err = UpdateError::from(StorageError::unavailable("lock poisoned"));
        assert!(matches!(err, UpdateError::Storage(_)));
        assert!(err.to_string().contains("lock poisoned"));
    }

    #[test]
    fn test_version_invalid_carries_token() {
        let err = UpdateError::VersionInvalid {
            token: Some("three".to_string()),
        };
        assert!(err.to_string().contains("three"));
    }
}
