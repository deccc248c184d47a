//! Tag child entity
//!
//! Tags are owned exclusively by their parent item: they are created and
//! removed only as part of the parent's create/update/delete and are never
//! addressable on their own.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A topical keyword attached to a catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Assigned by the create pipeline, `None` on an incoming payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,

    /// Keyword label, e.g. "SCIENCE"
    pub label: String,
}

impl Tag {
    /// Create an unsaved tag with the given label
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: None,
            label: label.into(),
        }
    }
}
