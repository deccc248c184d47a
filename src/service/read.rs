//! Read service
//!
//! Thin front over the storage fetch paths. Criteria compile before any
//! storage round trip, so an unsatisfiable search costs nothing and a
//! malformed id never reaches the backend.

use std::sync::Arc;

use crate::catalog::CatalogItem;
use crate::query::{compile, compile_id, CompiledQuery, Criteria};
use crate::schema::parse_item_id;
use crate::storage::{CatalogStore, StorageResult};

/// Query front for the item collection
#[derive(Clone)]
pub struct ReadService {
    store: Arc<dyn CatalogStore>,
}

impl ReadService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Fetch one item by its id string.
    ///
    /// An id that does not have the canonical hex shape resolves to
    /// `Ok(None)` without touching storage.
    pub async fn find_by_id(&self, id: &str) -> StorageResult<Option<CatalogItem>> {
        let Some(uuid) = parse_item_id(id) else {
            return Ok(None);
        };
        let query = compile_id(uuid);
        self.store.fetch_one(&query).await
    }

    /// Fetch every item satisfying the criteria.
    ///
    /// Absent or empty criteria fetch the whole collection. Criteria that
    /// compile to `NoMatch` resolve to an empty vec, not an error.
    pub async fn find(&self, criteria: Option<&Criteria>) -> StorageResult<Vec<CatalogItem>> {
        let Some(criteria) = criteria else {
            return self.store.fetch_all().await;
        };
        match compile(criteria) {
            CompiledQuery::Unfiltered => self.store.fetch_all().await,
            CompiledQuery::NoMatch => Ok(Vec::new()),
            CompiledQuery::Filter(query) => self.store.fetch_many(&query).await,
        }
    }
}
