//! In-memory storage engine
//!
//! Backs the item collection with an ordered map behind a `RwLock`, so
//! fetches come out in stable id order. No guard is ever held across an
//! await; lock poisoning surfaces as a backend fault.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use chrono::Utc;
use uuid::Uuid;

use super::errors::StorageError;
use super::store::{CatalogStore, CatalogTransaction, StoreFuture};
use crate::catalog::CatalogItem;
use crate::query::ItemQuery;

type Collection = Arc<RwLock<BTreeMap<Uuid, CatalogItem>>>;

/// Shared in-memory item collection
#[derive(Default, Clone)]
pub struct MemoryCatalogStore {
    items: Collection,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_items(&self) -> Result<Vec<CatalogItem>, StorageError> {
        let guard = self
            .items
            .read()
            .map_err(|e| StorageError::backend(e.to_string()))?;
        Ok(guard.values().cloned().collect())
    }
}

impl CatalogStore for MemoryCatalogStore {
    fn fetch_one<'a>(&'a self, query: &'a ItemQuery) -> StoreFuture<'a, Option<CatalogItem>> {
        Box::pin(async move {
            let items = self.read_items()?;
            Ok(items.into_iter().find(|item| query.matches(item)))
        })
    }

    fn fetch_many<'a>(&'a self, query: &'a ItemQuery) -> StoreFuture<'a, Vec<CatalogItem>> {
        Box::pin(async move {
            let items = self.read_items()?;
            Ok(items.into_iter().filter(|item| query.matches(item)).collect())
        })
    }

    fn fetch_all(&self) -> StoreFuture<'_, Vec<CatalogItem>> {
        Box::pin(async move { self.read_items() })
    }

    fn insert(&self, mut item: CatalogItem) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            let id = item
                .id
                .ok_or_else(|| StorageError::backend("insert requires an assigned id"))?;

            let now = Utc::now();
            item.version = 0;
            item.created_at = Some(now);
            item.updated_at = Some(now);

            let mut guard = self
                .items
                .write()
                .map_err(|e| StorageError::backend(e.to_string()))?;
            guard.insert(id, item);
            Ok(())
        })
    }

    fn merge(&self, item: CatalogItem) -> StoreFuture<'_, u64> {
        Box::pin(async move {
            let id = item
                .id
                .ok_or_else(|| StorageError::backend("merge requires an assigned id"))?;

            let mut guard = self
                .items
                .write()
                .map_err(|e| StorageError::backend(e.to_string()))?;
            let stored = guard
                .get_mut(&id)
                .ok_or_else(|| StorageError::backend(format!("no stored item {id}")))?;

            // The stored version counter is authoritative
            let new_version = stored.version + 1;
            let created_at = stored.created_at;

            *stored = item;
            stored.version = new_version;
            stored.created_at = created_at;
            stored.updated_at = Some(Utc::now());

            Ok(new_version)
        })
    }

    fn begin(&self) -> StoreFuture<'_, Box<dyn CatalogTransaction>> {
        Box::pin(async move {
            Ok(Box::new(MemoryTransaction {
                items: Arc::clone(&self.items),
                staged_tags: Vec::new(),
                staged_items: Vec::new(),
            }) as Box<dyn CatalogTransaction>)
        })
    }
}

/// Transaction over the in-memory collection.
///
/// Deletions are staged and applied under a single write guard at commit,
/// so no partial cascade is ever observable.
struct MemoryTransaction {
    items: Collection,
    staged_tags: Vec<Uuid>,
    staged_items: Vec<Uuid>,
}

impl CatalogTransaction for MemoryTransaction {
    fn delete_tags(&mut self, tag_ids: Vec<Uuid>) -> StoreFuture<'_, u64> {
        Box::pin(async move {
            let guard = self
                .items
                .read()
                .map_err(|e| StorageError::backend(e.to_string()))?;
            let affected = guard
                .values()
                .flat_map(|item| item.tags.iter())
                .filter(|tag| tag.id.is_some_and(|id| tag_ids.contains(&id)))
                .count() as u64;
            drop(guard);

            self.staged_tags.extend(tag_ids);
            Ok(affected)
        })
    }

    fn delete_item(&mut self, id: Uuid) -> StoreFuture<'_, u64> {
        Box::pin(async move {
            let guard = self
                .items
                .read()
                .map_err(|e| StorageError::backend(e.to_string()))?;
            let affected = u64::from(guard.contains_key(&id));
            drop(guard);

            self.staged_items.push(id);
            Ok(affected)
        })
    }

    fn commit(self: Box<Self>) -> StoreFuture<'static, ()> {
        Box::pin(async move {
            let mut guard = self
                .items
                .write()
                .map_err(|e| StorageError::backend(e.to_string()))?;

            for item in guard.values_mut() {
                item.tags
                    .retain(|tag| !tag.id.is_some_and(|id| self.staged_tags.contains(&id)));
            }
            for id in &self.staged_items {
                guard.remove(id);
            }
            Ok(())
        })
    }
}
