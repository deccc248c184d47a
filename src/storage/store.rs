//! Storage contract traits
//!
//! Every method is a suspension point for the caller; implementations must
//! not block a worker thread. Trait methods return boxed futures so the
//! store can live behind `Arc<dyn CatalogStore>` at the service seams.

use std::future::Future;
use std::pin::Pin;

use uuid::Uuid;

use super::errors::StorageError;
use crate::catalog::CatalogItem;
use crate::query::ItemQuery;

/// Boxed future returned by the storage traits
pub type StoreFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, StorageError>> + Send + 'a>>;

/// Access contract for the item collection.
///
/// Fetches execute compiled queries and need no transaction; a fetched
/// item always carries its full tag set. Writes are single all-or-nothing
/// steps except the cascade delete, which runs inside a `begin` scope.
pub trait CatalogStore: Send + Sync {
    /// Execute a compiled query expecting zero or one record
    fn fetch_one<'a>(&'a self, query: &'a ItemQuery) -> StoreFuture<'a, Option<CatalogItem>>;

    /// Execute a compiled query expecting zero or many records
    fn fetch_many<'a>(&'a self, query: &'a ItemQuery) -> StoreFuture<'a, Vec<CatalogItem>>;

    /// Unfiltered fetch of the whole collection
    fn fetch_all(&self) -> StoreFuture<'_, Vec<CatalogItem>>;

    /// Persist a new item (with its tags) atomically.
    ///
    /// The item must already carry its identity; the store stamps
    /// `created_at`/`updated_at` and starts the version at 0.
    fn insert(&self, item: CatalogItem) -> StoreFuture<'_, ()>;

    /// Persist an updated item, incrementing the authoritative version.
    ///
    /// Returns the new version number. The stored row's version counter is
    /// authoritative regardless of what the passed item carries.
    fn merge(&self, item: CatalogItem) -> StoreFuture<'_, u64>;

    /// Open a scoped transaction for multi-statement writes.
    fn begin(&self) -> StoreFuture<'_, Box<dyn CatalogTransaction>>;
}

/// A scoped transaction.
///
/// Staged statements take effect only at `commit`; dropping the
/// transaction uncommitted rolls everything back. Each delete reports the
/// number of affected rows as observed when the statement was staged.
pub trait CatalogTransaction: Send {
    /// Delete child tags by id
    fn delete_tags(&mut self, tag_ids: Vec<Uuid>) -> StoreFuture<'_, u64>;

    /// Delete an item by id
    fn delete_item(&mut self, id: Uuid) -> StoreFuture<'_, u64>;

    /// Atomically apply every staged statement
    fn commit(self: Box<Self>) -> StoreFuture<'static, ()>;
}
