//! Storage access layer
//!
//! The services reach the backing collection only through the
//! `CatalogStore` contract: compiled-query fetches, insert/merge of the
//! item shape, and a scoped transaction for the two-statement cascade
//! delete. The version column is authoritative here: `merge` increments
//! it, callers never do.
//!
//! `MemoryCatalogStore` is the bundled engine; a relational adapter would
//! implement the same traits.

mod errors;
mod memory;
mod store;

pub use errors::{StorageError, StorageResult};
pub use memory::MemoryCatalogStore;
pub use store::{CatalogStore, CatalogTransaction, StoreFuture};
