//! catalogd: a strict catalog-management core.
//!
//! The crate models a periodical catalog as a validated aggregate (an item
//! owning its tags) and exposes read and write services over a pluggable
//! storage backend:
//!
//! - [`schema`] validates candidate documents against a closed field set
//!   and produces the full list of violation messages in declaration order.
//! - [`query`] compiles caller criteria into typed conjunctive queries,
//!   failing closed on anything it does not recognize.
//! - [`storage`] is the async store contract plus an in-memory engine.
//! - [`service`] wires it together: reads, optimistic-concurrency updates,
//!   and transactional cascade deletes.
//! - [`mail`] carries the fire-and-forget created-item notification.

pub mod catalog;
pub mod mail;
pub mod observability;
pub mod query;
pub mod schema;
pub mod service;
pub mod storage;

pub use catalog::{CatalogItem, Kind, Publisher, Tag};
pub use query::Criteria;
pub use service::{CreateError, ReadService, UpdateError, WriteService};
pub use storage::{CatalogStore, MemoryCatalogStore, StorageError};
