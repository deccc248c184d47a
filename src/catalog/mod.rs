//! Catalog data model
//!
//! The aggregate root is `CatalogItem`; `Tag` is its owned child entity.
//! Items reach storage only through the write pipelines in `service`,
//! which assign identity and normalize the ISSN.

mod item;
mod tag;

pub use item::{normalize_issn, CatalogItem, Kind, Publisher};
pub use tag::Tag;
