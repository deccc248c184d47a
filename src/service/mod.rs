//! Catalog services
//!
//! `ReadService` executes compiled queries; `WriteService` runs the
//! validated create/update/delete pipelines on top of it. Both sit behind
//! `Arc` and share one `CatalogStore`.

mod errors;
mod read;
mod write;

pub use errors::{CreateError, UpdateError};
pub use read::ReadService;
pub use write::WriteService;
