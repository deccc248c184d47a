//! Criteria Compiler
//!
//! Translates a sparse, untyped criteria mapping into an executable query
//! against the item collection. Every criteria key is resolved exactly once
//! at the compiler boundary into a declared searchable field, a reserved
//! tag-presence flag, or "unrecognized". An unrecognized key compiles the
//! whole search to `NoMatch` (fail-closed, not an error).
//!
//! Compiled queries are conjunctions only: the predicate set is ANDed, with
//! no OR and no grouping.

mod compiler;
mod criteria;
mod filters;

pub use compiler::{compile, compile_id, CompiledQuery, ItemPredicate, ItemQuery};
pub use criteria::{Criteria, TAG_LABEL_SCIENCE, TAG_LABEL_TRAVEL};
