//! Structured logging
//!
//! One JSON line per event, synchronous, deterministic key ordering. The
//! write pipelines use this for notification outcomes and storage faults.

mod logger;

pub use logger::{Logger, Severity};
