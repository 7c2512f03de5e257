//! Batch operations module for DynamoDB.
//!
//! `batch_put` writes many items per request, splitting to respect the
//! DynamoDB limit and retrying unprocessed items with exponential backoff.

mod write;

pub use write::{BATCH_WRITE_MAX_ITEMS, batch_put};
