//! Maintenance jobs for a word-game dictionary kept in DynamoDB.
//!
//! The table is keyed by `word`. Three independent jobs run against it:
//! backfilling derived attributes, reconciling against a reference list,
//! and bulk-loading a word list. Jobs talk to the table only through the
//! [`store::WordStore`] trait.

pub mod basic_operations;
pub mod batch_operations;
pub mod batch_writer;
pub mod client;
pub mod config;
pub mod confirm;
pub mod conversions;
pub mod entry;
pub mod errors;
pub mod jobs;
pub mod memory;
pub mod pagination;
pub mod store;
pub mod wordlist;

pub use client::DynamoWordStore;
pub use entry::WordEntry;
pub use errors::{Error, Result};
pub use store::WordStore;
