//! The record-store seam the jobs are written against.
//!
//! Jobs only see the six operations on [`WordStore`]. The DynamoDB
//! implementation lives in [`crate::client`], an in-memory one in
//! [`crate::memory`].

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use std::collections::HashMap;

use crate::entry::{DerivedUpdate, WordEntry};
use crate::errors::Result;

/// Opaque continuation token returned by a scan page.
#[derive(Debug, Clone, PartialEq)]
pub struct Cursor(HashMap<String, AttributeValue>);

impl Cursor {
    pub fn from_key(key: HashMap<String, AttributeValue>) -> Self {
        Cursor(key)
    }

    pub fn as_key(&self) -> &HashMap<String, AttributeValue> {
        &self.0
    }

    pub fn into_key(self) -> HashMap<String, AttributeValue> {
        self.0
    }
}

/// Which attributes a scan returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// Only `word`.
    KeysOnly,
    /// `word`, `random_id` and `_PK`.
    WithDerived,
}

/// Server-side predicate applied to scanned items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanFilter {
    /// Items lacking `random_id` or `_PK`.
    MissingDerivedFields,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScanRequest {
    pub projection: Projection,
    pub filter: Option<ScanFilter>,
}

impl ScanRequest {
    pub fn keys_only() -> Self {
        Self {
            projection: Projection::KeysOnly,
            filter: None,
        }
    }

    pub fn with_derived() -> Self {
        Self {
            projection: Projection::WithDerived,
            filter: None,
        }
    }

    pub fn filtered(mut self, filter: ScanFilter) -> Self {
        self.filter = Some(filter);
        self
    }
}

/// One page of scan results.
#[derive(Debug, Clone, Default)]
pub struct ScanPage {
    pub entries: Vec<WordEntry>,
    /// Items the store evaluated for this page, before any filter.
    pub scanned: usize,
    /// Items on this page that could not be read as a `WordEntry`.
    pub skipped: usize,
    /// Present when another page follows.
    pub cursor: Option<Cursor>,
}

/// Remote table operations consumed by the jobs.
///
/// Each call either succeeds or fails on its own; implementations do not
/// retry except where noted on [`WordStore::batch_put`].
#[async_trait]
pub trait WordStore: Send + Sync {
    /// Fetch one page, starting after `cursor` (or at the beginning).
    async fn scan_page(&self, request: &ScanRequest, cursor: Option<Cursor>) -> Result<ScanPage>;

    async fn get(&self, word: &str) -> Result<Option<WordEntry>>;

    /// Full-item replace by key.
    async fn put(&self, entry: &WordEntry) -> Result<()>;

    /// Assign derived fields on an existing item, leaving other attributes alone.
    async fn update(&self, word: &str, update: &DerivedUpdate) -> Result<()>;

    async fn delete(&self, word: &str) -> Result<()>;

    /// Write one buffered batch of puts.
    ///
    /// Returns the entries the store still had not processed after its own
    /// retries. An `Err` means none of the batch is known to be written.
    async fn batch_put(&self, entries: &[WordEntry]) -> Result<Vec<WordEntry>>;
}
