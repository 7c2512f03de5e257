//! In-process [`WordStore`] used by the test suites.
//!
//! Items are kept in key order and served in pages of a configurable size.
//! Individual words, whole scans and whole batch flushes can be made to fail
//! so the jobs' best-effort handling can be exercised.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::conversions::{item_word, word_key};
use crate::entry::{DerivedUpdate, WordEntry};
use crate::errors::{Error, Result};
use crate::store::{Cursor, Projection, ScanFilter, ScanPage, ScanRequest, WordStore};

const DEFAULT_PAGE_SIZE: usize = 100;

#[derive(Debug, Default)]
struct Faults {
    /// Words whose single-item calls and batch puts fail.
    words: HashSet<String>,
    /// Words a batch put leaves unprocessed.
    unprocessed: HashSet<String>,
    /// Scan calls beyond this count fail.
    scan_limit: Option<usize>,
    /// Every batch flush fails outright.
    batch: bool,
}

#[derive(Debug)]
pub struct MemoryWordStore {
    items: Mutex<BTreeMap<String, WordEntry>>,
    faults: Mutex<Faults>,
    page_size: usize,
    scan_calls: AtomicUsize,
    update_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    get_calls: AtomicUsize,
    put_calls: AtomicUsize,
    batch_calls: AtomicUsize,
}

impl Default for MemoryWordStore {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

impl MemoryWordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            items: Mutex::new(BTreeMap::new()),
            faults: Mutex::new(Faults::default()),
            page_size: page_size.max(1),
            scan_calls: AtomicUsize::new(0),
            update_calls: AtomicUsize::new(0),
            delete_calls: AtomicUsize::new(0),
            get_calls: AtomicUsize::new(0),
            put_calls: AtomicUsize::new(0),
            batch_calls: AtomicUsize::new(0),
        }
    }

    /// Build a store holding bare entries for `words`.
    pub fn with_words<I, W>(words: I) -> Self
    where
        I: IntoIterator<Item = W>,
        W: Into<String>,
    {
        let store = Self::new();
        for word in words {
            store.insert(WordEntry::new(word));
        }
        store
    }

    pub fn insert(&self, entry: WordEntry) {
        self.lock_items().insert(entry.word.clone(), entry);
    }

    pub fn entry(&self, word: &str) -> Option<WordEntry> {
        self.lock_items().get(word).cloned()
    }

    /// All keys in order.
    pub fn words(&self) -> Vec<String> {
        self.lock_items().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock_items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Make every call touching `word` fail.
    pub fn fail_word(&self, word: &str) {
        self.lock_faults().words.insert(word.to_string());
    }

    /// Leave `word` unprocessed whenever it is part of a batch put.
    ///
    /// Single-item puts of the word still succeed.
    pub fn leave_unprocessed(&self, word: &str) {
        self.lock_faults().unprocessed.insert(word.to_string());
    }

    /// Let `calls` scan calls succeed, then fail every later one.
    pub fn fail_scan_after(&self, calls: usize) {
        self.lock_faults().scan_limit = Some(calls);
    }

    pub fn fail_batches(&self) {
        self.lock_faults().batch = true;
    }

    pub fn scan_calls(&self) -> usize {
        self.scan_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn put_calls(&self) -> usize {
        self.put_calls.load(Ordering::SeqCst)
    }

    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    fn lock_items(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, WordEntry>> {
        self.items.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_faults(&self) -> std::sync::MutexGuard<'_, Faults> {
        self.faults.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_word(&self, op: &str, word: &str) -> Result<()> {
        if self.lock_faults().words.contains(word) {
            return Err(Error::Dynamo(format!("injected {} failure for '{}'", op, word)));
        }
        Ok(())
    }
}

fn project(entry: &WordEntry, projection: Projection) -> WordEntry {
    match projection {
        Projection::KeysOnly => WordEntry::new(entry.word.clone()),
        Projection::WithDerived => entry.clone(),
    }
}

fn matches_filter(entry: &WordEntry, filter: Option<ScanFilter>) -> bool {
    match filter {
        Some(ScanFilter::MissingDerivedFields) => entry.needs_backfill(),
        None => true,
    }
}

#[async_trait]
impl WordStore for MemoryWordStore {
    async fn scan_page(&self, request: &ScanRequest, cursor: Option<Cursor>) -> Result<ScanPage> {
        let call = self.scan_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(limit) = self.lock_faults().scan_limit
            && call > limit
        {
            return Err(Error::Connection("injected scan failure".into()));
        }

        let items = self.lock_items();
        let start = cursor.as_ref().and_then(|c| item_word(c.as_key()));
        let mut remaining = items
            .values()
            .filter(|entry| start.is_none_or(|s| entry.word.as_str() > s))
            .peekable();

        // The page limit applies before the filter, as in DynamoDB.
        let mut evaluated = Vec::with_capacity(self.page_size);
        while evaluated.len() < self.page_size {
            match remaining.next() {
                Some(entry) => evaluated.push(entry),
                None => break,
            }
        }
        let more = remaining.peek().is_some();
        let scanned = evaluated.len();

        let cursor = match evaluated.last() {
            Some(last) if more => Some(Cursor::from_key(word_key(&last.word))),
            _ => None,
        };
        let entries = evaluated
            .into_iter()
            .filter(|entry| matches_filter(entry, request.filter))
            .map(|entry| project(entry, request.projection))
            .collect();

        Ok(ScanPage {
            entries,
            scanned,
            skipped: 0,
            cursor,
        })
    }

    async fn get(&self, word: &str) -> Result<Option<WordEntry>> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.check_word("get", word)?;
        Ok(self.entry(word))
    }

    async fn put(&self, entry: &WordEntry) -> Result<()> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        self.check_word("put", &entry.word)?;
        self.insert(entry.clone());
        Ok(())
    }

    async fn update(&self, word: &str, update: &DerivedUpdate) -> Result<()> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.check_word("update", word)?;
        if update.is_empty() {
            return Err(Error::Validation(format!(
                "update for '{}' assigns no fields",
                word
            )));
        }

        let mut items = self.lock_items();
        let entry = items.get_mut(word).ok_or(Error::ConditionalCheckFailed)?;
        if update.only_if_absent
            && ((update.random_id.is_some() && entry.has_random_id())
                || (update.partition_tag.is_some() && entry.has_partition_tag()))
        {
            return Err(Error::ConditionalCheckFailed);
        }
        if let Some(random_id) = update.random_id {
            entry.random_id = Some(random_id);
        }
        if let Some(ref tag) = update.partition_tag {
            entry.partition_tag = Some(tag.clone());
        }
        Ok(())
    }

    async fn delete(&self, word: &str) -> Result<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.check_word("delete", word)?;
        self.lock_items().remove(word);
        Ok(())
    }

    async fn batch_put(&self, entries: &[WordEntry]) -> Result<Vec<WordEntry>> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        let faults = self.lock_faults();
        if faults.batch {
            return Err(Error::Throughput("injected batch failure".into()));
        }

        let mut unprocessed = Vec::new();
        let mut items = self.lock_items();
        for entry in entries {
            if faults.words.contains(&entry.word) || faults.unprocessed.contains(&entry.word) {
                unprocessed.push(entry.clone());
            } else {
                items.insert(entry.word.clone(), entry.clone());
            }
        }
        Ok(unprocessed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::FIVE_LETTER_WORD;

    #[tokio::test]
    async fn update_refuses_missing_items() {
        let store = MemoryWordStore::new();
        let update = DerivedUpdate {
            random_id: Some(0.1),
            partition_tag: None,
            only_if_absent: true,
        };
        let err = store.update("ghost", &update).await.unwrap_err();
        assert!(err.is_conditional_check_failed());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn only_if_absent_protects_existing_values() {
        let store = MemoryWordStore::new();
        store.insert(WordEntry {
            word: "crane".into(),
            random_id: Some(0.9),
            partition_tag: None,
        });
        let update = DerivedUpdate {
            random_id: Some(0.1),
            partition_tag: Some(FIVE_LETTER_WORD.into()),
            only_if_absent: true,
        };
        assert!(store.update("crane", &update).await.is_err());
        assert_eq!(store.entry("crane").unwrap().random_id, Some(0.9));
    }

    #[tokio::test]
    async fn keys_only_scan_strips_derived_fields() {
        let store = MemoryWordStore::new();
        store.insert(WordEntry {
            word: "crane".into(),
            random_id: Some(0.9),
            partition_tag: Some(FIVE_LETTER_WORD.into()),
        });
        let page = store
            .scan_page(&ScanRequest::keys_only(), None)
            .await
            .unwrap();
        assert_eq!(page.entries, vec![WordEntry::new("crane")]);
    }
}
