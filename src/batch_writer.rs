//! Buffered put accumulator that flushes itself.

use crate::batch_operations::BATCH_WRITE_MAX_ITEMS;
use crate::entry::WordEntry;
use crate::store::WordStore;

/// Outcome of a [`BatchWriter`] run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchWriteSummary {
    pub succeeded: usize,
    pub failed_words: Vec<String>,
}

/// Collects entries and writes them through [`WordStore::batch_put`] in
/// groups of at most 25.
///
/// Entries a flush does not write, whether left unprocessed or lost to a
/// failed request, get one single-item put. Only entries failing that too
/// are reported as failed.
pub struct BatchWriter<'a, S: WordStore + ?Sized> {
    store: &'a S,
    buffer: Vec<WordEntry>,
    capacity: usize,
    summary: BatchWriteSummary,
}

impl<'a, S: WordStore + ?Sized> BatchWriter<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self::with_capacity(store, BATCH_WRITE_MAX_ITEMS)
    }

    /// A writer flushing every `capacity` entries, capped at the DynamoDB limit.
    pub fn with_capacity(store: &'a S, capacity: usize) -> Self {
        let capacity = capacity.clamp(1, BATCH_WRITE_MAX_ITEMS);
        Self {
            store,
            buffer: Vec::with_capacity(capacity),
            capacity,
            summary: BatchWriteSummary::default(),
        }
    }

    /// Queue an entry, flushing when the buffer is full.
    pub async fn put(&mut self, entry: WordEntry) {
        self.buffer.push(entry);
        if self.buffer.len() >= self.capacity {
            self.flush().await;
        }
    }

    pub async fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let batch = std::mem::take(&mut self.buffer);

        let leftover = match self.store.batch_put(&batch).await {
            Ok(unprocessed) => {
                self.summary.succeeded += batch.len() - unprocessed.len();
                unprocessed
            }
            Err(e) => {
                tracing::error!(items = batch.len(), error = %e, "batch write failed");
                batch
            }
        };

        for entry in leftover {
            self.put_single(entry).await;
        }
    }

    /// Last attempt for an entry the batch path did not write.
    async fn put_single(&mut self, entry: WordEntry) {
        match self.store.put(&entry).await {
            Ok(()) => self.summary.succeeded += 1,
            Err(e) => {
                tracing::error!(word = %entry.word, error = %e, "error adding word");
                self.summary.failed_words.push(entry.word);
            }
        }
    }

    /// Entries queued but not yet flushed.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Flush the remainder and return the totals.
    pub async fn finish(mut self) -> BatchWriteSummary {
        self.flush().await;
        self.summary
    }
}
