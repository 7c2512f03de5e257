//! Reconciliation: delete table words missing from a reference list.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use crate::config::ReconcileConfig;
use crate::confirm::Confirm;
use crate::errors::Result;
use crate::pagination::Paginator;
use crate::store::{ScanRequest, WordStore};
use crate::wordlist::load_reference_words;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileStatus {
    /// The reference list was missing, unreadable or empty; nothing was scanned.
    NoReference,
    EmptyTable,
    NothingToDelete,
    Cancelled,
    DryRun,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconcileReport {
    pub status: ReconcileStatus,
    pub reference_words: usize,
    /// Distinct table words, compared in lowercase like the reference list.
    pub table_words: usize,
    /// Sorted.
    pub to_delete: Vec<String>,
    pub deleted: usize,
    pub failed_words: Vec<String>,
}

impl ReconcileReport {
    fn new(status: ReconcileStatus) -> Self {
        Self {
            status,
            reference_words: 0,
            table_words: 0,
            to_delete: Vec::new(),
            deleted: 0,
            failed_words: Vec::new(),
        }
    }

    pub fn failed(&self) -> usize {
        self.failed_words.len()
    }
}

impl fmt::Display for ReconcileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            ReconcileStatus::NoReference => {
                return write!(
                    f,
                    "Cannot proceed without a valid list of reference words. Nothing deleted."
                );
            }
            ReconcileStatus::EmptyTable => {
                return write!(f, "No words found in the table. Nothing to delete.");
            }
            _ => {}
        }

        writeln!(f, "Reference words loaded: {}", self.reference_words)?;
        writeln!(f, "Words found in table: {}", self.table_words)?;
        match self.status {
            ReconcileStatus::NothingToDelete => write!(
                f,
                "All words in the table are in the reference list. No deletions needed."
            ),
            ReconcileStatus::Cancelled => write!(
                f,
                "Deletion of {} words cancelled by operator.",
                self.to_delete.len()
            ),
            ReconcileStatus::DryRun => {
                writeln!(f, "Dry run, would delete {} words:", self.to_delete.len())?;
                for word in &self.to_delete {
                    writeln!(f, "- {}", word)?;
                }
                Ok(())
            }
            _ => {
                write!(
                    f,
                    "Deletion complete. Successfully deleted {} words. Encountered {} errors.",
                    self.deleted,
                    self.failed()
                )
            }
        }
    }
}

/// Table keys whose lowercase form is not in the reference set, sorted.
///
/// The reference set is expected to be lowercased already. Keys are returned
/// as stored so that deleting them hits the actual item.
pub fn words_to_delete(table: &HashSet<String>, reference: &HashSet<String>) -> Vec<String> {
    let mut words: Vec<String> = table
        .iter()
        .filter(|key| !reference.contains(&key.to_lowercase()))
        .cloned()
        .collect();
    words.sort();
    words
}

/// Number of keys left once case variants are folded together.
pub fn distinct_words(table: &HashSet<String>) -> usize {
    table
        .iter()
        .map(|key| key.to_lowercase())
        .collect::<HashSet<_>>()
        .len()
}

/// Every key in the table, as stored.
pub async fn table_words<S>(store: &S) -> Result<HashSet<String>>
where
    S: WordStore + ?Sized,
{
    let mut words = HashSet::new();
    let mut pages = Paginator::new(store, ScanRequest::keys_only());
    while let Some(page) = pages.next_page().await? {
        words.extend(page.entries.into_iter().map(|e| e.word));
    }
    tracing::info!(words = words.len(), pages = pages.pages(), "scanned table keys");
    Ok(words)
}

/// Delete each word on its own; failures are logged and collected.
pub async fn delete_words<S>(store: &S, words: &[String]) -> (usize, Vec<String>)
where
    S: WordStore + ?Sized,
{
    tracing::info!("attempting to delete {} words", words.len());
    let mut deleted = 0;
    let mut failed = Vec::new();
    for word in words {
        match store.delete(word).await {
            Ok(()) => {
                tracing::info!(word = %word, "deleted");
                deleted += 1;
            }
            Err(e) => {
                tracing::error!(word = %word, error = %e, "error deleting word");
                failed.push(word.clone());
            }
        }
    }
    (deleted, failed)
}

/// Run the reconciliation.
///
/// A missing, unreadable or empty reference file ends the job before any
/// scan with [`ReconcileStatus::NoReference`]. Scan failures are returned as
/// errors. Deletion happens only after `confirm` approves the sorted list.
pub async fn run<S, C>(store: &S, config: &ReconcileConfig, confirm: &mut C) -> Result<ReconcileReport>
where
    S: WordStore + ?Sized,
    C: Confirm + ?Sized,
{
    config.validate()?;

    let reference = match load_reference_words(&config.reference_file).await {
        Ok(words) => words,
        Err(e) => {
            tracing::error!(error = %e, "could not load reference words");
            return Ok(ReconcileReport::new(ReconcileStatus::NoReference));
        }
    };
    if reference.is_empty() {
        tracing::error!(
            path = %config.reference_file.display(),
            "reference file contains no words"
        );
        return Ok(ReconcileReport::new(ReconcileStatus::NoReference));
    }
    tracing::info!(
        "loaded {} reference words from '{}'",
        reference.len(),
        config.reference_file.display()
    );

    let table = table_words(store).await?;
    let mut report = ReconcileReport::new(ReconcileStatus::EmptyTable);
    report.reference_words = reference.len();
    report.table_words = distinct_words(&table);
    if table.is_empty() {
        return Ok(report);
    }

    report.to_delete = words_to_delete(&table, &reference);
    if report.to_delete.is_empty() {
        report.status = ReconcileStatus::NothingToDelete;
        return Ok(report);
    }
    if config.dry_run {
        report.status = ReconcileStatus::DryRun;
        return Ok(report);
    }
    if !confirm.confirm(&report.to_delete) {
        tracing::info!("deletion cancelled by operator");
        report.status = ReconcileStatus::Cancelled;
        return Ok(report);
    }

    let (deleted, failed_words) = delete_words(store, &report.to_delete).await;
    report.deleted = deleted;
    report.failed_words = failed_words;
    report.status = ReconcileStatus::Completed;
    Ok(report)
}
