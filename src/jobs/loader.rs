//! Bulk loader: write a five-letter word list into the table.

use serde::Serialize;
use std::fmt;
use std::time::{Duration, Instant};

use crate::batch_writer::BatchWriter;
use crate::config::LoaderConfig;
use crate::entry::WordEntry;
use crate::errors::Result;
use crate::store::WordStore;
use crate::wordlist::{WORD_LENGTH, read_word_list};

/// Failed words shown in the human-readable summary.
const FAILED_WORDS_SHOWN: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadReport {
    /// Valid, de-duplicated words read from the file.
    pub attempted: usize,
    pub succeeded: usize,
    /// Words already in the table (only with `skip_existing`).
    pub skipped_existing: usize,
    pub failed_words: Vec<String>,
    /// Lines rejected by validation.
    pub rejected: usize,
    pub duplicates: usize,
    #[serde(skip)]
    pub elapsed: Duration,
}

impl LoadReport {
    pub fn failed(&self) -> usize {
        self.failed_words.len()
    }
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Upload Summary ---")?;
        writeln!(f, "Total words attempted: {}", self.attempted)?;
        writeln!(f, "Successfully added/updated: {}", self.succeeded)?;
        if self.skipped_existing > 0 {
            writeln!(f, "Skipped (already existed): {}", self.skipped_existing)?;
        }
        writeln!(f, "Errors during batching: {}", self.failed())?;
        if !self.failed_words.is_empty() {
            let shown: Vec<&str> = self
                .failed_words
                .iter()
                .take(FAILED_WORDS_SHOWN)
                .map(String::as_str)
                .collect();
            let more = if self.failed_words.len() > FAILED_WORDS_SHOWN {
                "..."
            } else {
                ""
            };
            writeln!(f, "Words that failed: {}{}", shown.join(", "), more)?;
        }
        if self.rejected > 0 || self.duplicates > 0 {
            writeln!(
                f,
                "Lines rejected: {}, duplicates dropped: {}",
                self.rejected, self.duplicates
            )?;
        }
        write!(f, "Total time taken: {:.2} seconds", self.elapsed.as_secs_f64())
    }
}

/// Run the loader.
///
/// A missing or unreadable word list is an error. Each word is written as a
/// bare `{word}` item, replacing any existing item with the same key; use
/// `skip_existing` to leave existing items alone. Write failures are counted
/// per word.
pub async fn run<S>(store: &S, config: &LoaderConfig) -> Result<LoadReport>
where
    S: WordStore + ?Sized,
{
    config.validate()?;
    let start = Instant::now();

    let list = read_word_list(&config.word_list).await?;
    let mut report = LoadReport {
        attempted: list.accepted.len(),
        rejected: list.rejected.len(),
        duplicates: list.duplicates,
        ..LoadReport::default()
    };
    if list.accepted.is_empty() {
        tracing::warn!("no {}-letter words found in the file to upload", WORD_LENGTH);
        report.elapsed = start.elapsed();
        return Ok(report);
    }
    tracing::info!(
        "found {} {}-letter words to upload",
        list.accepted.len(),
        WORD_LENGTH
    );

    let mut writer = BatchWriter::new(store);
    for word in list.accepted {
        if config.skip_existing {
            match store.get(&word).await {
                Ok(Some(_)) => {
                    tracing::debug!(word = %word, "skipped: already exists");
                    report.skipped_existing += 1;
                    continue;
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::error!(word = %word, error = %e, "error checking word");
                    report.failed_words.push(word);
                    continue;
                }
            }
        }
        writer.put(WordEntry::new(word)).await;
    }

    let summary = writer.finish().await;
    report.succeeded = summary.succeeded;
    report.failed_words.extend(summary.failed_words);
    report.elapsed = start.elapsed();
    Ok(report)
}
