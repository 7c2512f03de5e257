//! Attribute backfill: give every word a `random_id` and `_PK`.

use serde::Serialize;
use std::fmt;
use std::time::{Duration, Instant};

use crate::config::BackfillConfig;
use crate::entry::{DerivedUpdate, FIVE_LETTER_WORD, WordEntry};
use crate::errors::Result;
use crate::pagination::Paginator;
use crate::store::{ScanFilter, ScanRequest, WordStore};

/// Log a progress line every this many updates.
const PROGRESS_EVERY: usize = 100;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BackfillReport {
    /// Items the table evaluated, including those a server-side filter dropped.
    pub scanned: usize,
    pub updated: usize,
    /// Updates refused because the item changed since it was scanned.
    pub conflicts: usize,
    pub failed: usize,
    /// Scanned items that could not be read.
    pub unreadable: usize,
    pub pages: usize,
    #[serde(skip)]
    pub elapsed: Duration,
}

impl BackfillReport {
    /// Updates issued.
    pub fn attempted(&self) -> usize {
        self.updated + self.conflicts + self.failed
    }
}

impl fmt::Display for BackfillReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Backfill Summary ---")?;
        writeln!(f, "Items scanned: {} ({} pages)", self.scanned, self.pages)?;
        writeln!(f, "Items updated: {}", self.updated)?;
        writeln!(f, "Conflicts (changed since scan): {}", self.conflicts)?;
        writeln!(f, "Failed updates: {}", self.failed)?;
        if self.unreadable > 0 {
            writeln!(f, "Unreadable items skipped: {}", self.unreadable)?;
        }
        write!(f, "Completed in {:.2} seconds", self.elapsed.as_secs_f64())
    }
}

/// Work out which fields an entry needs, or `None` if it is complete.
pub fn plan_update(
    entry: &WordEntry,
    config: &BackfillConfig,
    random_id: impl FnOnce() -> f64,
) -> Option<DerivedUpdate> {
    if !entry.needs_backfill() {
        return None;
    }
    if config.overwrite_partial {
        return Some(DerivedUpdate {
            random_id: Some(random_id()),
            partition_tag: Some(FIVE_LETTER_WORD.to_string()),
            only_if_absent: false,
        });
    }
    Some(DerivedUpdate {
        random_id: (!entry.has_random_id()).then(random_id),
        partition_tag: (!entry.has_partition_tag()).then(|| FIVE_LETTER_WORD.to_string()),
        only_if_absent: true,
    })
}

/// Run the backfill with `rand::random` as the `random_id` source.
pub async fn run<S>(store: &S, config: &BackfillConfig) -> Result<BackfillReport>
where
    S: WordStore + ?Sized,
{
    run_with(store, config, rand::random::<f64>).await
}

/// Run the backfill with a caller-supplied `random_id` generator.
///
/// Scan failures end the job with an error. Update failures are logged and
/// counted; the scan carries on.
pub async fn run_with<S, G>(
    store: &S,
    config: &BackfillConfig,
    mut random_id: G,
) -> Result<BackfillReport>
where
    S: WordStore + ?Sized,
    G: FnMut() -> f64,
{
    config.validate()?;
    let start = Instant::now();

    let mut request = ScanRequest::with_derived();
    if config.server_side_filter {
        request = request.filtered(ScanFilter::MissingDerivedFields);
    }

    tracing::info!(
        overwrite_partial = config.overwrite_partial,
        server_side_filter = config.server_side_filter,
        "scanning table to add random_id and _PK"
    );

    let mut report = BackfillReport::default();
    let mut pages = Paginator::new(store, request);

    while let Some(page) = pages.next_page().await? {
        report.scanned += page.scanned;
        report.unreadable += page.skipped;

        for entry in &page.entries {
            let Some(update) = plan_update(entry, config, &mut random_id) else {
                continue;
            };

            match store.update(&entry.word, &update).await {
                Ok(()) => {
                    report.updated += 1;
                    if report.updated % PROGRESS_EVERY == 0 {
                        tracing::info!("progress: updated {} items", report.updated);
                    }
                }
                Err(e) if e.is_conditional_check_failed() => {
                    tracing::warn!(word = %entry.word, "item changed since scan, not updated");
                    report.conflicts += 1;
                }
                Err(e) => {
                    tracing::error!(word = %entry.word, error = %e, "error updating item");
                    report.failed += 1;
                }
            }
        }
    }

    report.pages = pages.pages();
    report.elapsed = start.elapsed();
    tracing::info!(
        scanned = report.scanned,
        updated = report.updated,
        failed = report.failed,
        "backfill finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_entries_need_nothing() {
        let entry = WordEntry {
            word: "crane".into(),
            random_id: Some(0.3),
            partition_tag: Some(FIVE_LETTER_WORD.into()),
        };
        let planned = plan_update(&entry, &BackfillConfig::default(), || panic!("no draw"));
        assert_eq!(planned, None);
    }

    #[test]
    fn partial_entries_only_get_the_missing_field() {
        let entry = WordEntry {
            word: "crane".into(),
            random_id: Some(0.3),
            partition_tag: None,
        };
        let planned = plan_update(&entry, &BackfillConfig::default(), || 0.7).unwrap();
        assert_eq!(planned.random_id, None);
        assert_eq!(planned.partition_tag.as_deref(), Some(FIVE_LETTER_WORD));
        assert!(planned.only_if_absent);
    }

    #[test]
    fn overwrite_partial_rewrites_both() {
        let entry = WordEntry {
            word: "crane".into(),
            random_id: Some(0.3),
            partition_tag: None,
        };
        let config = BackfillConfig {
            overwrite_partial: true,
            ..BackfillConfig::default()
        };
        let planned = plan_update(&entry, &config, || 0.7).unwrap();
        assert_eq!(planned.random_id, Some(0.7));
        assert_eq!(planned.partition_tag.as_deref(), Some(FIVE_LETTER_WORD));
        assert!(!planned.only_if_absent);
    }
}
