//! The maintenance jobs.
//!
//! - `backfill` - assign `random_id` and `_PK` where missing
//! - `reconcile` - delete words not in a reference list, after confirmation
//! - `loader` - bulk-load a five-letter word list
//!
//! Each job is sequential and best effort: one failed item is logged and
//! counted, and the job moves on to the next.

pub mod backfill;
pub mod loader;
pub mod reconcile;

pub use backfill::BackfillReport;
pub use loader::LoadReport;
pub use reconcile::{ReconcileReport, ReconcileStatus};
