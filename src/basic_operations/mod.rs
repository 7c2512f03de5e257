//! Single-item operations and scans against DynamoDB.
//!
//! - `scan` - one page of a projected, optionally filtered scan
//! - `get` - consistent read of one word
//! - `put` - full-item replace
//! - `update_op` - conditional SET of derived fields
//! - `delete` - delete by key

mod delete;
mod get;
mod put;
mod scan;
mod update_op;

pub use delete::{execute_delete_item, prepare_delete_item};
pub use get::execute_get_item;
pub use put::execute_put_item;
pub use scan::{PreparedScan, execute_scan_page, prepare_scan};
pub use update_op::{execute_update_item, prepare_update_item};
