//! Put item operation.

use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::ReturnConsumedCapacity;
use std::time::Instant;

use crate::conversions::entry_to_item;
use crate::entry::WordEntry;
use crate::errors::{Result, map_sdk_error};

/// Replace the whole item stored under `entry.word`.
pub async fn execute_put_item(client: &Client, table: &str, entry: &WordEntry) -> Result<()> {
    let start = Instant::now();
    let result = client
        .put_item()
        .table_name(table)
        .set_item(Some(entry_to_item(entry)))
        .return_consumed_capacity(ReturnConsumedCapacity::Total)
        .send()
        .await;
    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

    match result {
        Ok(output) => {
            let consumed_wcu = output.consumed_capacity().and_then(|c| c.capacity_units());
            tracing::trace!(duration_ms, ?consumed_wcu, "put_item");
            Ok(())
        }
        Err(e) => Err(map_sdk_error(e, Some(table))),
    }
}
