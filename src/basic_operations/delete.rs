//! Delete item operation.

use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnConsumedCapacity};
use std::collections::HashMap;
use std::time::Instant;

use crate::conversions::word_key;
use crate::errors::{Result, map_sdk_error};

/// Prepared delete_item data.
#[derive(Debug)]
pub struct PreparedDeleteItem {
    pub table: String,
    pub key: HashMap<String, AttributeValue>,
}

pub fn prepare_delete_item(table: &str, word: &str) -> PreparedDeleteItem {
    PreparedDeleteItem {
        table: table.to_string(),
        key: word_key(word),
    }
}

/// Core async delete_item operation.
///
/// Deleting a missing key succeeds, matching DynamoDB semantics.
pub async fn execute_delete_item(client: &Client, prepared: PreparedDeleteItem) -> Result<()> {
    let start = Instant::now();
    let result = client
        .delete_item()
        .table_name(&prepared.table)
        .set_key(Some(prepared.key))
        .return_consumed_capacity(ReturnConsumedCapacity::Total)
        .send()
        .await;
    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

    match result {
        Ok(output) => {
            let consumed_wcu = output.consumed_capacity().and_then(|c| c.capacity_units());
            tracing::trace!(duration_ms, ?consumed_wcu, "delete_item");
            Ok(())
        }
        Err(e) => Err(map_sdk_error(e, Some(&prepared.table))),
    }
}
