//! Get item operation.

use aws_sdk_dynamodb::Client;

use crate::conversions::{item_to_entry, word_key};
use crate::entry::WordEntry;
use crate::errors::{Result, map_sdk_error};

/// Fetch one word with a strongly consistent read.
pub async fn execute_get_item(
    client: &Client,
    table: &str,
    word: &str,
) -> Result<Option<WordEntry>> {
    let output = client
        .get_item()
        .table_name(table)
        .set_key(Some(word_key(word)))
        .consistent_read(true)
        .send()
        .await
        .map_err(|e| map_sdk_error(e, Some(table)))?;

    match output.item() {
        Some(item) => Ok(Some(item_to_entry(item)?)),
        None => Ok(None),
    }
}
