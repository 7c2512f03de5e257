//! Batch write operations for DynamoDB.

use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::{PutRequest, WriteRequest};
use std::collections::HashMap;

use crate::conversions::{entry_to_item, item_word};
use crate::entry::WordEntry;
use crate::errors::{Error, Result, map_sdk_error};

/// Maximum items per batch write request (DynamoDB limit).
pub const BATCH_WRITE_MAX_ITEMS: usize = 25;

/// Maximum retry attempts for unprocessed items.
const BATCH_MAX_RETRIES: usize = 5;

/// Convert entries to put `WriteRequest`s.
fn prepare_put_requests(entries: &[WordEntry]) -> Result<Vec<WriteRequest>> {
    let mut put_requests: Vec<WriteRequest> = Vec::with_capacity(entries.len());
    for entry in entries {
        let put_request = PutRequest::builder()
            .set_item(Some(entry_to_item(entry)))
            .build()
            .map_err(|e| Error::Validation(format!("Failed to build put request: {}", e)))?;
        put_requests.push(WriteRequest::builder().put_request(put_request).build());
    }
    Ok(put_requests)
}

/// Batch put entries into a DynamoDB table.
///
/// Handles:
/// - Splitting requests to respect the 25-item limit
/// - Retrying unprocessed items with exponential backoff
///
/// Items still unprocessed once the retries run out are returned rather than
/// treated as a failure of the whole call. A request-level error aborts the
/// call; entries in chunks already sent are written.
pub async fn batch_put(client: &Client, table: &str, entries: &[WordEntry]) -> Result<Vec<WordEntry>> {
    let all_requests = prepare_put_requests(entries)?;
    if all_requests.is_empty() {
        return Ok(Vec::new());
    }

    let table_name = table.to_string();
    let mut leftover: Vec<WriteRequest> = Vec::new();

    for chunk in all_requests.chunks(BATCH_WRITE_MAX_ITEMS) {
        let mut pending: Vec<WriteRequest> = chunk.to_vec();
        let mut retries = 0;

        while !pending.is_empty() && retries < BATCH_MAX_RETRIES {
            let mut request_items = HashMap::new();
            request_items.insert(table_name.clone(), pending.clone());

            let output = client
                .batch_write_item()
                .set_request_items(Some(request_items))
                .send()
                .await
                .map_err(|e| map_sdk_error(e, Some(table)))?;

            if let Some(unprocessed) = output.unprocessed_items
                && let Some(items) = unprocessed.get(&table_name)
                && !items.is_empty()
            {
                pending = items.clone();
                retries += 1;
                let delay = std::time::Duration::from_millis(50 * (1 << retries));
                tracing::debug!(
                    unprocessed = pending.len(),
                    retries,
                    "retrying unprocessed batch items"
                );
                tokio::time::sleep(delay).await;
                continue;
            }
            pending.clear();
        }

        if !pending.is_empty() {
            tracing::warn!(
                unprocessed = pending.len(),
                "items still unprocessed after {} retries",
                BATCH_MAX_RETRIES
            );
            leftover.extend(pending);
        }
    }

    Ok(unprocessed_entries(entries, &leftover))
}

/// Map leftover write requests back to the entries they came from.
fn unprocessed_entries(entries: &[WordEntry], leftover: &[WriteRequest]) -> Vec<WordEntry> {
    leftover
        .iter()
        .filter_map(|request| request.put_request())
        .filter_map(|put| item_word(put.item()))
        .filter_map(|word| entries.iter().find(|e| e.word == word).cloned())
        .collect()
}
