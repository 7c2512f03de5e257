//! Scan operation (one page per call).

use aws_sdk_dynamodb::Client;
use std::collections::HashMap;

use crate::conversions::item_to_entry;
use crate::entry::{PARTITION_TAG_ATTR, RANDOM_ID_ATTR, WORD_ATTR};
use crate::errors::{Result, map_sdk_error};
use crate::store::{Cursor, Projection, ScanFilter, ScanPage, ScanRequest};

/// Prepared scan expressions.
#[derive(Debug, PartialEq)]
pub struct PreparedScan {
    pub table: String,
    pub projection_expression: String,
    pub filter_expression: Option<String>,
    pub expression_attribute_names: HashMap<String, String>,
}

/// Build the projection and filter expressions for a scan request.
///
/// Every attribute name goes through a placeholder; only placeholders that
/// an expression actually uses are declared, since DynamoDB rejects unused
/// ones.
pub fn prepare_scan(table: &str, request: &ScanRequest) -> PreparedScan {
    let mut names = HashMap::from([("#w".to_string(), WORD_ATTR.to_string())]);

    let projection_expression = match request.projection {
        Projection::KeysOnly => "#w".to_string(),
        Projection::WithDerived => "#w, #rid, #pk".to_string(),
    };

    let filter_expression = match request.filter {
        Some(ScanFilter::MissingDerivedFields) => {
            Some("attribute_not_exists(#rid) OR attribute_not_exists(#pk)".to_string())
        }
        None => None,
    };

    if request.projection == Projection::WithDerived || filter_expression.is_some() {
        names.insert("#rid".to_string(), RANDOM_ID_ATTR.to_string());
        names.insert("#pk".to_string(), PARTITION_TAG_ATTR.to_string());
    }

    PreparedScan {
        table: table.to_string(),
        projection_expression,
        filter_expression,
        expression_attribute_names: names,
    }
}

/// Fetch one scan page.
///
/// Items that cannot be read as a `WordEntry` are logged and counted in
/// `ScanPage::skipped` rather than failing the page.
pub async fn execute_scan_page(
    client: &Client,
    prepared: &PreparedScan,
    cursor: Option<Cursor>,
) -> Result<ScanPage> {
    let mut request = client
        .scan()
        .table_name(&prepared.table)
        .projection_expression(&prepared.projection_expression)
        .set_filter_expression(prepared.filter_expression.clone())
        .set_exclusive_start_key(cursor.map(Cursor::into_key));

    for (placeholder, attr_name) in &prepared.expression_attribute_names {
        request = request.expression_attribute_names(placeholder, attr_name);
    }

    let output = request
        .send()
        .await
        .map_err(|e| map_sdk_error(e, Some(&prepared.table)))?;

    let mut page = ScanPage {
        scanned: usize::try_from(output.scanned_count()).unwrap_or_default(),
        ..ScanPage::default()
    };
    for item in output.items() {
        match item_to_entry(item) {
            Ok(entry) => page.entries.push(entry),
            Err(e) => {
                tracing::warn!(table = %prepared.table, error = %e, "skipping unreadable item");
                page.skipped += 1;
            }
        }
    }

    // An empty LastEvaluatedKey map is treated the same as an absent one.
    page.cursor = output
        .last_evaluated_key
        .filter(|key| !key.is_empty())
        .map(Cursor::from_key);

    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_only_declares_only_the_key_alias() {
        let prepared = prepare_scan("t", &ScanRequest::keys_only());
        assert_eq!(prepared.projection_expression, "#w");
        assert_eq!(prepared.filter_expression, None);
        assert_eq!(prepared.expression_attribute_names.len(), 1);
        assert_eq!(prepared.expression_attribute_names["#w"], "word");
    }

    #[test]
    fn derived_projection_aliases_every_attribute() {
        let prepared = prepare_scan("t", &ScanRequest::with_derived());
        assert_eq!(prepared.projection_expression, "#w, #rid, #pk");
        assert_eq!(prepared.expression_attribute_names["#rid"], "random_id");
        assert_eq!(prepared.expression_attribute_names["#pk"], "_PK");
    }

    #[test]
    fn missing_fields_filter() {
        let request = ScanRequest::with_derived().filtered(ScanFilter::MissingDerivedFields);
        let prepared = prepare_scan("t", &request);
        assert_eq!(
            prepared.filter_expression.as_deref(),
            Some("attribute_not_exists(#rid) OR attribute_not_exists(#pk)")
        );
    }
}
