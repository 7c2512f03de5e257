//! Update item operation.

use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnConsumedCapacity};
use std::collections::HashMap;
use std::time::Instant;

use crate::conversions::{number_attribute, word_key};
use crate::entry::{DerivedUpdate, PARTITION_TAG_ATTR, RANDOM_ID_ATTR, WORD_ATTR};
use crate::errors::{Error, Result, map_sdk_error};

/// Prepared update_item data.
#[derive(Debug)]
pub struct PreparedUpdateItem {
    pub table: String,
    pub key: HashMap<String, AttributeValue>,
    pub update_expression: String,
    pub condition_expression: String,
    pub expression_attribute_names: HashMap<String, String>,
    pub expression_attribute_values: HashMap<String, AttributeValue>,
}

/// Prepare update_item for a derived-field assignment.
///
/// The condition always requires the item to exist so an update never
/// resurrects a word deleted since the scan. With `only_if_absent`, each
/// assigned field must also be absent.
pub fn prepare_update_item(
    table: &str,
    word: &str,
    update: &DerivedUpdate,
) -> Result<PreparedUpdateItem> {
    let mut fields: Vec<(&str, AttributeValue)> = Vec::new();
    if let Some(random_id) = update.random_id {
        fields.push((RANDOM_ID_ATTR, number_attribute(random_id)));
    }
    if let Some(ref tag) = update.partition_tag {
        fields.push((PARTITION_TAG_ATTR, AttributeValue::S(tag.clone())));
    }
    if fields.is_empty() {
        return Err(Error::Validation(format!(
            "update for '{}' assigns no fields",
            word
        )));
    }

    let (update_expression, mut names, values) = build_set_expression(fields);

    let mut conditions = vec!["attribute_exists(#k)".to_string()];
    names.insert("#k".to_string(), WORD_ATTR.to_string());
    if update.only_if_absent {
        let mut placeholders: Vec<&String> = names.keys().filter(|p| p.starts_with("#f")).collect();
        placeholders.sort();
        for placeholder in placeholders {
            conditions.push(format!("attribute_not_exists({})", placeholder));
        }
    }

    Ok(PreparedUpdateItem {
        table: table.to_string(),
        key: word_key(word),
        update_expression,
        condition_expression: conditions.join(" AND "),
        expression_attribute_names: names,
        expression_attribute_values: values,
    })
}

/// Core async update_item operation.
pub async fn execute_update_item(client: &Client, prepared: PreparedUpdateItem) -> Result<()> {
    let mut request = client
        .update_item()
        .table_name(&prepared.table)
        .set_key(Some(prepared.key))
        .update_expression(prepared.update_expression)
        .condition_expression(prepared.condition_expression)
        .return_consumed_capacity(ReturnConsumedCapacity::Total);

    for (placeholder, attr_name) in prepared.expression_attribute_names {
        request = request.expression_attribute_names(placeholder, attr_name);
    }

    for (placeholder, attr_value) in prepared.expression_attribute_values {
        request = request.expression_attribute_values(placeholder, attr_value);
    }

    let start = Instant::now();
    let result = request.send().await;
    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

    match result {
        Ok(output) => {
            let consumed_wcu = output.consumed_capacity().and_then(|c| c.capacity_units());
            tracing::trace!(duration_ms, ?consumed_wcu, "update_item");
            Ok(())
        }
        Err(e) => Err(map_sdk_error(e, Some(&prepared.table))),
    }
}

/// Build a SET update expression from field:value pairs.
#[allow(clippy::type_complexity)]
pub fn build_set_expression(
    fields: Vec<(&str, AttributeValue)>,
) -> (
    String,
    HashMap<String, String>,
    HashMap<String, AttributeValue>,
) {
    let mut set_parts = Vec::new();
    let mut names = HashMap::new();
    let mut values = HashMap::new();

    for (i, (field, value)) in fields.into_iter().enumerate() {
        let name_placeholder = format!("#f{}", i);
        let value_placeholder = format!(":v{}", i);

        set_parts.push(format!("{} = {}", name_placeholder, value_placeholder));
        names.insert(name_placeholder, field.to_string());
        values.insert(value_placeholder, value);
    }

    let expression = format!("SET {}", set_parts.join(", "));
    (expression, names, values)
}
