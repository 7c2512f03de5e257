//! Type conversions between `WordEntry` and DynamoDB AttributeValue maps.

use aws_sdk_dynamodb::types::AttributeValue;
use std::collections::HashMap;

use crate::entry::{PARTITION_TAG_ATTR, RANDOM_ID_ATTR, WORD_ATTR, WordEntry};
use crate::errors::{Error, Result};

/// Build the primary key map for a word.
pub fn word_key(word: &str) -> HashMap<String, AttributeValue> {
    HashMap::from([(WORD_ATTR.to_string(), AttributeValue::S(word.to_string()))])
}

/// Render an `f64` as a DynamoDB number string.
///
/// `Display` for `f64` never uses exponent notation, which keeps the value
/// inside DynamoDB's accepted number syntax.
pub fn number_attribute(value: f64) -> AttributeValue {
    AttributeValue::N(value.to_string())
}

/// Convert a `WordEntry` to a DynamoDB item.
///
/// Absent optional fields are omitted, not written as NULL.
pub fn entry_to_item(entry: &WordEntry) -> HashMap<String, AttributeValue> {
    let mut item = word_key(&entry.word);
    if let Some(random_id) = entry.random_id {
        item.insert(RANDOM_ID_ATTR.to_string(), number_attribute(random_id));
    }
    if let Some(ref tag) = entry.partition_tag {
        item.insert(PARTITION_TAG_ATTR.to_string(), AttributeValue::S(tag.clone()));
    }
    item
}

/// Convert a DynamoDB item to a `WordEntry`.
///
/// The `word` attribute must be a string. `random_id` and `_PK` count as
/// present whenever the attribute exists, even with an unexpected type, so a
/// malformed value is never silently overwritten.
pub fn item_to_entry(item: &HashMap<String, AttributeValue>) -> Result<WordEntry> {
    let word = match item.get(WORD_ATTR) {
        Some(AttributeValue::S(s)) => s.clone(),
        Some(other) => {
            return Err(Error::Serialization(format!(
                "attribute '{}' is not a string: {:?}",
                WORD_ATTR, other
            )));
        }
        None => {
            return Err(Error::Serialization(format!(
                "item has no '{}' attribute",
                WORD_ATTR
            )));
        }
    };

    let random_id = match item.get(RANDOM_ID_ATTR) {
        Some(AttributeValue::N(n)) => Some(n.parse::<f64>().map_err(|_| {
            Error::Serialization(format!("Invalid number for '{}': {}", RANDOM_ID_ATTR, n))
        })?),
        // Present but not a number: keep it marked as present.
        Some(_) => Some(f64::NAN),
        None => None,
    };

    let partition_tag = match item.get(PARTITION_TAG_ATTR) {
        Some(AttributeValue::S(s)) => Some(s.clone()),
        Some(other) => Some(format!("{:?}", other)),
        None => None,
    };

    Ok(WordEntry {
        word,
        random_id,
        partition_tag,
    })
}

/// The `word` value of an item or key map, if it is a string.
pub fn item_word(key: &HashMap<String, AttributeValue>) -> Option<&str> {
    match key.get(WORD_ATTR) {
        Some(AttributeValue::S(s)) => Some(s.as_str()),
        _ => None,
    }
}
