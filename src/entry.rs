//! The `WordEntry` record and its attribute names.

/// Primary key attribute.
pub const WORD_ATTR: &str = "word";

/// Random sort value used for sampling a random word.
pub const RANDOM_ID_ATTR: &str = "random_id";

/// Partition key of the secondary index that spans every word.
pub const PARTITION_TAG_ATTR: &str = "_PK";

/// The constant value stored in [`PARTITION_TAG_ATTR`].
pub const FIVE_LETTER_WORD: &str = "FIVE_LETTER_WORD";

/// One record of the word table.
#[derive(Debug, Clone, PartialEq)]
pub struct WordEntry {
    pub word: String,
    pub random_id: Option<f64>,
    pub partition_tag: Option<String>,
}

impl WordEntry {
    /// A bare entry carrying only its key, as written by the loader.
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            random_id: None,
            partition_tag: None,
        }
    }

    pub fn has_random_id(&self) -> bool {
        self.random_id.is_some()
    }

    pub fn has_partition_tag(&self) -> bool {
        self.partition_tag.is_some()
    }

    /// True when at least one derived attribute still needs assigning.
    pub fn needs_backfill(&self) -> bool {
        !self.has_random_id() || !self.has_partition_tag()
    }
}

/// Field assignments issued by the backfill job.
///
/// `None` fields are left alone. With `only_if_absent` the store must refuse
/// the write if any assigned field already holds a value.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedUpdate {
    pub random_id: Option<f64>,
    pub partition_tag: Option<String>,
    pub only_if_absent: bool,
}

impl DerivedUpdate {
    pub fn is_empty(&self) -> bool {
        self.random_id.is_none() && self.partition_tag.is_none()
    }
}
