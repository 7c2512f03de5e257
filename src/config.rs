//! Validated configuration for the client and each job.
//!
//! The binary builds these from CLI flags and environment variables; library
//! callers construct them directly. Every job validates its config before
//! touching the table.

use std::path::PathBuf;

use crate::errors::{Error, Result};

pub const DEFAULT_TABLE_NAME: &str = "WordleWords";
pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_WORD_LIST: &str = "words.txt";

/// Where the word table lives and how to reach it.
#[derive(Debug, Clone, PartialEq)]
pub struct TableConfig {
    pub table_name: String,
    pub region: Option<String>,
    /// Named profile from ~/.aws/credentials.
    pub profile: Option<String>,
    /// Custom endpoint URL for local testing (DynamoDB Local, localstack).
    pub endpoint_url: Option<String>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            table_name: DEFAULT_TABLE_NAME.to_string(),
            region: Some(DEFAULT_REGION.to_string()),
            profile: None,
            endpoint_url: None,
        }
    }
}

impl TableConfig {
    pub fn validate(&self) -> Result<()> {
        // DynamoDB table names: 3-255 chars of [a-zA-Z0-9_.-]
        let name = self.table_name.as_str();
        if name.len() < 3 || name.len() > 255 {
            return Err(Error::Config(format!(
                "table name '{}' must be between 3 and 255 characters",
                name
            )));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        {
            return Err(Error::Config(format!(
                "table name '{}' may only contain letters, digits, '_', '-' and '.'",
                name
            )));
        }
        if let Some(region) = &self.region
            && region.trim().is_empty()
        {
            return Err(Error::Config("region must not be empty".into()));
        }
        if let Some(url) = &self.endpoint_url
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            return Err(Error::Config(format!(
                "endpoint URL '{}' must start with http:// or https://",
                url
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackfillConfig {
    /// Rewrite both derived fields when only one is missing.
    pub overwrite_partial: bool,
    /// Let the table filter out complete items instead of checking locally.
    pub server_side_filter: bool,
}

impl BackfillConfig {
    pub fn validate(&self) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileConfig {
    /// Reference word list; table words not in it are deleted.
    pub reference_file: PathBuf,
    /// Compute and report, never delete.
    pub dry_run: bool,
}

impl ReconcileConfig {
    pub fn new(reference_file: impl Into<PathBuf>) -> Self {
        Self {
            reference_file: reference_file.into(),
            dry_run: false,
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_path("reference file", &self.reference_file)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoaderConfig {
    pub word_list: PathBuf,
    /// Look each word up first and leave existing records untouched.
    pub skip_existing: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            word_list: PathBuf::from(DEFAULT_WORD_LIST),
            skip_existing: false,
        }
    }
}

impl LoaderConfig {
    pub fn validate(&self) -> Result<()> {
        validate_path("word list", &self.word_list)
    }
}

fn validate_path(what: &str, path: &std::path::Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(Error::Config(format!("{} path must not be empty", what)));
    }
    Ok(())
}
