//! DynamoDB client module.
//!
//! Builds the AWS SDK client from a [`TableConfig`] and exposes the word
//! table through [`DynamoWordStore`]. Credential sources, in order:
//! - AWS profile from ~/.aws/credentials (when `profile` is set)
//! - The default chain (environment variables, instance profile, etc.)

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_config::meta::region::RegionProviderChain;
use aws_config::profile::ProfileFileCredentialsProvider;
use aws_sdk_dynamodb::Client;

use crate::basic_operations::{
    execute_delete_item, execute_get_item, execute_put_item, execute_scan_page,
    execute_update_item, prepare_delete_item, prepare_scan, prepare_update_item,
};
use crate::batch_operations;
use crate::config::{DEFAULT_REGION, TableConfig};
use crate::entry::{DerivedUpdate, WordEntry};
use crate::errors::Result;
use crate::store::{Cursor, ScanPage, ScanRequest, WordStore};

/// The word table backed by DynamoDB.
#[derive(Debug, Clone)]
pub struct DynamoWordStore {
    /// The underlying AWS SDK DynamoDB client.
    client: Client,
    table: String,
}

impl DynamoWordStore {
    /// Connect using the given configuration.
    ///
    /// No request is sent; the first job operation is the first call the
    /// table sees, so only the item-level permissions the job uses are needed.
    ///
    /// # Errors
    ///
    /// Returns a config error if the configuration does not validate.
    pub async fn connect(config: &TableConfig) -> Result<Self> {
        config.validate()?;
        let client = build_client(config).await;
        Ok(Self::from_client(client, &config.table_name))
    }

    /// Wrap an existing client.
    pub fn from_client(client: Client, table: &str) -> Self {
        Self {
            client,
            table: table.to_string(),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }
}

#[async_trait]
impl WordStore for DynamoWordStore {
    async fn scan_page(&self, request: &ScanRequest, cursor: Option<Cursor>) -> Result<ScanPage> {
        let prepared = prepare_scan(&self.table, request);
        execute_scan_page(&self.client, &prepared, cursor).await
    }

    async fn get(&self, word: &str) -> Result<Option<WordEntry>> {
        execute_get_item(&self.client, &self.table, word).await
    }

    async fn put(&self, entry: &WordEntry) -> Result<()> {
        execute_put_item(&self.client, &self.table, entry).await
    }

    async fn update(&self, word: &str, update: &DerivedUpdate) -> Result<()> {
        let prepared = prepare_update_item(&self.table, word, update)?;
        execute_update_item(&self.client, prepared).await
    }

    async fn delete(&self, word: &str) -> Result<()> {
        execute_delete_item(&self.client, prepare_delete_item(&self.table, word)).await
    }

    async fn batch_put(&self, entries: &[WordEntry]) -> Result<Vec<WordEntry>> {
        batch_operations::batch_put(&self.client, &self.table, entries).await
    }
}

/// Build the AWS SDK DynamoDB client with the given configuration.
async fn build_client(config: &TableConfig) -> Client {
    // Region priority: config > env var > default
    let region_provider = RegionProviderChain::first_try(
        config
            .region
            .clone()
            .map(aws_sdk_dynamodb::config::Region::new),
    )
    .or_default_provider()
    .or_else(DEFAULT_REGION);

    let mut config_loader = aws_config::defaults(BehaviorVersion::latest()).region(region_provider);

    if let Some(profile_name) = &config.profile {
        let profile_provider = ProfileFileCredentialsProvider::builder()
            .profile_name(profile_name)
            .build();
        config_loader = config_loader.credentials_provider(profile_provider);
    }
    // else: uses default credential chain (env vars, instance profile, etc)

    let sdk_config = config_loader.load().await;

    let mut dynamo_config = aws_sdk_dynamodb::config::Builder::from(&sdk_config);

    if let Some(url) = &config.endpoint_url {
        dynamo_config = dynamo_config.endpoint_url(url);
    }

    tracing::debug!(
        table = %config.table_name,
        region = ?sdk_config.region(),
        endpoint = ?config.endpoint_url,
        "built DynamoDB client"
    );

    Client::from_conf(dynamo_config.build())
}
