//! Metadata table writes (DynamoDB `PutItem`).

use crate::models::record::MetadataRecord;
use anyhow::{Context, Result};
use aws_sdk_dynamodb::{error::DisplayErrorContext, types::AttributeValue};
use serde_dynamo::{Item, to_item};
use std::collections::HashMap;

/// Key-value store holding one row per object path.
pub trait MetadataTable: Send + Sync {
    /// Unconditionally create or replace the row keyed by
    /// `record.object_key`.
    fn put_record(
        &self,
        table: &str,
        record: &MetadataRecord,
    ) -> impl Future<Output = Result<()>> + Send;
}

#[derive(Clone, Debug)]
pub struct DynamoMetadataTable {
    client: aws_sdk_dynamodb::Client,
}

impl DynamoMetadataTable {
    pub fn new(client: aws_sdk_dynamodb::Client) -> Self {
        Self { client }
    }
}

impl MetadataTable for DynamoMetadataTable {
    #[tracing::instrument(skip(self, record), fields(key = %record.object_key))]
    async fn put_record(&self, table: &str, record: &MetadataRecord) -> Result<()> {
        let item = record_item(record)?;

        self.client
            .put_item()
            .table_name(table)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|err| {
                anyhow::anyhow!("could not put item, dynamodb: {}", DisplayErrorContext(&err))
            })?;

        Ok(())
    }
}

fn record_item(record: &MetadataRecord) -> Result<HashMap<String, AttributeValue>> {
    let item: Item = to_item(record).context("failed to convert metadata record")?;
    Ok(item.into())
}
