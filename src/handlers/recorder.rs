//! Object-created notification → metadata table row.
//!
//! The recorder owns its collaborators; nothing is read from the process
//! environment at invocation time.

use crate::{
    errors::RecorderError,
    models::{event::S3Notification, record::MetadataRecord, response::HandlerResponse},
    services::{metadata_table::MetadataTable, object_metadata::ObjectMetadataSource},
};

pub struct Recorder<S, T> {
    storage: S,
    table: T,
    table_name: Option<String>,
}

impl<S, T> Recorder<S, T>
where
    S: ObjectMetadataSource,
    T: MetadataTable,
{
    /// `table_name` may be absent; that is reported per invocation as a
    /// configuration error.
    pub fn new(storage: S, table: T, table_name: Option<String>) -> Self {
        Self {
            storage,
            table,
            table_name: table_name.filter(|name| !name.is_empty()),
        }
    }

    /// Entry point for an untyped invocation payload.
    pub async fn handle(&self, payload: serde_json::Value) -> HandlerResponse {
        tracing::debug!(%payload, "received event");
        // Configuration is checked before the payload is even decoded.
        if self.table_name.is_none() {
            return self.respond(Err(RecorderError::Configuration));
        }

        match S3Notification::from_value(payload) {
            Ok(event) => self.process(&event).await,
            Err(err) => self.respond(Err(err)),
        }
    }

    /// Record the object named by the first notification record and report
    /// the outcome as a status payload.
    pub async fn process(&self, event: &S3Notification) -> HandlerResponse {
        let result = self.record(event).await;
        self.respond(result)
    }

    #[tracing::instrument(skip_all)]
    async fn record(&self, event: &S3Notification) -> Result<String, RecorderError> {
        let table_name = self
            .table_name
            .as_deref()
            .ok_or(RecorderError::Configuration)?;

        let object = event.first_object()?;
        if event.records.len() > 1 {
            tracing::warn!(
                ignored = event.records.len() - 1,
                "delivery carried more than one record, only the first is processed"
            );
        }
        tracing::info!(
            bucket = %object.bucket,
            key = %object.key,
            event_name = ?object.event_name,
            "processing object"
        );

        let lookup = self.storage.head_object(&object.bucket, &object.key).await;
        let record = MetadataRecord::assemble(&object, lookup);

        self.table
            .put_record(table_name, &record)
            .await
            .map_err(|source| RecorderError::Persistence {
                key: record.object_key.clone(),
                source,
            })?;

        tracing::info!(
            key = %record.object_key,
            table = %table_name,
            "stored object metadata"
        );
        Ok(record.object_key)
    }

    fn respond(&self, result: Result<String, RecorderError>) -> HandlerResponse {
        match result {
            Ok(object_key) => HandlerResponse::stored(&object_key),
            Err(err) => {
                match &err {
                    RecorderError::MalformedEvent(_) => {
                        tracing::warn!(error = %err, "rejected event")
                    }
                    _ => tracing::error!(error = ?err, "failed to record object metadata"),
                }
                err.into()
            }
        }
    }
}
