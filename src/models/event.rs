//! S3 object-created notification, as delivered to the function.
//!
//! Only the first record is decoded. Later records stay raw JSON and are
//! counted, never inspected, so a bad trailing record cannot fail the
//! invocation.

use crate::errors::RecorderError;
use aws_lambda_events::event::s3::{S3Bucket, S3Object};
use serde::Deserialize;

/// Top-level notification envelope.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct S3Notification {
    #[serde(rename = "Records", default)]
    pub records: Vec<serde_json::Value>,
}

/// The parts of a record the recorder reads. `eventTime` is kept verbatim,
/// unlike `S3EventRecord::event_time`.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct NotificationRecord {
    event_name: Option<String>,
    event_time: Option<String>,
    s3: Option<RecordEntity>,
}

#[derive(Deserialize, Debug, Default)]
struct RecordEntity {
    bucket: Option<S3Bucket>,
    object: Option<S3Object>,
}

/// The validated subset of the first notification record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectCreated {
    pub bucket: String,
    /// URL-decoded object key. This, not the raw `s3.object.key` field, is
    /// what the lookup uses and what becomes the row's `object_key`.
    pub key: String,
    pub size: u64,
    pub event_time: String,
    /// e.g. `ObjectCreated:Put`. Logged only.
    pub event_name: Option<String>,
}

impl S3Notification {
    /// Decode an untyped invocation payload.
    pub fn from_value(payload: serde_json::Value) -> Result<Self, RecorderError> {
        serde_json::from_value(payload)
            .map_err(|err| RecorderError::MalformedEvent(err.to_string()))
    }

    /// Extract the object described by the first record. Any further records
    /// in the same delivery are not consulted.
    pub fn first_object(&self) -> Result<ObjectCreated, RecorderError> {
        let first = self
            .records
            .first()
            .ok_or_else(|| RecorderError::missing("Records[0]"))?;
        let record = NotificationRecord::deserialize(first)
            .map_err(|err| RecorderError::MalformedEvent(format!("Records[0]: {}", err)))?;

        let s3 = record.s3.as_ref();
        let bucket = required(
            s3.and_then(|s3| s3.bucket.as_ref())
                .and_then(|bucket| bucket.name.as_deref()),
            "Records[0].s3.bucket.name",
        )?;
        let object = s3.and_then(|s3| s3.object.as_ref());
        let raw_key = required(
            object.and_then(|object| object.key.as_deref()),
            "Records[0].s3.object.key",
        )?;
        let event_time = required(record.event_time.as_deref(), "Records[0].eventTime")?;

        let size = match object.and_then(|object| object.size) {
            Some(size) => u64::try_from(size).map_err(|_| {
                RecorderError::MalformedEvent(format!(
                    "`Records[0].s3.object.size` is negative: {}",
                    size
                ))
            })?,
            None => 0,
        };

        Ok(ObjectCreated {
            bucket: bucket.to_string(),
            key: decode_object_key(raw_key)?,
            size,
            event_time: event_time.to_string(),
            event_name: record.event_name,
        })
    }
}

fn required<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, RecorderError> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(RecorderError::missing(field)),
    }
}

/// S3 encodes keys like form data: spaces arrive as `+`, everything else
/// unsafe as `%XX`. The decoded form is the one stored as `object_key`.
fn decode_object_key(raw: &str) -> Result<String, RecorderError> {
    let plus_decoded = raw.replace('+', " ");
    urlencoding::decode(&plus_decoded)
        .map(|decoded| decoded.into_owned())
        .map_err(|err| RecorderError::MalformedEvent(format!("object key `{}`: {}", raw, err)))
}
