//! The row written to the metadata table, one per object path.

use crate::{errors::MetadataLookupError, models::event::ObjectCreated};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Placeholder for values the lookup could not provide.
pub const NOT_AVAILABLE: &str = "N/A";

/// Extended object attributes returned by a successful metadata lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectHead {
    pub last_modified: DateTime<Utc>,

    /// ETag as returned by the service, usually wrapped in quotes.
    pub etag: String,

    pub content_type: Option<String>,

    /// Caller-supplied `x-amz-meta-*` tags.
    pub user_metadata: BTreeMap<String, String>,
}

/// Normalized metadata for one stored object.
///
/// Written with a plain put, so every re-processing of the same
/// `object_key` replaces the whole row.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct MetadataRecord {
    /// Full object path, URL-decoded from the event; the table's partition key.
    pub object_key: String,

    pub bucket_name: String,

    /// Byte length reported by the triggering event.
    pub size_bytes: u64,

    /// RFC 3339 timestamp from the lookup, or the event time on fallback.
    pub last_modified: String,

    /// Checksum without surrounding quotes, or `N/A`.
    pub etag: String,

    pub content_type: String,

    /// Time reported by the notification.
    pub event_time: String,

    /// User tags as a JSON-encoded object.
    pub user_metadata: String,
}

impl MetadataRecord {
    /// Merge event fields with the lookup outcome. A failed lookup degrades
    /// to event-derived values rather than aborting.
    pub fn assemble(
        object: &ObjectCreated,
        lookup: Result<ObjectHead, MetadataLookupError>,
    ) -> Self {
        let (last_modified, etag, content_type, user_metadata) = match lookup {
            Ok(head) => (
                head.last_modified.to_rfc3339_opts(SecondsFormat::AutoSi, true),
                head.etag.trim_matches('"').to_string(),
                head.content_type.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                head.user_metadata,
            ),
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    bucket = %object.bucket,
                    key = %object.key,
                    "metadata lookup failed, recording event fields only"
                );
                (
                    object.event_time.clone(),
                    NOT_AVAILABLE.to_string(),
                    NOT_AVAILABLE.to_string(),
                    BTreeMap::new(),
                )
            }
        };

        Self {
            object_key: object.key.clone(),
            bucket_name: object.bucket.clone(),
            size_bytes: object.size,
            last_modified,
            etag,
            content_type,
            event_time: object.event_time.clone(),
            user_metadata: encode_user_metadata(user_metadata),
        }
    }
}

/// Rendered through `serde_json::Value`'s `Display`, which cannot fail.
fn encode_user_metadata(tags: BTreeMap<String, String>) -> String {
    let object: serde_json::Map<String, serde_json::Value> = tags
        .into_iter()
        .map(|(name, value)| (name, serde_json::Value::String(value)))
        .collect();
    serde_json::Value::Object(object).to_string()
}
