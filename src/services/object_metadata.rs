//! Extended metadata lookup against S3 (`HeadObject`).

use crate::{errors::MetadataLookupError, models::record::ObjectHead};
use aws_sdk_s3::{error::DisplayErrorContext, operation::head_object::HeadObjectOutput};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Source of object attributes not carried by the notification itself.
pub trait ObjectMetadataSource: Send + Sync {
    /// Fetch attributes for `bucket`/`key`. Every failure is reported the
    /// same way; callers are expected to degrade rather than abort.
    fn head_object(
        &self,
        bucket: &str,
        key: &str,
    ) -> impl Future<Output = Result<ObjectHead, MetadataLookupError>> + Send;
}

#[derive(Clone, Debug)]
pub struct S3MetadataSource {
    inner: aws_sdk_s3::Client,
}

impl S3MetadataSource {
    pub fn new(inner: aws_sdk_s3::Client) -> Self {
        Self { inner }
    }
}

impl ObjectMetadataSource for S3MetadataSource {
    #[tracing::instrument(skip(self))]
    async fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectHead, MetadataLookupError> {
        let output = self
            .inner
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| MetadataLookupError::Request(DisplayErrorContext(&err).to_string()))?;

        tracing::debug!(?output, "head object response");
        object_head_from_output(output)
    }
}

/// LastModified and ETag are required; a response without them counts as a
/// failed lookup.
fn object_head_from_output(output: HeadObjectOutput) -> Result<ObjectHead, MetadataLookupError> {
    let modified = output
        .last_modified()
        .ok_or(MetadataLookupError::MissingField("LastModified"))?;
    let last_modified = DateTime::<Utc>::from_timestamp(modified.secs(), modified.subsec_nanos())
        .ok_or(MetadataLookupError::InvalidTimestamp)?;

    let etag = output
        .e_tag()
        .ok_or(MetadataLookupError::MissingField("ETag"))?
        .to_string();

    let user_metadata: BTreeMap<String, String> = output
        .metadata()
        .map(|tags| {
            tags.iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        })
        .unwrap_or_default();

    Ok(ObjectHead {
        last_modified,
        etag,
        content_type: output.content_type().map(str::to_string),
        user_metadata,
    })
}
