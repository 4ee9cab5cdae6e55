use crate::models::response::HandlerResponse;
use http::StatusCode;
use serde_json::json;
use thiserror::Error;

/// Failures that end an invocation with a non-200 response.
#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("metadata table name not configured")]
    Configuration,
    #[error("invalid S3 event structure: {0}")]
    MalformedEvent(String),
    #[error("failed to store metadata for `{key}`: {source}")]
    Persistence {
        key: String,
        #[source]
        source: anyhow::Error,
    },
}

impl RecorderError {
    /// Shortcut for a malformed event with a missing field.
    pub fn missing(field: &str) -> Self {
        Self::MalformedEvent(format!("missing `{}`", field))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            RecorderError::MalformedEvent(_) => StatusCode::BAD_REQUEST,
            RecorderError::Configuration | RecorderError::Persistence { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<RecorderError> for HandlerResponse {
    fn from(err: RecorderError) -> Self {
        let status = err.status();
        let body = json!({
            "error": err.to_string(),
            "status": status.as_u16()
        });

        HandlerResponse::new(status, body.to_string())
    }
}

/// Extended metadata lookup failure. Never surfaced to the caller; the
/// recorder falls back to event-derived values instead.
#[derive(Debug, Error)]
pub enum MetadataLookupError {
    #[error("head object request failed: {0}")]
    Request(String),
    #[error("head object response missing `{0}`")]
    MissingField(&'static str),
    #[error("last modified timestamp out of range")]
    InvalidTimestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_event_maps_to_bad_request() {
        let err = RecorderError::missing("Records[0].eventTime");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.to_string(),
            "invalid S3 event structure: missing `Records[0].eventTime`"
        );
    }

    #[test]
    fn persistence_error_carries_source_message() {
        let err = RecorderError::Persistence {
            key: "reports/jan.csv".into(),
            source: anyhow::anyhow!("table does not exist"),
        };
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = HandlerResponse::from(err);
        assert_eq!(response.status_code, 500);
        let body: serde_json::Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(body["status"], 500);
        let message = body["error"].as_str().unwrap();
        assert!(message.contains("reports/jan.csv"));
        assert!(message.contains("table does not exist"));
    }

    #[test]
    fn configuration_error_response() {
        let response = HandlerResponse::from(RecorderError::Configuration);
        assert_eq!(response.status_code, 500);
        assert_eq!(
            response.body,
            r#"{"error":"metadata table name not configured","status":500}"#
        );
    }
}
