//! Synchronous response returned to the invoking trigger.

use http::StatusCode;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HandlerResponse {
    pub status_code: u16,

    /// Always a JSON document.
    pub body: String,
}

impl HandlerResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            body: body.into(),
        }
    }

    /// 200 confirming the object path that was recorded.
    pub fn stored(object_key: &str) -> Self {
        let message = format!("Metadata for {} stored successfully!", object_key);
        Self::new(StatusCode::OK, serde_json::Value::String(message).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_body_is_a_json_string() {
        let response = HandlerResponse::stored("reports/\"q1\".csv");
        assert_eq!(response.status_code, 200);

        let decoded: String = serde_json::from_str(&response.body).unwrap();
        assert_eq!(decoded, "Metadata for reports/\"q1\".csv stored successfully!");
    }

    #[test]
    fn serializes_with_lambda_field_names() {
        let response = HandlerResponse::new(StatusCode::BAD_REQUEST, "{}");
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            serde_json::json!({ "statusCode": 400, "body": "{}" })
        );
    }
}
