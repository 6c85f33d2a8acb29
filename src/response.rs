use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Metadata {
    /// ISO-8601, UTC.
    pub timestamp: String,
}

impl Metadata {
    pub fn now() -> Self {
        Self {
            timestamp: timestamp_now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    pub metadata: Metadata,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
            metadata: Metadata::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorBody,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Option<serde_json::Value>,
    ) -> Self {
        Self {
            success: false,
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
                details,
            },
            timestamp: timestamp_now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use serde_json::json;

    use super::*;

    #[test]
    fn success_envelope_round_trips_data() {
        let data = json!({ "products": [{ "idProduct": 7, "name": "Red Velvet" }], "n": 1.5 });
        let encoded = serde_json::to_string(&ApiResponse::success(data.clone())).unwrap();
        let decoded: ApiResponse<serde_json::Value> = serde_json::from_str(&encoded).unwrap();

        assert!(decoded.success);
        assert_eq!(decoded.data, data);
    }

    #[test]
    fn timestamp_is_recent_iso_8601() {
        let before = Utc::now();
        let metadata = Metadata::now();
        let parsed = DateTime::parse_from_rfc3339(&metadata.timestamp).unwrap();
        let drift = parsed.with_timezone(&Utc) - before;
        assert!(drift.num_seconds().abs() < 5);
        assert!(metadata.timestamp.ends_with('Z'));
    }

    #[test]
    fn error_envelope_omits_absent_details() {
        let body = serde_json::to_value(ErrorResponse::new("NotFound", "Product not found.", None))
            .unwrap();
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"]["code"], json!("NotFound"));
        assert!(body["error"].get("details").is_none());
        assert!(body["timestamp"].is_string());
    }
}
