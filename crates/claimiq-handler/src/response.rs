//! Standard response envelope for non-authorizer handlers.

use serde::{Deserialize, Serialize};

/// Fixed permissive CORS header set attached to every response.
pub const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    (
        "Access-Control-Allow-Headers",
        "Content-Type,Authorization,X-Tenant-Id,X-Hospital-Id,X-Request-Id",
    ),
    ("Access-Control-Allow-Methods", "GET,POST,PUT,DELETE,OPTIONS"),
];

/// The `{success, data}` / `{success, error}` envelope every
/// non-authorizer handler returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    /// Success envelope carrying a payload.
    #[must_use]
    pub fn ok(data: serde_json::Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Error envelope carrying a message.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope() {
        let response = ApiResponse::ok(json!({"claim_id": "c1"}));
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["claim_id"], "c1");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_error_envelope() {
        let response = ApiResponse::error("claim not found");
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "claim not found");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_cors_headers_are_permissive() {
        let origin = CORS_HEADERS
            .iter()
            .find(|(name, _)| *name == "Access-Control-Allow-Origin")
            .map(|(_, value)| *value);
        assert_eq!(origin, Some("*"));
        assert_eq!(CORS_HEADERS.len(), 3);
    }
}
