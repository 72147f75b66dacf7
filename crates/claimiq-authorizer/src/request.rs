use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Inbound authorization request, as the gateway delivers it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerRequest {
    /// HTTP method of the protected call.
    pub http_method: String,

    /// Request path of the protected call.
    pub path: String,

    /// Request headers; the bearer credential rides in `Authorization`.
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Resource identifier the decision applies to.
    pub method_arn: String,
}

/// The `Authorization` header scheme accepted by the authorizer.
const BEARER_PREFIX: &str = "Bearer ";

impl AuthorizerRequest {
    /// Look up a header, ignoring ASCII case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The bearer token from the `Authorization` header, if present.
    ///
    /// Returns `None` for a missing header or a non-Bearer scheme; both
    /// are treated as an absent credential.
    #[must_use]
    pub fn bearer_token(&self) -> Option<&str> {
        let value = self.header("authorization")?;
        let token = value.strip_prefix(BEARER_PREFIX)?.trim();
        if token.is_empty() {
            None
        } else {
            Some(token)
        }
    }

    /// The gateway's request correlation ID, when forwarded.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-request-id")
    }
}
