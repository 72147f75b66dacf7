//! Invocation event shapes.
//!
//! Entry points receive payloads in one of a small set of known shapes.
//! The shape is resolved once, at the entry boundary, into an explicit
//! tagged union; nothing downstream probes the raw JSON again.

use std::collections::HashMap;

use claimiq_core::{HospitalId, TenantContext, TenantId};
use serde::{Deserialize, Serialize};

/// Header carrying the tenant for internal/already-authenticated calls.
pub const TENANT_HEADER: &str = "x-tenant-id";

/// Header carrying the hospital for internal/already-authenticated calls.
pub const HOSPITAL_HEADER: &str = "x-hospital-id";

/// Header carrying the request correlation ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// A gateway-shaped HTTP invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpEvent {
    #[serde(default)]
    pub http_method: String,

    #[serde(default)]
    pub path: String,

    #[serde(default)]
    pub headers: HashMap<String, String>,

    #[serde(default)]
    pub request_context: RequestContext,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Gateway request context, including the upstream authorizer's
/// propagated context map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    /// Context map populated by the authorizer on Allow decisions.
    #[serde(default)]
    pub authorizer: HashMap<String, serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl HttpEvent {
    /// Look up a header, ignoring ASCII case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn authorizer_str(&self, key: &str) -> Option<&str> {
        self.request_context
            .authorizer
            .get(key)
            .and_then(|v| v.as_str())
    }
}

/// The known invocation shapes, resolved once at the entry boundary.
#[derive(Debug, Clone)]
pub enum InvocationEvent {
    /// Gateway-shaped HTTP request (carries headers and, on authorized
    /// calls, the upstream authorizer context).
    Http(HttpEvent),

    /// Direct invocation with an arbitrary JSON payload (workflow steps,
    /// scheduled runs).
    Direct(serde_json::Value),
}

impl InvocationEvent {
    /// Classify a raw payload into its invocation shape.
    ///
    /// A payload with a `headers` object is a gateway event; everything
    /// else is a direct invocation.
    #[must_use]
    pub fn classify(value: serde_json::Value) -> Self {
        if value.get("headers").is_some_and(serde_json::Value::is_object) {
            if let Ok(http) = serde_json::from_value::<HttpEvent>(value.clone()) {
                return InvocationEvent::Http(http);
            }
        }
        InvocationEvent::Direct(value)
    }

    /// The request correlation ID, when the event carries one.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        match self {
            InvocationEvent::Http(http) => http
                .header(REQUEST_ID_HEADER)
                .or(http.request_context.request_id.as_deref()),
            InvocationEvent::Direct(value) => value.get("request_id").and_then(|v| v.as_str()),
        }
    }

    /// Derive the tenant context for this invocation.
    ///
    /// HTTP events resolve `x-tenant-id`/`x-hospital-id` headers first,
    /// then the upstream authorizer context; direct invocations resolve
    /// top-level `tenant_id`/`hospital_id` fields. Both paths produce the
    /// same [`TenantContext`] shape. Returns `None` when no source names
    /// a tenant.
    #[must_use]
    pub fn tenant_context(&self) -> Option<TenantContext> {
        match self {
            InvocationEvent::Http(http) => Self::http_tenant_context(http),
            InvocationEvent::Direct(value) => Self::direct_tenant_context(value),
        }
    }

    fn http_tenant_context(http: &HttpEvent) -> Option<TenantContext> {
        if let Some(tenant) = http.header(TENANT_HEADER) {
            if let Ok(tenant_id) = tenant.parse::<TenantId>() {
                let hospital_id = http
                    .header(HOSPITAL_HEADER)
                    .and_then(|h| h.parse::<HospitalId>().ok())
                    .unwrap_or_else(HospitalId::default_hospital);
                return Some(TenantContext::new(tenant_id, hospital_id));
            }
        }

        // Fall back to the context the authorizer propagated.
        let tenant_id = http.authorizer_str("tenantId")?.parse::<TenantId>().ok()?;
        let hospital_id = http
            .authorizer_str("hospitalId")
            .and_then(|h| h.parse::<HospitalId>().ok())
            .unwrap_or_else(HospitalId::default_hospital);

        let mut ctx = TenantContext::new(tenant_id, hospital_id);
        if let Some(user_id) = http.authorizer_str("userId") {
            ctx = ctx.with_user(user_id);
        }
        if let Some(role) = http.authorizer_str("role") {
            ctx = ctx.with_role(role);
        }
        Some(ctx)
    }

    fn direct_tenant_context(value: &serde_json::Value) -> Option<TenantContext> {
        let tenant_id = value
            .get("tenant_id")
            .and_then(|v| v.as_str())?
            .parse::<TenantId>()
            .ok()?;
        let hospital_id = value
            .get("hospital_id")
            .and_then(|v| v.as_str())
            .and_then(|h| h.parse::<HospitalId>().ok())
            .unwrap_or_else(HospitalId::default_hospital);
        Some(TenantContext::new(tenant_id, hospital_id))
    }
}
