//! Tenant context propagated to downstream handlers.
//!
//! Both context-extraction paths (full claim validation in the authorizer,
//! and the lightweight header extraction used by already-authenticated
//! internal calls) converge on this shape, so downstream consumers are
//! agnostic to which path produced it.

use crate::ids::{HospitalId, TenantId};
use serde::{Deserialize, Serialize};

/// The minimal tenant tuple propagated to business logic for isolation
/// enforcement.
///
/// Immutable once constructed; passed by value to handlers and never
/// persisted directly (only audit-logged).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantContext {
    /// Tenant the request is attributed to.
    pub tenant_id: TenantId,

    /// Hospital within the tenant.
    pub hospital_id: HospitalId,

    /// Authenticated user, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Role of the authenticated user, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl TenantContext {
    /// Create a context for a tenant/hospital pair with no user identity.
    #[must_use]
    pub fn new(tenant_id: TenantId, hospital_id: HospitalId) -> Self {
        Self {
            tenant_id,
            hospital_id,
            user_id: None,
            role: None,
        }
    }

    /// Attach the authenticated user.
    #[must_use]
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Attach the user's role.
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Context attributed to the sentinel default tenant/hospital.
    #[must_use]
    pub fn fallback() -> Self {
        Self::new(TenantId::default_tenant(), HospitalId::default_hospital())
    }

    /// Whether the request resolved to the sentinel default tenant.
    #[must_use]
    pub fn is_default_tenant(&self) -> bool {
        self.tenant_id.is_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_has_no_user() {
        let ctx = TenantContext::new(
            "t1".parse().unwrap(),
            "h1".parse().unwrap(),
        );
        assert_eq!(ctx.tenant_id.as_str(), "t1");
        assert_eq!(ctx.hospital_id.as_str(), "h1");
        assert!(ctx.user_id.is_none());
        assert!(ctx.role.is_none());
    }

    #[test]
    fn test_builder_style_attachments() {
        let ctx = TenantContext::new(
            "t1".parse().unwrap(),
            "h1".parse().unwrap(),
        )
        .with_user("u1")
        .with_role("admin");

        assert_eq!(ctx.user_id.as_deref(), Some("u1"));
        assert_eq!(ctx.role.as_deref(), Some("admin"));
    }

    #[test]
    fn test_fallback_uses_sentinels() {
        let ctx = TenantContext::fallback();
        assert!(ctx.is_default_tenant());
        assert_eq!(ctx.tenant_id.as_str(), "default-tenant");
        assert_eq!(ctx.hospital_id.as_str(), "default-hospital");
    }

    #[test]
    fn test_optional_fields_not_serialized_when_none() {
        let ctx = TenantContext::fallback();
        let json = serde_json::to_string(&ctx).unwrap();
        assert!(!json.contains("user_id"));
        assert!(!json.contains("role"));
    }
}
