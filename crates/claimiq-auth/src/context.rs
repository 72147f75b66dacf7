//! Authorization context extracted from validated claims.
//!
//! Pure mapping, no I/O: validated claims become the normalized
//! tenant/user context propagated to downstream handlers. Requests whose
//! claims omit tenant or hospital fields fall back to the platform
//! sentinels (`default-tenant` / `default-hospital`) rather than being
//! rejected; all such requests share one default bucket, so strict
//! deployments must additionally require a resolved tenant.

use crate::claims::IdentityClaims;
use claimiq_core::{HospitalId, TenantContext, TenantId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Role assigned when the claims carry no `custom:role`.
pub const DEFAULT_ROLE: &str = "user";

/// Normalized per-request authorization context.
///
/// Immutable; created once per request from validated claims and passed by
/// value to downstream handlers. Never persisted directly (only
/// audit-logged).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationContext {
    /// Authenticated user ID (the token subject).
    pub user_id: String,

    /// Tenant the request is attributed to.
    pub tenant_id: TenantId,

    /// Hospital within the tenant.
    pub hospital_id: HospitalId,

    /// Role for authorization decisions.
    pub role: String,

    /// Username, falling back to the subject when the authority omits it.
    pub username: String,

    /// Email address, when the authority includes it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl AuthorizationContext {
    /// Map validated claims into an authorization context.
    ///
    /// Pure and idempotent: the same claims always produce an identical
    /// context.
    #[must_use]
    pub fn from_claims(claims: &IdentityClaims) -> Self {
        let tenant_id = claims
            .tenant_id
            .as_deref()
            .and_then(|t| t.parse::<TenantId>().ok())
            .unwrap_or_else(TenantId::default_tenant);

        let hospital_id = claims
            .hospital_id
            .as_deref()
            .and_then(|h| h.parse::<HospitalId>().ok())
            .unwrap_or_else(HospitalId::default_hospital);

        let role = claims
            .role
            .clone()
            .unwrap_or_else(|| DEFAULT_ROLE.to_string());

        let username = claims.username.clone().unwrap_or_else(|| claims.sub.clone());

        Self {
            user_id: claims.sub.clone(),
            tenant_id,
            hospital_id,
            role,
            username,
            email: claims.email.clone(),
        }
    }

    /// The lighter-weight tenant tuple propagated to business logic.
    ///
    /// Converges with the header-derived extraction path on the same
    /// shape, so downstream consumers are agnostic to which path produced
    /// the context.
    #[must_use]
    pub fn tenant_context(&self) -> TenantContext {
        TenantContext::new(self.tenant_id.clone(), self.hospital_id.clone())
            .with_user(self.user_id.clone())
            .with_role(self.role.clone())
    }

    /// The context as a string-only map, per the gateway's authorizer
    /// contract.
    #[must_use]
    pub fn to_string_map(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        map.insert("userId".to_string(), self.user_id.clone());
        map.insert("tenantId".to_string(), self.tenant_id.to_string());
        map.insert("hospitalId".to_string(), self.hospital_id.to_string());
        map.insert("role".to_string(), self.role.clone());
        map.insert("username".to_string(), self.username.clone());
        if let Some(email) = &self.email {
            map.insert("email".to_string(), email.clone());
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_claims_full() {
        let claims = IdentityClaims::builder()
            .subject("u1")
            .tenant_id("t1")
            .hospital_id("h1")
            .role("admin")
            .username("user-one")
            .email("u1@example.com")
            .build();

        let ctx = AuthorizationContext::from_claims(&claims);
        assert_eq!(ctx.user_id, "u1");
        assert_eq!(ctx.tenant_id.as_str(), "t1");
        assert_eq!(ctx.hospital_id.as_str(), "h1");
        assert_eq!(ctx.role, "admin");
        assert_eq!(ctx.username, "user-one");
        assert_eq!(ctx.email.as_deref(), Some("u1@example.com"));
    }

    #[test]
    fn test_from_claims_defaults() {
        // No tenant, hospital, or role claims: sentinels and default role.
        let claims = IdentityClaims::builder().subject("u1").build();

        let ctx = AuthorizationContext::from_claims(&claims);
        assert_eq!(ctx.tenant_id.as_str(), "default-tenant");
        assert_eq!(ctx.hospital_id.as_str(), "default-hospital");
        assert_eq!(ctx.role, "user");
        assert_eq!(ctx.username, "u1");
        assert!(ctx.email.is_none());
    }

    #[test]
    fn test_from_claims_tenant_without_role() {
        let claims = IdentityClaims::builder()
            .subject("u1")
            .tenant_id("t1")
            .build();

        let ctx = AuthorizationContext::from_claims(&claims);
        assert_eq!(ctx.tenant_id.as_str(), "t1");
        assert_eq!(ctx.role, "user");
    }

    #[test]
    fn test_from_claims_is_idempotent() {
        let claims = IdentityClaims::builder()
            .subject("u1")
            .tenant_id("t1")
            .role("reviewer")
            .build();

        let first = AuthorizationContext::from_claims(&claims);
        let second = AuthorizationContext::from_claims(&claims);
        assert_eq!(first, second);
    }

    #[test]
    fn test_tenant_context_convergence() {
        let claims = IdentityClaims::builder()
            .subject("u1")
            .tenant_id("t1")
            .hospital_id("h1")
            .role("admin")
            .build();

        let ctx = AuthorizationContext::from_claims(&claims).tenant_context();
        assert_eq!(ctx.tenant_id.as_str(), "t1");
        assert_eq!(ctx.hospital_id.as_str(), "h1");
        assert_eq!(ctx.user_id.as_deref(), Some("u1"));
        assert_eq!(ctx.role.as_deref(), Some("admin"));
    }

    #[test]
    fn test_string_map_values() {
        let claims = IdentityClaims::builder()
            .subject("u1")
            .tenant_id("t1")
            .email("u1@example.com")
            .build();

        let map = AuthorizationContext::from_claims(&claims).to_string_map();
        assert_eq!(map.get("userId").map(String::as_str), Some("u1"));
        assert_eq!(map.get("tenantId").map(String::as_str), Some("t1"));
        assert_eq!(
            map.get("hospitalId").map(String::as_str),
            Some("default-hospital")
        );
        assert_eq!(map.get("role").map(String::as_str), Some("user"));
        assert_eq!(map.get("email").map(String::as_str), Some("u1@example.com"));
    }

    #[test]
    fn test_string_map_omits_absent_email() {
        let claims = IdentityClaims::builder().subject("u1").build();
        let map = AuthorizationContext::from_claims(&claims).to_string_map();
        assert!(!map.contains_key("email"));
    }
}
