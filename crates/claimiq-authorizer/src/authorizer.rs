//! The composed authorization flow.
//!
//! State machine: `TokenMissing → Reject`; `TokenPresent → Validating →
//! {ValidationFailed → Reject, ValidationSucceeded → ContextExtracted →
//! Allow}`. Every terminal transition emits exactly one audit event
//! before the decision is returned; audit failures never change or delay
//! the outcome.

use serde_json::json;
use uuid::Uuid;

use claimiq_audit::{AuditEvent, AuditLogger};
use claimiq_auth::{
    AuthError, AuthorizationContext, SigningKeyCache, TokenValidator, ValidationConfig,
};

use crate::config::AuthorizerConfig;
use crate::policy::{self, AuthorizerResponse, ANONYMOUS_PRINCIPAL};
use crate::request::AuthorizerRequest;

/// Agent type stamped on every authorizer audit event.
pub const AGENT_TYPE: &str = "AUTHORIZER";

/// Audit action: the request carried no bearer credential.
pub const ACTION_TOKEN_MISSING: &str = "TOKEN_MISSING";

/// Audit action: the bearer credential failed validation.
pub const ACTION_TOKEN_INVALID: &str = "TOKEN_INVALID";

/// Audit action: the request was authorized.
pub const ACTION_AUTHORIZED: &str = "AUTHORIZED";

/// Token-validating gatekeeper in front of every protected API call.
pub struct Authorizer {
    validator: TokenValidator,
    audit: AuditLogger,
}

impl Authorizer {
    /// Create an authorizer from an already-wired validator.
    #[must_use]
    pub fn new(validator: TokenValidator, audit: AuditLogger) -> Self {
        Self { validator, audit }
    }

    /// Create an authorizer from configuration.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::JwksFetchFailed` if the HTTP client for the
    /// signing-key cache cannot be created.
    pub fn from_config(config: &AuthorizerConfig, audit: AuditLogger) -> Result<Self, AuthError> {
        let keys = SigningKeyCache::new(config.jwks_url())
            .map(|cache| {
                cache
                    .with_cache_ttl(config.jwks_cache_ttl)
                    .with_max_keys(config.jwks_cache_max_keys)
            })?;

        let validation = ValidationConfig::default()
            .issuer(config.issuer_url())
            .audience(config.client_id.clone());

        Ok(Self::new(TokenValidator::new(keys, validation), audit))
    }

    /// Authorize one inbound request.
    ///
    /// Always returns a decision; no error escapes this boundary. The
    /// caller cannot distinguish why a request was denied: internal
    /// distinctions are visible only in logs and the audit trail.
    pub async fn authorize(&self, request: &AuthorizerRequest) -> AuthorizerResponse {
        let request_id = request
            .request_id()
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let Some(token) = request.bearer_token() else {
            tracing::warn!(
                request_id = %request_id,
                method = %request.http_method,
                path = %request.path,
                "authorization request without bearer token"
            );
            self.audit_reject(request, &request_id, ACTION_TOKEN_MISSING, "no bearer token")
                .await;
            return policy::deny(ANONYMOUS_PRINCIPAL, &request.method_arn);
        };

        let Some(claims) = self.validator.validate(token).await else {
            self.audit_reject(
                request,
                &request_id,
                ACTION_TOKEN_INVALID,
                "token validation failed",
            )
            .await;
            return policy::deny(ANONYMOUS_PRINCIPAL, &request.method_arn);
        };

        let context = AuthorizationContext::from_claims(&claims);

        tracing::info!(
            request_id = %request_id,
            user_id = %context.user_id,
            tenant_id = %context.tenant_id,
            method = %request.http_method,
            path = %request.path,
            "request authorized"
        );

        self.audit
            .record(
                AuditEvent::builder(AGENT_TYPE, ACTION_AUTHORIZED)
                    .claim_id(request_id)
                    .tenant_id(context.tenant_id.clone())
                    .details(json!({
                        "method": request.http_method,
                        "path": request.path,
                        "user_id": context.user_id,
                        "role": context.role,
                    }))
                    .build(),
            )
            .await;

        policy::allow(&context.user_id, &request.method_arn, &context)
    }

    async fn audit_reject(
        &self,
        request: &AuthorizerRequest,
        request_id: &str,
        action: &str,
        message: &str,
    ) {
        self.audit
            .record(
                AuditEvent::builder(AGENT_TYPE, action)
                    .claim_id(request_id)
                    .error(message)
                    .details(json!({
                        "method": request.http_method,
                        "path": request.path,
                    }))
                    .build(),
            )
            .await;
    }
}

impl std::fmt::Debug for Authorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authorizer")
            .field("validator", &self.validator)
            .finish_non_exhaustive()
    }
}
