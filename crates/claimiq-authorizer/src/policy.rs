//! Wire-level authorization decisions.
//!
//! Converts an authorization outcome into the gateway's expected
//! authorizer-result contract: a principal, an IAM-style policy document
//! with a single statement, and an optional string-only context map.

use std::collections::BTreeMap;

use claimiq_auth::AuthorizationContext;
use serde::{Deserialize, Serialize};

/// Policy document version required by the gateway.
pub const POLICY_VERSION: &str = "2012-10-17";

/// The action every statement grants or denies.
pub const INVOKE_ACTION: &str = "execute-api:Invoke";

/// Principal used on decisions with no verified subject.
pub const ANONYMOUS_PRINCIPAL: &str = "anonymous";

/// Decision effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Allow,
    Deny,
}

/// A single policy statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyStatement {
    pub action: String,
    pub effect: Effect,
    pub resource: String,
}

/// IAM-style policy document with exactly one statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub statement: Vec<PolicyStatement>,
}

/// The decision object consumed by the gateway.
///
/// Invariant: `context` is present only on Allow decisions. Deny
/// decisions never carry a context, regardless of what was supplied to
/// the generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerResponse {
    pub principal_id: String,
    pub policy_document: PolicyDocument,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<BTreeMap<String, String>>,
}

impl AuthorizerResponse {
    /// The decision's effect.
    #[must_use]
    pub fn effect(&self) -> Effect {
        self.policy_document
            .statement
            .first()
            .map_or(Effect::Deny, |s| s.effect)
    }

    /// Whether this decision allows the request.
    #[must_use]
    pub fn is_allow(&self) -> bool {
        self.effect() == Effect::Allow
    }
}

fn document(effect: Effect, resource_arn: &str) -> PolicyDocument {
    PolicyDocument {
        version: POLICY_VERSION.to_string(),
        statement: vec![PolicyStatement {
            action: INVOKE_ACTION.to_string(),
            effect,
            resource: resource_arn.to_string(),
        }],
    }
}

/// Build an Allow decision carrying the context for propagation to the
/// downstream handler invocation.
#[must_use]
pub fn allow(
    principal_id: &str,
    resource_arn: &str,
    context: &AuthorizationContext,
) -> AuthorizerResponse {
    AuthorizerResponse {
        principal_id: principal_id.to_string(),
        policy_document: document(Effect::Allow, resource_arn),
        context: Some(context.to_string_map()),
    }
}

/// Build a Deny decision. Never carries a context.
#[must_use]
pub fn deny(principal_id: &str, resource_arn: &str) -> AuthorizerResponse {
    AuthorizerResponse {
        principal_id: principal_id.to_string(),
        policy_document: document(Effect::Deny, resource_arn),
        context: None,
    }
}

/// Build a decision from an outcome.
///
/// The Deny-carries-no-context invariant is enforced here, not by
/// callers: a context supplied alongside `Effect::Deny` is dropped.
#[must_use]
pub fn generate(
    principal_id: &str,
    effect: Effect,
    resource_arn: &str,
    context: Option<&AuthorizationContext>,
) -> AuthorizerResponse {
    match (effect, context) {
        (Effect::Allow, Some(ctx)) => allow(principal_id, resource_arn, ctx),
        (Effect::Allow, None) => AuthorizerResponse {
            principal_id: principal_id.to_string(),
            policy_document: document(Effect::Allow, resource_arn),
            context: None,
        },
        (Effect::Deny, _) => deny(principal_id, resource_arn),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimiq_auth::IdentityClaims;

    const RESOURCE: &str = "arn:aws:execute-api:us-east-1:123:api/dev/GET/claims";

    fn test_context() -> AuthorizationContext {
        let claims = IdentityClaims::builder()
            .subject("u1")
            .tenant_id("t1")
            .hospital_id("h1")
            .role("admin")
            .build();
        AuthorizationContext::from_claims(&claims)
    }

    #[test]
    fn test_allow_carries_context() {
        let response = allow("u1", RESOURCE, &test_context());

        assert!(response.is_allow());
        assert_eq!(response.principal_id, "u1");

        let context = response.context.expect("allow must carry context");
        assert!(!context.is_empty());
        assert_eq!(context.get("tenantId").map(String::as_str), Some("t1"));
        assert_eq!(context.get("userId").map(String::as_str), Some("u1"));
    }

    #[test]
    fn test_deny_never_carries_context() {
        let response = deny(ANONYMOUS_PRINCIPAL, RESOURCE);

        assert!(!response.is_allow());
        assert!(response.context.is_none());
    }

    #[test]
    fn test_generate_drops_context_on_deny() {
        let ctx = test_context();
        let response = generate("u1", Effect::Deny, RESOURCE, Some(&ctx));

        assert_eq!(response.effect(), Effect::Deny);
        assert!(
            response.context.is_none(),
            "deny must drop a supplied context"
        );
    }

    #[test]
    fn test_generate_allow_embeds_context_verbatim() {
        let ctx = test_context();
        let response = generate("u1", Effect::Allow, RESOURCE, Some(&ctx));

        assert_eq!(response.context, Some(ctx.to_string_map()));
    }

    #[test]
    fn test_policy_document_shape() {
        let response = deny(ANONYMOUS_PRINCIPAL, RESOURCE);

        assert_eq!(response.policy_document.version, POLICY_VERSION);
        assert_eq!(response.policy_document.statement.len(), 1);

        let statement = &response.policy_document.statement[0];
        assert_eq!(statement.action, INVOKE_ACTION);
        assert_eq!(statement.resource, RESOURCE);
    }

    #[test]
    fn test_wire_serialization() {
        let response = allow("u1", RESOURCE, &test_context());
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["principalId"], "u1");
        assert_eq!(json["policyDocument"]["Version"], POLICY_VERSION);
        assert_eq!(
            json["policyDocument"]["Statement"][0]["Action"],
            INVOKE_ACTION
        );
        assert_eq!(json["policyDocument"]["Statement"][0]["Effect"], "Allow");
        assert_eq!(json["policyDocument"]["Statement"][0]["Resource"], RESOURCE);
        assert_eq!(json["context"]["tenantId"], "t1");
    }

    #[test]
    fn test_deny_serialization_omits_context() {
        let response = deny(ANONYMOUS_PRINCIPAL, RESOURCE);
        let json = serde_json::to_string(&response).unwrap();

        assert!(!json.contains("\"context\""));
        assert!(json.contains("\"Effect\":\"Deny\""));
    }
}
