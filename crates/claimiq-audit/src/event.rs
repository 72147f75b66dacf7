//! Audit event records.
//!
//! Every authorization and execution outcome appends one structured event
//! to the durable audit log. Events are append-only: this subsystem never
//! mutates or deletes them (retention is an external-store concern).

use chrono::{DateTime, Utc};
use claimiq_core::TenantId;
use serde::{Deserialize, Serialize};

/// Outcome recorded on an audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditStatus {
    Success,
    Error,
}

impl std::fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditStatus::Success => write!(f, "SUCCESS"),
            AuditStatus::Error => write!(f, "ERROR"),
        }
    }
}

/// A single append-only audit record.
///
/// `claim_id` is the correlation key: the claim being processed where one
/// exists, otherwise a request identifier. `details` carries free-form
/// structured context (processing summaries, error payloads).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Correlation key: claim ID or request ID.
    pub claim_id: String,

    /// When the event occurred (ISO-8601 on the wire).
    pub timestamp: DateTime<Utc>,

    /// Which component produced the event (e.g. `AUTHORIZER`).
    pub agent_type: String,

    /// Tenant the event is attributed to.
    pub tenant_id: TenantId,

    /// What happened (e.g. `TOKEN_INVALID`, `DATA_NORMALIZATION`).
    pub action: String,

    /// Outcome.
    pub status: AuditStatus,

    /// Cause, present on error events (best-effort).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    /// Free-form structured context.
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
}

impl AuditEvent {
    /// Create a builder for an audit event.
    #[must_use]
    pub fn builder(agent_type: impl Into<String>, action: impl Into<String>) -> AuditEventBuilder {
        AuditEventBuilder {
            claim_id: None,
            agent_type: agent_type.into(),
            tenant_id: None,
            action: action.into(),
            status: AuditStatus::Success,
            error_message: None,
            details: serde_json::Value::Null,
        }
    }
}

/// Builder for audit events.
#[derive(Debug)]
pub struct AuditEventBuilder {
    claim_id: Option<String>,
    agent_type: String,
    tenant_id: Option<TenantId>,
    action: String,
    status: AuditStatus,
    error_message: Option<String>,
    details: serde_json::Value,
}

impl AuditEventBuilder {
    /// Set the correlation key (claim ID or request ID).
    #[must_use]
    pub fn claim_id(mut self, claim_id: impl Into<String>) -> Self {
        self.claim_id = Some(claim_id.into());
        self
    }

    /// Set the tenant the event is attributed to.
    #[must_use]
    pub fn tenant_id(mut self, tenant_id: TenantId) -> Self {
        self.tenant_id = Some(tenant_id);
        self
    }

    /// Mark the event as an error, recording the cause.
    #[must_use]
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.status = AuditStatus::Error;
        self.error_message = Some(message.into());
        self
    }

    /// Attach free-form structured context.
    #[must_use]
    pub fn details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }

    /// Build the event, stamping the current time.
    ///
    /// # Defaults
    ///
    /// - `claim_id`: new UUID v4 if not set (every row keeps a non-empty
    ///   correlation key)
    /// - `tenant_id`: the sentinel default tenant if not set
    #[must_use]
    pub fn build(self) -> AuditEvent {
        AuditEvent {
            claim_id: self
                .claim_id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            timestamp: Utc::now(),
            agent_type: self.agent_type,
            tenant_id: self.tenant_id.unwrap_or_default(),
            action: self.action,
            status: self.status,
            error_message: self.error_message,
            details: self.details,
        }
    }
}
