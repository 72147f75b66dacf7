//! The shared execution wrapper.
//!
//! Every backend entry point composes its handler with this wrapper to
//! get start-time capture, tenant-context derivation, mandatory-tenant
//! enforcement, structured start/completion/failure logging keyed by a
//! request ID, and optional best-effort audit emission.

use std::future::Future;
use std::time::Instant;

use serde_json::json;
use uuid::Uuid;

use claimiq_audit::{AuditEvent, AuditLogger};
use claimiq_core::TenantContext;

use crate::event::InvocationEvent;

/// Wrapper outcome: the handler's own error is re-raised unchanged inside
/// `Handler`; `MissingTenant` fires before the handler body runs.
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError<E> {
    /// The wrapper requires a tenant and none was resolved from the
    /// event.
    #[error("tenant context required")]
    MissingTenant,

    /// The wrapped handler failed; the original error is preserved.
    #[error("{0}")]
    Handler(E),
}

impl<E> ExecutionError<E> {
    /// The original handler error, if that is what this is.
    pub fn into_handler_error(self) -> Option<E> {
        match self {
            ExecutionError::MissingTenant => None,
            ExecutionError::Handler(err) => Some(err),
        }
    }
}

/// Configuration for one wrapped entry point.
#[derive(Debug, Clone)]
pub struct ExecutionConfig {
    /// Component name stamped on logs and audit events (e.g.
    /// `NORMALIZATION`).
    pub agent_type: String,

    /// Action name stamped on audit events (e.g. `DATA_NORMALIZATION`).
    pub action: String,

    /// Reject the invocation before the handler runs when no tenant
    /// resolves.
    pub require_tenant: bool,
}

impl ExecutionConfig {
    /// Create a config; tenant is not required by default.
    #[must_use]
    pub fn new(agent_type: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            agent_type: agent_type.into(),
            action: action.into(),
            require_tenant: false,
        }
    }

    /// Require a resolved tenant before the handler runs.
    #[must_use]
    pub fn require_tenant(mut self, require: bool) -> Self {
        self.require_tenant = require;
        self
    }
}

/// Wraps handler logic with timing, tenant propagation, logging, and
/// audit.
pub struct ExecutionWrapper {
    config: ExecutionConfig,
    audit: Option<AuditLogger>,
}

impl ExecutionWrapper {
    /// Create a wrapper without audit emission.
    #[must_use]
    pub fn new(config: ExecutionConfig) -> Self {
        Self {
            config,
            audit: None,
        }
    }

    /// Emit best-effort audit events on success and failure.
    #[must_use]
    pub fn with_audit(mut self, audit: AuditLogger) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Run a handler under the wrapper.
    ///
    /// The handler receives the tenant context derived from the event
    /// (`None` when no source named a tenant and the wrapper does not
    /// require one). On handler failure the original error is re-raised
    /// unchanged after the wrapper's logging and audit side effects
    /// complete.
    pub async fn run<T, E, F, Fut>(
        &self,
        event: &InvocationEvent,
        handler: F,
    ) -> Result<T, ExecutionError<E>>
    where
        F: FnOnce(Option<TenantContext>) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let started = Instant::now();
        let request_id = event
            .request_id()
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let tenant = event.tenant_context();

        if self.config.require_tenant && tenant.is_none() {
            tracing::warn!(
                request_id = %request_id,
                agent_type = %self.config.agent_type,
                "tenant context required but none resolved; handler not invoked"
            );
            self.audit_outcome(&request_id, None, Some("tenant context required"), started)
                .await;
            return Err(ExecutionError::MissingTenant);
        }

        tracing::info!(
            request_id = %request_id,
            agent_type = %self.config.agent_type,
            action = %self.config.action,
            tenant_id = tenant.as_ref().map(|t| t.tenant_id.as_str()),
            "handler started"
        );

        match handler(tenant.clone()).await {
            Ok(value) => {
                tracing::info!(
                    request_id = %request_id,
                    agent_type = %self.config.agent_type,
                    duration_ms = started.elapsed().as_millis() as u64,
                    "handler completed"
                );
                self.audit_outcome(&request_id, tenant.as_ref(), None, started)
                    .await;
                Ok(value)
            }
            Err(err) => {
                let message = err.to_string();
                tracing::error!(
                    request_id = %request_id,
                    agent_type = %self.config.agent_type,
                    duration_ms = started.elapsed().as_millis() as u64,
                    error = %message,
                    "handler failed"
                );
                self.audit_outcome(&request_id, tenant.as_ref(), Some(message.as_str()), started)
                    .await;
                Err(ExecutionError::Handler(err))
            }
        }
    }

    /// Best-effort audit emission; sink failures are handled inside the
    /// logger and never reach the handler path.
    async fn audit_outcome(
        &self,
        request_id: &str,
        tenant: Option<&TenantContext>,
        error: Option<&str>,
        started: Instant,
    ) {
        let Some(audit) = &self.audit else {
            return;
        };

        let mut builder = AuditEvent::builder(&self.config.agent_type, &self.config.action)
            .claim_id(request_id)
            .details(json!({
                "duration_ms": started.elapsed().as_millis() as u64,
            }));

        if let Some(tenant) = tenant {
            builder = builder.tenant_id(tenant.tenant_id.clone());
        }
        if let Some(message) = error {
            builder = builder.error(message);
        }

        audit.record(builder.build()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimiq_audit::{AuditStatus, InMemoryAuditSink};
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    fn http_event_with_tenant() -> InvocationEvent {
        InvocationEvent::classify(json!({
            "headers": {"x-tenant-id": "t1", "x-hospital-id": "h1", "x-request-id": "req-1"}
        }))
    }

    fn http_event_without_tenant() -> InvocationEvent {
        InvocationEvent::classify(json!({
            "headers": {"content-type": "application/json"}
        }))
    }

    #[tokio::test]
    async fn passes_tenant_context_to_handler() {
        let wrapper = ExecutionWrapper::new(ExecutionConfig::new("TEST", "TEST_ACTION"));

        let result: Result<String, ExecutionError<&str>> = wrapper
            .run(&http_event_with_tenant(), |tenant| async move {
                let tenant = tenant.expect("tenant should resolve");
                Ok(tenant.tenant_id.to_string())
            })
            .await;

        assert_eq!(result.unwrap(), "t1");
    }

    #[tokio::test]
    async fn missing_tenant_fails_before_handler_runs() {
        let wrapper =
            ExecutionWrapper::new(ExecutionConfig::new("TEST", "TEST_ACTION").require_tenant(true));

        let invoked = Arc::new(AtomicBool::new(false));
        let invoked_clone = invoked.clone();

        let result: Result<(), ExecutionError<&str>> = wrapper
            .run(&http_event_without_tenant(), |_| async move {
                invoked_clone.store(true, Ordering::SeqCst);
                Ok(())
            })
            .await;

        assert!(matches!(result, Err(ExecutionError::MissingTenant)));
        assert!(!invoked.load(Ordering::SeqCst), "handler must not run");
    }

    #[tokio::test]
    async fn tenant_not_required_runs_handler_without_context() {
        let wrapper = ExecutionWrapper::new(ExecutionConfig::new("TEST", "TEST_ACTION"));

        let result: Result<bool, ExecutionError<&str>> = wrapper
            .run(&http_event_without_tenant(), |tenant| async move {
                Ok(tenant.is_none())
            })
            .await;

        assert_eq!(result.unwrap(), true);
    }

    #[tokio::test]
    async fn handler_error_is_reraised_unchanged() {
        let wrapper = ExecutionWrapper::new(ExecutionConfig::new("TEST", "TEST_ACTION"));

        let result: Result<(), ExecutionError<&str>> = wrapper
            .run(&http_event_with_tenant(), |_| async { Err("boom") })
            .await;

        let err = result.unwrap_err();
        assert_eq!(err.into_handler_error(), Some("boom"));
    }

    #[tokio::test]
    async fn audits_success_with_duration() {
        let sink = Arc::new(InMemoryAuditSink::new());
        let wrapper = ExecutionWrapper::new(ExecutionConfig::new("NORMALIZATION", "DATA_NORMALIZATION"))
            .with_audit(AuditLogger::new(sink.clone()));

        let result: Result<(), ExecutionError<&str>> = wrapper
            .run(&http_event_with_tenant(), |_| async { Ok(()) })
            .await;
        assert!(result.is_ok());

        let events = sink.events().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].agent_type, "NORMALIZATION");
        assert_eq!(events[0].action, "DATA_NORMALIZATION");
        assert_eq!(events[0].status, AuditStatus::Success);
        assert_eq!(events[0].claim_id, "req-1");
        assert_eq!(events[0].tenant_id.as_str(), "t1");
        assert!(events[0].details.get("duration_ms").is_some());
    }

    #[tokio::test]
    async fn audits_failure_with_error_message() {
        let sink = Arc::new(InMemoryAuditSink::new());
        let wrapper = ExecutionWrapper::new(ExecutionConfig::new("TEST", "TEST_ACTION"))
            .with_audit(AuditLogger::new(sink.clone()));

        let result: Result<(), ExecutionError<&str>> = wrapper
            .run(&http_event_with_tenant(), |_| async { Err("boom") })
            .await;
        assert!(result.is_err());

        let events = sink.events().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].status, AuditStatus::Error);
        assert_eq!(events[0].error_message.as_deref(), Some("boom"));
    }

    #[tokio::test]
    async fn audits_missing_tenant_rejection() {
        let sink = Arc::new(InMemoryAuditSink::new());
        let wrapper =
            ExecutionWrapper::new(ExecutionConfig::new("TEST", "TEST_ACTION").require_tenant(true))
                .with_audit(AuditLogger::new(sink.clone()));

        let result: Result<(), ExecutionError<&str>> =
            wrapper.run(&http_event_without_tenant(), |_| async { Ok(()) }).await;
        assert!(result.is_err());

        let events = sink.events().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].status, AuditStatus::Error);
        assert_eq!(
            events[0].error_message.as_deref(),
            Some("tenant context required")
        );
    }

    #[tokio::test]
    async fn audit_sink_failure_does_not_affect_handler_result() {
        let wrapper = ExecutionWrapper::new(ExecutionConfig::new("TEST", "TEST_ACTION"))
            .with_audit(AuditLogger::new(Arc::new(claimiq_audit::FailingAuditSink)));

        let result: Result<u32, ExecutionError<&str>> = wrapper
            .run(&http_event_with_tenant(), |_| async { Ok(7) })
            .await;

        assert_eq!(result.unwrap(), 7);
    }
}
