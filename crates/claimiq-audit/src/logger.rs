//! Best-effort audit logging façade.
//!
//! Auditing is observational, not transactional: a failing or slow sink
//! must never change, fail, or delay the primary authorization/handler
//! path. Sink errors are caught here, logged locally, and dropped.

use std::sync::Arc;

use crate::event::AuditEvent;
use crate::sink::AuditSink;

/// Best-effort writer over an [`AuditSink`].
#[derive(Clone)]
pub struct AuditLogger {
    sink: Arc<dyn AuditSink>,
}

impl AuditLogger {
    /// Create a logger over a sink.
    #[must_use]
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self { sink }
    }

    /// Append an event, swallowing any sink failure.
    ///
    /// Failures are logged at warn level with the event's correlation key
    /// and never propagated to the caller.
    pub async fn record(&self, event: AuditEvent) {
        tracing::debug!(
            claim_id = %event.claim_id,
            agent_type = %event.agent_type,
            action = %event.action,
            status = %event.status,
            "audit event"
        );

        if let Err(err) = self.sink.append(event.clone()).await {
            tracing::warn!(
                claim_id = %event.claim_id,
                action = %event.action,
                error = %err,
                "failed to append audit event"
            );
        }
    }
}

impl std::fmt::Debug for AuditLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditLogger").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{FailingAuditSink, InMemoryAuditSink};

    #[tokio::test]
    async fn test_record_appends_to_sink() {
        let sink = Arc::new(InMemoryAuditSink::new());
        let logger = AuditLogger::new(sink.clone());

        logger
            .record(
                AuditEvent::builder("AUTHORIZER", "AUTHORIZED")
                    .claim_id("r1")
                    .build(),
            )
            .await;

        assert_eq!(sink.len().await, 1);
    }

    #[tokio::test]
    async fn test_record_swallows_sink_failure() {
        let logger = AuditLogger::new(Arc::new(FailingAuditSink));

        // Must not panic or propagate anything.
        logger
            .record(AuditEvent::builder("AUTHORIZER", "AUTHORIZED").build())
            .await;
    }
}
