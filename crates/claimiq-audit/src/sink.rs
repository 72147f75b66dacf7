//! Audit sink backends.
//!
//! The sink is the boundary to the durable append-only store. Production
//! deployments implement [`AuditSink`] over their log store; the in-memory
//! implementation backs tests and local runs.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::event::AuditEvent;

/// Error appending to an audit sink.
#[derive(Debug, Clone, thiserror::Error)]
#[error("audit append failed: {0}")]
pub struct AuditSinkError(pub String);

/// Storage backend for audit events.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Append one event to the log.
    async fn append(&self, event: AuditEvent) -> Result<(), AuditSinkError>;
}

/// In-memory audit sink for tests and local runs.
#[derive(Default)]
pub struct InMemoryAuditSink {
    events: RwLock<Vec<AuditEvent>>,
}

impl InMemoryAuditSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every appended event, in append order.
    pub async fn events(&self) -> Vec<AuditEvent> {
        self.events.read().await.clone()
    }

    /// Number of appended events.
    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    /// Whether nothing has been appended.
    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }

    /// Events with the given action.
    pub async fn events_with_action(&self, action: &str) -> Vec<AuditEvent> {
        self.events
            .read()
            .await
            .iter()
            .filter(|e| e.action == action)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl AuditSink for InMemoryAuditSink {
    async fn append(&self, event: AuditEvent) -> Result<(), AuditSinkError> {
        let mut events = self.events.write().await;
        events.push(event);
        Ok(())
    }
}

/// Sink that fails every append; used to test best-effort behavior.
pub struct FailingAuditSink;

#[async_trait]
impl AuditSink for FailingAuditSink {
    async fn append(&self, _event: AuditEvent) -> Result<(), AuditSinkError> {
        Err(AuditSinkError("sink unavailable".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::AuditStatus;

    #[tokio::test]
    async fn test_in_memory_append_preserves_order() {
        let sink = InMemoryAuditSink::new();

        sink.append(
            AuditEvent::builder("AUTHORIZER", "TOKEN_MISSING")
                .claim_id("r1")
                .error("no token")
                .build(),
        )
        .await
        .unwrap();
        sink.append(
            AuditEvent::builder("AUTHORIZER", "AUTHORIZED")
                .claim_id("r2")
                .build(),
        )
        .await
        .unwrap();

        let events = sink.events().await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].claim_id, "r1");
        assert_eq!(events[0].status, AuditStatus::Error);
        assert_eq!(events[1].claim_id, "r2");
        assert_eq!(events[1].status, AuditStatus::Success);
    }

    #[tokio::test]
    async fn test_in_memory_filter_by_action() {
        let sink = InMemoryAuditSink::new();
        sink.append(AuditEvent::builder("AUTHORIZER", "AUTHORIZED").build())
            .await
            .unwrap();
        sink.append(AuditEvent::builder("AUTHORIZER", "TOKEN_INVALID").build())
            .await
            .unwrap();

        let authorized = sink.events_with_action("AUTHORIZED").await;
        assert_eq!(authorized.len(), 1);
        assert!(sink.events_with_action("TOKEN_MISSING").await.is_empty());
    }

    #[tokio::test]
    async fn test_failing_sink_errors() {
        let sink = FailingAuditSink;
        let result = sink
            .append(AuditEvent::builder("AUTHORIZER", "AUTHORIZED").build())
            .await;
        assert!(result.is_err());
    }
}
