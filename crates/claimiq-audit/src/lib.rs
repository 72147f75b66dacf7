//! Audit logging for the ClaimIQ platform.
//!
//! Append-only structured event records for every authorization and
//! execution outcome, written through a best-effort logger so that audit
//! failures can never become a cause of request failure.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use claimiq_audit::{AuditEvent, AuditLogger, InMemoryAuditSink};
//!
//! let sink = Arc::new(InMemoryAuditSink::new());
//! let logger = AuditLogger::new(sink.clone());
//!
//! logger
//!     .record(
//!         AuditEvent::builder("AUTHORIZER", "AUTHORIZED")
//!             .claim_id("req-1")
//!             .tenant_id("t1".parse().unwrap())
//!             .build(),
//!     )
//!     .await;
//!
//! assert_eq!(sink.len().await, 1);
//! ```

mod event;
mod logger;
mod sink;

pub use event::{AuditEvent, AuditEventBuilder, AuditStatus};
pub use logger::AuditLogger;
pub use sink::{AuditSink, AuditSinkError, FailingAuditSink, InMemoryAuditSink};
