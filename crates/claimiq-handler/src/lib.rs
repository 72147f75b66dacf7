//! Shared execution wrapper for ClaimIQ backend entry points.
//!
//! This crate provides:
//! - The [`InvocationEvent`] tagged union over known invocation shapes,
//!   with tenant-context derivation for both gateway and direct calls
//! - The [`ExecutionWrapper`]: timing, tenant propagation,
//!   mandatory-tenant enforcement, structured logging, and best-effort
//!   audit emission around arbitrary handler logic
//! - [`retry_with_backoff`] for transiently failing operations
//! - The standard success/error response envelope and CORS header set
//!
//! # Example
//!
//! ```rust,ignore
//! use claimiq_handler::{ExecutionConfig, ExecutionWrapper, InvocationEvent};
//!
//! let wrapper = ExecutionWrapper::new(
//!     ExecutionConfig::new("NORMALIZATION", "DATA_NORMALIZATION").require_tenant(true),
//! )
//! .with_audit(audit_logger);
//!
//! let event = InvocationEvent::classify(payload);
//! let result = wrapper
//!     .run(&event, |tenant| async move {
//!         normalize_claim(&event, tenant).await
//!     })
//!     .await?;
//! ```

mod event;
mod response;
mod retry;
mod wrapper;

pub use event::{
    HttpEvent, InvocationEvent, RequestContext, HOSPITAL_HEADER, REQUEST_ID_HEADER, TENANT_HEADER,
};
pub use response::{ApiResponse, CORS_HEADERS};
pub use retry::retry_with_backoff;
pub use wrapper::{ExecutionConfig, ExecutionError, ExecutionWrapper};
