//! Core types shared across the ClaimIQ platform.
//!
//! This crate provides:
//! - Strongly typed identifiers for tenants and hospitals
//! - The `TenantContext` tuple propagated to downstream handlers
//!
//! # Example
//!
//! ```
//! use claimiq_core::{TenantContext, TenantId};
//!
//! let tenant: TenantId = "apollo-group".parse().unwrap();
//! let ctx = TenantContext::new(tenant, "apollo-main".parse().unwrap())
//!     .with_user("u1")
//!     .with_role("admin");
//!
//! assert_eq!(ctx.tenant_id.as_str(), "apollo-group");
//! ```

mod context;
mod ids;

pub use context::TenantContext;
pub use ids::{HospitalId, ParseIdError, TenantId, DEFAULT_HOSPITAL, DEFAULT_TENANT};
