//! Strongly Typed Identifiers
//!
//! This module provides type-safe identifier types for the ClaimIQ platform.
//! Using the newtype pattern, these types prevent accidental misuse of
//! different ID types at compile time.
//!
//! Tenant and hospital identifiers are opaque slugs assigned at onboarding
//! (e.g. `"default-tenant"`), not UUIDs, so the inner representation is a
//! `String`.
//!
//! # Example
//!
//! ```
//! use claimiq_core::{HospitalId, TenantId};
//!
//! let tenant: TenantId = "apollo-group".parse().unwrap();
//!
//! // Type safety: cannot pass HospitalId where TenantId is expected
//! fn requires_tenant(id: &TenantId) -> String {
//!     id.to_string()
//! }
//!
//! let result = requires_tenant(&tenant);
//! // requires_tenant(&HospitalId::default_hospital()); // would not compile!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Error type for ID parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    /// The type of ID that failed to parse
    pub id_type: &'static str,
    /// What was wrong with the input
    pub message: String,
}

impl Display for ParseIdError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to parse {}: {}", self.id_type, self.message)
    }
}

impl std::error::Error for ParseIdError {}

/// Macro to define a strongly-typed slug ID type
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes the ID, returning the inner string.
            #[must_use]
            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(ParseIdError {
                        id_type: stringify!($name),
                        message: "identifier is empty".to_string(),
                    });
                }
                Ok(Self(trimmed.to_string()))
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// Strongly typed identifier for tenants.
    ///
    /// Used to identify tenants (hospital groups and billing services) in
    /// the multi-tenant ClaimIQ system. Provides compile-time type safety
    /// to prevent confusion with other ID types.
    TenantId
);

define_id!(
    /// Strongly typed identifier for hospitals within a tenant.
    HospitalId
);

/// Sentinel tenant used when a request carries no tenant claim.
pub const DEFAULT_TENANT: &str = "default-tenant";

/// Sentinel hospital used when a request carries no hospital claim.
pub const DEFAULT_HOSPITAL: &str = "default-hospital";

impl TenantId {
    /// The sentinel tenant for unauthenticated/default flows.
    ///
    /// Requests whose claims omit a tenant are attributed to this tenant
    /// rather than rejected. All such requests share one bucket; callers
    /// that need strict isolation must require a resolved tenant instead.
    #[must_use]
    pub fn default_tenant() -> Self {
        Self(DEFAULT_TENANT.to_string())
    }

    /// Whether this is the sentinel default tenant.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.0 == DEFAULT_TENANT
    }
}

impl HospitalId {
    /// The sentinel hospital for unauthenticated/default flows.
    #[must_use]
    pub fn default_hospital() -> Self {
        Self(DEFAULT_HOSPITAL.to_string())
    }

    /// Whether this is the sentinel default hospital.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.0 == DEFAULT_HOSPITAL
    }
}

impl Default for TenantId {
    fn default() -> Self {
        Self::default_tenant()
    }
}

impl Default for HospitalId {
    fn default() -> Self {
        Self::default_hospital()
    }
}
