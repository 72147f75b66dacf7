//! Token validation library for the ClaimIQ platform.
//!
//! This crate provides:
//! - RS256 JWT validation against the identity authority's published keys
//! - A bounded, TTL-expiring signing-key cache with key rotation support
//! - Authorization context extraction from validated claims
//!
//! The subsystem only verifies tokens issued by the external identity
//! authority; it never issues tokens or manages user lifecycle.
//!
//! # Example
//!
//! ```rust,ignore
//! use claimiq_auth::{SigningKeyCache, TokenValidator, ValidationConfig};
//! use claimiq_auth::AuthorizationContext;
//!
//! let keys = SigningKeyCache::new(
//!     "https://idp.example.com/pool-1/.well-known/jwks.json",
//! )?;
//! let validator = TokenValidator::new(
//!     keys,
//!     ValidationConfig::default()
//!         .issuer("https://idp.example.com/pool-1")
//!         .audience("client-1"),
//! );
//!
//! match validator.validate(&token).await {
//!     Some(claims) => {
//!         let ctx = AuthorizationContext::from_claims(&claims);
//!         // propagate ctx downstream
//!     }
//!     None => {
//!         // uniformly unauthenticated, reason visible only in logs
//!     }
//! }
//! ```

mod claims;
mod context;
mod error;
mod jwks;
mod jwt;

// Re-export public API
pub use claims::{IdentityClaims, IdentityClaimsBuilder};
pub use context::{AuthorizationContext, DEFAULT_ROLE};
pub use error::AuthError;
pub use jwks::{Jwk, JwkSet, SigningKeyCache};
pub use jwt::{
    decode_token_with_key, encode_token_with_kid, extract_kid, TokenValidator, ValidationConfig,
};
