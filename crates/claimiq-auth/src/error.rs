//! Error types for token validation operations.
//!
//! Provides explicit error variants for all validation failures. These are
//! internal: at the network boundary every variant collapses to the same
//! unauthenticated outcome, so callers cannot distinguish failure causes.

use thiserror::Error;

/// Token validation error types.
///
/// Each variant maps to a specific failure mode. The variants exist for
/// logging and tests; the public validator API exposes only an optional
/// claim set.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// Token has expired (exp claim is in the past).
    #[error("Token has expired")]
    TokenExpired,

    /// Token signature is invalid.
    #[error("Invalid token signature")]
    InvalidSignature,

    /// Token format is malformed or invalid.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Token uses an unsupported algorithm (only RS256 is allowed).
    #[error("Unsupported algorithm: only RS256 is allowed")]
    InvalidAlgorithm,

    /// Token header carries no key ID, so no signing key can be selected.
    #[error("Token header has no key ID")]
    MissingKeyId,

    /// Required claim is missing from token.
    #[error("Missing required claim: {0}")]
    MissingClaim(String),

    /// Failed to fetch the key set from the identity authority.
    #[error("JWKS fetch failed: {0}")]
    JwksFetchFailed(String),

    /// Key with specified kid not found in the fetched key set.
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    /// Public key material is invalid or malformed.
    #[error("Invalid key: {0}")]
    InvalidKey(String),
}
