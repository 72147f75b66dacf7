//! JWKS (JSON Web Key Set) fetching and caching.
//!
//! Provides the bounded, TTL-expiring signing-key cache that sits in front
//! of the identity authority's published JWKS endpoint. The cache is
//! process-local, owned by whoever constructs it, and passed by reference
//! into the token validator.

use crate::error::AuthError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// A JSON Web Key as defined in RFC 7517.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Jwk {
    /// Key type (e.g., "RSA").
    pub kty: String,

    /// Key ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,

    /// Public key use (e.g., "sig" for signature).
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub key_use: Option<String>,

    /// Algorithm (e.g., "RS256").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,

    /// RSA modulus (`Base64URL` encoded).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,

    /// RSA exponent (`Base64URL` encoded).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,
}

impl Jwk {
    /// The RSA components needed to verify a signature.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidKey` if the modulus or exponent is
    /// missing from the key material.
    pub fn rsa_components(&self) -> Result<(&str, &str), AuthError> {
        let n = self
            .n
            .as_deref()
            .ok_or_else(|| AuthError::InvalidKey("Missing modulus (n)".to_string()))?;
        let e = self
            .e
            .as_deref()
            .ok_or_else(|| AuthError::InvalidKey("Missing exponent (e)".to_string()))?;
        Ok((n, e))
    }
}

/// A JSON Web Key Set as defined in RFC 7517.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwkSet {
    /// Array of JWK values.
    pub keys: Vec<Jwk>,
}

impl JwkSet {
    /// Find a key by its kid.
    #[must_use]
    pub fn find_key(&self, kid: &str) -> Option<&Jwk> {
        self.keys.iter().find(|k| k.kid.as_deref() == Some(kid))
    }
}

/// A cached signing key with its fetch time.
struct CachedKey {
    jwk: Jwk,
    fetched_at: Instant,
}

/// Cache bookkeeping: keys by kid plus insertion order for eviction.
#[derive(Default)]
struct CacheInner {
    keys: HashMap<String, CachedKey>,
    insertion_order: VecDeque<String>,
}

impl CacheInner {
    /// Insert or refresh a key; evict oldest-inserted entries past the cap.
    fn insert(&mut self, kid: String, jwk: Jwk, now: Instant, max_keys: usize) {
        let replaced = self
            .keys
            .insert(
                kid.clone(),
                CachedKey {
                    jwk,
                    fetched_at: now,
                },
            )
            .is_some();

        if !replaced {
            self.insertion_order.push_back(kid);
        }

        while self.keys.len() > max_keys {
            match self.insertion_order.pop_front() {
                Some(oldest) => {
                    self.keys.remove(&oldest);
                }
                None => break,
            }
        }
    }
}

/// Default time-to-live for cached signing keys.
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Default maximum number of cached signing keys.
const DEFAULT_MAX_KEYS: usize = 16;

/// Bounded signing-key cache in front of a JWKS endpoint.
///
/// On a fresh cache hit the key is returned without any network I/O; on a
/// miss or an expired entry the full key set is fetched once, the cache is
/// repopulated (capped at a fixed maximum, oldest-inserted entries evicted
/// first), and the requested key is returned. Entries expire after a fixed
/// TTL even under the count cap so that key rotation by the authority is
/// picked up.
///
/// # Example
///
/// ```rust,ignore
/// use claimiq_auth::SigningKeyCache;
///
/// let cache = SigningKeyCache::new(
///     "https://idp.example.com/pool-1/.well-known/jwks.json",
/// )?;
///
/// let jwk = cache.get_key("key-1").await?;
/// ```
pub struct SigningKeyCache {
    jwks_url: String,
    http_client: reqwest::Client,
    cache_ttl: Duration,
    max_keys: usize,
    inner: RwLock<CacheInner>,
}

impl SigningKeyCache {
    /// Create a new signing-key cache for a JWKS endpoint.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::JwksFetchFailed` if the HTTP client cannot be
    /// created.
    pub fn new(jwks_url: impl Into<String>) -> Result<Self, AuthError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| {
                AuthError::JwksFetchFailed(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            jwks_url: jwks_url.into(),
            http_client,
            cache_ttl: DEFAULT_CACHE_TTL,
            max_keys: DEFAULT_MAX_KEYS,
            inner: RwLock::new(CacheInner::default()),
        })
    }

    /// Set the cache TTL.
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Set the maximum number of cached keys.
    ///
    /// A cap of zero is treated as one: the most recently fetched key is
    /// always retained.
    #[must_use]
    pub fn with_max_keys(mut self, max_keys: usize) -> Self {
        self.max_keys = max_keys.max(1);
        self
    }

    /// Get a key by kid.
    ///
    /// Returns the cached key when present and unexpired; otherwise fetches
    /// the key set (exactly one network call), repopulates the cache, and
    /// returns the requested key.
    ///
    /// # Errors
    ///
    /// - `AuthError::JwksFetchFailed` if the endpoint cannot be reached or
    ///   returns an invalid payload
    /// - `AuthError::KeyNotFound` if the fetched key set has no key with
    ///   the given kid
    pub async fn get_key(&self, kid: &str) -> Result<Jwk, AuthError> {
        {
            let inner = self.inner.read().await;
            if let Some(cached) = inner.keys.get(kid) {
                if cached.fetched_at.elapsed() < self.cache_ttl {
                    return Ok(cached.jwk.clone());
                }
            }
        }

        let jwks = self.fetch_jwks().await?;

        let now = Instant::now();
        {
            let mut inner = self.inner.write().await;
            for key in &jwks.keys {
                if let Some(key_id) = &key.kid {
                    inner.insert(key_id.clone(), key.clone(), now, self.max_keys);
                }
            }
        }

        jwks.find_key(kid)
            .cloned()
            .ok_or_else(|| AuthError::KeyNotFound(kid.to_string()))
    }

    /// Fetch the key set from the endpoint.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::JwksFetchFailed` if the fetch fails.
    pub async fn fetch_jwks(&self) -> Result<JwkSet, AuthError> {
        tracing::debug!(url = %self.jwks_url, "fetching JWKS");

        let response = self
            .http_client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| AuthError::JwksFetchFailed(format!("Request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AuthError::JwksFetchFailed(format!(
                "HTTP {}: {}",
                response.status(),
                response.status().canonical_reason().unwrap_or("Unknown")
            )));
        }

        response
            .json::<JwkSet>()
            .await
            .map_err(|e| AuthError::JwksFetchFailed(format!("Invalid JSON: {e}")))
    }

    /// Drop every cached key.
    pub async fn clear(&self) {
        let mut inner = self.inner.write().await;
        inner.keys.clear();
        inner.insertion_order.clear();
    }
}

impl std::fmt::Debug for SigningKeyCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKeyCache")
            .field("jwks_url", &self.jwks_url)
            .field("cache_ttl", &self.cache_ttl)
            .field("max_keys", &self.max_keys)
            .finish()
    }
}
