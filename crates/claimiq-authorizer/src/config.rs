use std::time::Duration;

/// Configuration for the gateway authorizer.
///
/// All three identity-authority values are required; a missing one is a
/// fatal startup error, never a per-request error.
#[derive(Debug, Clone)]
pub struct AuthorizerConfig {
    /// Identity authority host (e.g. `idp.example.com`).
    pub idp_host: String,

    /// Authority pool identifier.
    pub pool_id: String,

    /// Client identifier tokens must be issued for (audience check).
    pub client_id: String,

    /// TTL for cached signing keys.
    pub jwks_cache_ttl: Duration,

    /// Maximum number of cached signing keys.
    pub jwks_cache_max_keys: usize,
}

impl AuthorizerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_reader(|key| std::env::var(key))
    }

    /// Load configuration from a custom variable reader.
    ///
    /// This allows tests to supply variables without mutating
    /// process-global environment state.
    pub fn from_reader<F>(reader: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        let idp_host =
            reader("IDP_HOST").map_err(|_| ConfigError::MissingVar("IDP_HOST".into()))?;

        let pool_id =
            reader("IDP_POOL_ID").map_err(|_| ConfigError::MissingVar("IDP_POOL_ID".into()))?;

        let client_id = reader("IDP_CLIENT_ID")
            .map_err(|_| ConfigError::MissingVar("IDP_CLIENT_ID".into()))?;

        let jwks_cache_ttl_secs = reader("JWKS_CACHE_TTL_SECS")
            .unwrap_or_else(|_| "300".to_string())
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidValue("JWKS_CACHE_TTL_SECS".into(), e.to_string()))?;

        let jwks_cache_max_keys = reader("JWKS_CACHE_MAX_KEYS")
            .unwrap_or_else(|_| "16".to_string())
            .parse::<usize>()
            .map_err(|e| ConfigError::InvalidValue("JWKS_CACHE_MAX_KEYS".into(), e.to_string()))?;

        Ok(Self {
            idp_host,
            pool_id,
            client_id,
            jwks_cache_ttl: Duration::from_secs(jwks_cache_ttl_secs),
            jwks_cache_max_keys,
        })
    }

    /// The issuer URL tokens must carry.
    #[must_use]
    pub fn issuer_url(&self) -> String {
        format!("https://{}/{}", self.idp_host, self.pool_id)
    }

    /// The authority's published JWKS endpoint.
    #[must_use]
    pub fn jwks_url(&self) -> String {
        format!(
            "https://{}/{}/.well-known/jwks.json",
            self.idp_host, self.pool_id
        )
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(String),

    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::env::VarError;

    /// Create a reader closure from a HashMap (no global env mutation).
    fn make_reader(vars: HashMap<&str, &str>) -> impl Fn(&str) -> Result<String, VarError> {
        let owned: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| owned.get(key).cloned().ok_or(VarError::NotPresent)
    }

    fn required_vars() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("IDP_HOST", "idp.example.com"),
            ("IDP_POOL_ID", "pool-1"),
            ("IDP_CLIENT_ID", "client-1"),
        ])
    }

    #[test]
    fn test_missing_host() {
        let mut vars = required_vars();
        vars.remove("IDP_HOST");

        let result = AuthorizerConfig::from_reader(make_reader(vars));
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(_)));
        assert!(err.to_string().contains("IDP_HOST"));
    }

    #[test]
    fn test_missing_pool_id() {
        let mut vars = required_vars();
        vars.remove("IDP_POOL_ID");

        let err = AuthorizerConfig::from_reader(make_reader(vars)).unwrap_err();
        assert!(err.to_string().contains("IDP_POOL_ID"));
    }

    #[test]
    fn test_missing_client_id() {
        let mut vars = required_vars();
        vars.remove("IDP_CLIENT_ID");

        let err = AuthorizerConfig::from_reader(make_reader(vars)).unwrap_err();
        assert!(err.to_string().contains("IDP_CLIENT_ID"));
    }

    #[test]
    fn test_defaults() {
        let config = AuthorizerConfig::from_reader(make_reader(required_vars())).unwrap();

        assert_eq!(config.idp_host, "idp.example.com");
        assert_eq!(config.pool_id, "pool-1");
        assert_eq!(config.client_id, "client-1");
        assert_eq!(config.jwks_cache_ttl, Duration::from_secs(300));
        assert_eq!(config.jwks_cache_max_keys, 16);
    }

    #[test]
    fn test_custom_cache_values() {
        let mut vars = required_vars();
        vars.insert("JWKS_CACHE_TTL_SECS", "60");
        vars.insert("JWKS_CACHE_MAX_KEYS", "4");

        let config = AuthorizerConfig::from_reader(make_reader(vars)).unwrap();
        assert_eq!(config.jwks_cache_ttl, Duration::from_secs(60));
        assert_eq!(config.jwks_cache_max_keys, 4);
    }

    #[test]
    fn test_invalid_ttl() {
        let mut vars = required_vars();
        vars.insert("JWKS_CACHE_TTL_SECS", "not-a-number");

        let err = AuthorizerConfig::from_reader(make_reader(vars)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(..)));
        assert!(err.to_string().contains("JWKS_CACHE_TTL_SECS"));
    }

    #[test]
    fn test_derived_urls() {
        let config = AuthorizerConfig::from_reader(make_reader(required_vars())).unwrap();

        assert_eq!(config.issuer_url(), "https://idp.example.com/pool-1");
        assert_eq!(
            config.jwks_url(),
            "https://idp.example.com/pool-1/.well-known/jwks.json"
        );
    }
}
