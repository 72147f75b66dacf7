//! JWT claims structure with standard and custom claims.
//!
//! Provides the `IdentityClaims` struct containing the RFC 7519 standard
//! claims plus the ClaimIQ custom claims (`custom:tenant_id`,
//! `custom:hospital_id`, `custom:role`).

use chrono::Utc;
use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

/// JWT claims containing standard and custom claims.
///
/// # Standard Claims (RFC 7519)
///
/// - `sub`: Subject (the user ID)
/// - `iss`: Issuer (the identity authority)
/// - `aud`: Audience (the client the token was issued for)
/// - `exp`: Expiration time (Unix timestamp)
/// - `iat`: Issued at (Unix timestamp)
/// - `jti`: JWT ID (unique identifier)
///
/// # Custom Claims (ClaimIQ-specific)
///
/// - `custom:tenant_id`: Tenant slug for multi-tenant isolation
/// - `custom:hospital_id`: Hospital slug within the tenant
/// - `custom:role`: Role for authorization
///
/// # Example
///
/// ```rust
/// use claimiq_auth::IdentityClaims;
///
/// let claims = IdentityClaims::builder()
///     .subject("u1")
///     .issuer("https://idp.example.com/pool-1")
///     .audience("client-1")
///     .tenant_id("t1")
///     .role("admin")
///     .expires_in_secs(3600)
///     .build();
///
/// assert_eq!(claims.sub, "u1");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IdentityClaims {
    /// Subject - the user ID.
    pub sub: String,

    /// Issuer - the identity authority that created the token.
    pub iss: String,

    /// Audience - the client identifier(s) the token was issued for.
    /// Accepts both the single-string and array wire forms.
    #[serde(
        default,
        deserialize_with = "string_or_seq",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub aud: Vec<String>,

    /// Expiration time as Unix timestamp.
    pub exp: i64,

    /// Issued at as Unix timestamp.
    #[serde(default)]
    pub iat: i64,

    /// JWT ID - unique identifier for this token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,

    /// Tenant slug for multi-tenant isolation.
    #[serde(rename = "custom:tenant_id", skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,

    /// Hospital slug within the tenant.
    #[serde(
        rename = "custom:hospital_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub hospital_id: Option<String>,

    /// Role for authorization.
    #[serde(rename = "custom:role", skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// User email address, when the authority includes it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Username, when the authority includes it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Deserialize an audience that may be a single string or an array.
fn string_or_seq<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrSeq;

    impl<'de> Visitor<'de> for StringOrSeq {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or an array of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut values = Vec::new();
            while let Some(value) = seq.next_element::<String>()? {
                values.push(value);
            }
            Ok(values)
        }
    }

    deserializer.deserialize_any(StringOrSeq)
}

impl IdentityClaims {
    /// Create a new builder for constructing claims.
    #[must_use]
    pub fn builder() -> IdentityClaimsBuilder {
        IdentityClaimsBuilder::default()
    }

    /// Check if the token is expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// Builder for constructing identity claims.
#[derive(Debug, Default)]
pub struct IdentityClaimsBuilder {
    sub: Option<String>,
    iss: Option<String>,
    aud: Vec<String>,
    exp: Option<i64>,
    iat: Option<i64>,
    jti: Option<String>,
    tenant_id: Option<String>,
    hospital_id: Option<String>,
    role: Option<String>,
    email: Option<String>,
    username: Option<String>,
}

impl IdentityClaimsBuilder {
    /// Set the subject (user ID).
    #[must_use]
    pub fn subject(mut self, sub: impl Into<String>) -> Self {
        self.sub = Some(sub.into());
        self
    }

    /// Set the issuer.
    #[must_use]
    pub fn issuer(mut self, iss: impl Into<String>) -> Self {
        self.iss = Some(iss.into());
        self
    }

    /// Add an audience.
    #[must_use]
    pub fn audience(mut self, aud: impl Into<String>) -> Self {
        self.aud.push(aud.into());
        self
    }

    /// Set expiration time as Unix timestamp.
    #[must_use]
    pub fn expiration(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }

    /// Set expiration time as seconds from now.
    #[must_use]
    pub fn expires_in_secs(mut self, secs: i64) -> Self {
        self.exp = Some(Utc::now().timestamp() + secs);
        self
    }

    /// Set the issued at time.
    #[must_use]
    pub fn issued_at(mut self, iat: i64) -> Self {
        self.iat = Some(iat);
        self
    }

    /// Set the JWT ID.
    #[must_use]
    pub fn jwt_id(mut self, jti: impl Into<String>) -> Self {
        self.jti = Some(jti.into());
        self
    }

    /// Set the tenant slug.
    #[must_use]
    pub fn tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    /// Set the hospital slug.
    #[must_use]
    pub fn hospital_id(mut self, hospital_id: impl Into<String>) -> Self {
        self.hospital_id = Some(hospital_id.into());
        self
    }

    /// Set the role.
    #[must_use]
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Set the email address.
    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the username.
    #[must_use]
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Build the claims.
    ///
    /// # Defaults
    ///
    /// - `sub`: Empty string if not set
    /// - `iss`: Empty string if not set
    /// - `exp`: 1 hour from now if not set
    /// - `iat`: Current time if not set
    /// - `jti`: New UUID v4 if not set
    #[must_use]
    pub fn build(self) -> IdentityClaims {
        let now = Utc::now().timestamp();

        IdentityClaims {
            sub: self.sub.unwrap_or_default(),
            iss: self.iss.unwrap_or_default(),
            aud: self.aud,
            exp: self.exp.unwrap_or(now + 3600),
            iat: self.iat.unwrap_or(now),
            jti: Some(self.jti.unwrap_or_else(|| Uuid::new_v4().to_string())),
            tenant_id: self.tenant_id,
            hospital_id: self.hospital_id,
            role: self.role,
            email: self.email,
            username: self.username,
        }
    }
}
