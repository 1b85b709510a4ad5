use std::fmt;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Issuer claim stamped into and required from every token.
pub const ISSUER: &str = "users-service";

/// Audience claim stamped into and required from every token.
pub const AUDIENCE: &str = "users-service-client";

/// Marker carried in the `type` claim of refresh tokens.
pub const REFRESH_TOKEN_TYPE: &str = "refresh";

/// The two token kinds issued for a session.
///
/// Access tokens carry the full identity and authorize requests. Refresh
/// tokens are long-lived and only good for obtaining a new token pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Access => write!(f, "access"),
            TokenKind::Refresh => write!(f, "refresh"),
        }
    }
}

/// Identity projected into tokens at signing time.
///
/// The codec's only input for token creation. Callers map their own account
/// representation into one of these.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityClaim {
    pub account_id: String,
    pub email: String,
    pub username: Option<String>,
}

/// Wire-format claims carried by issued tokens.
///
/// Access tokens have no `type` marker. Refresh tokens carry
/// `type: "refresh"` and omit the username.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject (account identifier)
    pub sub: String,

    /// Account email address
    pub email: String,

    /// Username, absent from refresh tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Token kind marker, present only on refresh tokens
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

impl Claims {
    /// Build access-token claims for an identity.
    ///
    /// # Arguments
    /// * `identity` - Identity to project into the token
    /// * `issued_at` - Issuance instant recorded as `iat`
    /// * `ttl` - Lifetime added to `issued_at` to produce `exp`
    pub fn access(identity: &IdentityClaim, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            sub: identity.account_id.clone(),
            email: identity.email.clone(),
            username: identity.username.clone(),
            iss: ISSUER.to_string(),
            aud: AUDIENCE.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
            token_type: None,
        }
    }

    /// Build refresh-token claims for an identity.
    ///
    /// The username is never embedded in refresh tokens.
    pub fn refresh(identity: &IdentityClaim, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            sub: identity.account_id.clone(),
            email: identity.email.clone(),
            username: None,
            iss: ISSUER.to_string(),
            aud: AUDIENCE.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
            token_type: Some(REFRESH_TOKEN_TYPE.to_string()),
        }
    }

    /// Check if the token is expired at the given Unix timestamp.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}
