use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::claims::IdentityClaim;
use super::claims::TokenKind;
use super::claims::AUDIENCE;
use super::claims::ISSUER;
use super::claims::REFRESH_TOKEN_TYPE;
use super::errors::TokenError;

/// Days a refresh token stays valid after issuance.
pub const REFRESH_TTL_DAYS: i64 = 30;

/// Signs and validates the access and refresh tokens of account sessions.
///
/// Uses HS256 (HMAC with SHA-256). Every issued token is stamped with the
/// service issuer and audience claims, and validation requires both to match.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    access_ttl: Duration,
}

impl TokenCodec {
    /// Create a codec from a signing secret and an access-token lifetime.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    /// * `access_ttl` - Lifetime of issued access tokens
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    /// - Rotate secrets periodically
    pub fn new(secret: &[u8], access_ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            access_ttl,
        }
    }

    /// Issue a short-lived access token for an identity.
    ///
    /// # Errors
    /// * `Signing` - Token encoding failed
    pub fn issue_access(&self, identity: &IdentityClaim) -> Result<String, TokenError> {
        let claims = Claims::access(identity, Utc::now(), self.access_ttl);
        self.sign(&claims)
    }

    /// Issue a refresh token for an identity.
    ///
    /// Refresh tokens live for [`REFRESH_TTL_DAYS`] days and carry a `type`
    /// marker, so they can never pass access-token validation.
    ///
    /// # Errors
    /// * `Signing` - Token encoding failed
    pub fn issue_refresh(&self, identity: &IdentityClaim) -> Result<String, TokenError> {
        let claims = Claims::refresh(identity, Utc::now(), Duration::days(REFRESH_TTL_DAYS));
        self.sign(&claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key).map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Decode and validate a token, requiring the expected kind.
    ///
    /// Validation checks signature, expiration, issuer, and audience, then
    /// matches the `type` marker against the expected kind in both
    /// directions: an access token is rejected where a refresh token is
    /// expected, and the other way around.
    ///
    /// # Arguments
    /// * `token` - JWT token string to validate
    /// * `expected` - Kind the caller requires
    ///
    /// # Returns
    /// The validated claims
    ///
    /// # Errors
    /// * `Expired` - Token expiration has passed
    /// * `SignatureInvalid` - Token signature does not match
    /// * `Malformed` - Token or its claims are structurally invalid
    /// * `KindMismatch` - Token is valid but of the other kind
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.set_issuer(&[ISSUER]);
        validation.set_audience(&[AUDIENCE]);

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::SignatureInvalid,
                _ => TokenError::Malformed(e.to_string()),
            })?;

        let claims = token_data.claims;
        let marker = claims.token_type.as_deref();

        match expected {
            TokenKind::Access if marker.is_some() => Err(TokenError::KindMismatch { expected }),
            TokenKind::Refresh if marker != Some(REFRESH_TOKEN_TYPE) => {
                Err(TokenError::KindMismatch { expected })
            }
            _ => Ok(claims),
        }
    }

    /// Decode a token without validation (for inspection only).
    ///
    /// # Errors
    /// * `Malformed` - Token format is invalid
    ///
    /// # Security Warning
    /// This does NOT validate the signature or expiration. Only use for:
    /// - Debugging/logging purposes
    /// - Extracting claims before full validation
    /// - Never trust claims from this method for authorization decisions
    pub fn decode_unverified(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.insecure_disable_signature_validation();
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.validate_aud = false;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| TokenError::Malformed(e.to_string()))?;

        Ok(token_data.claims)
    }

    /// Expiration instant recorded in a token, if it decodes at all.
    pub fn expires_at(&self, token: &str) -> Option<DateTime<Utc>> {
        let claims = self.decode_unverified(token).ok()?;

        DateTime::from_timestamp(claims.exp, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"my_secret_key_at_least_32_bytes_long!";

    fn codec() -> TokenCodec {
        TokenCodec::new(SECRET, Duration::minutes(15))
    }

    fn identity() -> IdentityClaim {
        IdentityClaim {
            account_id: "account-123".to_string(),
            email: "nicola@example.com".to_string(),
            username: Some("nicola".to_string()),
        }
    }

    #[test]
    fn test_issue_and_verify_access_token() {
        let codec = codec();

        let token = codec
            .issue_access(&identity())
            .expect("Failed to issue token");
        let claims = codec
            .verify(&token, TokenKind::Access)
            .expect("Failed to verify token");

        assert_eq!(claims.sub, "account-123");
        assert_eq!(claims.email, "nicola@example.com");
        assert_eq!(claims.username, Some("nicola".to_string()));
        assert_eq!(claims.iss, ISSUER);
        assert_eq!(claims.aud, AUDIENCE);
        assert!(claims.token_type.is_none());
    }

    #[test]
    fn test_issue_and_verify_refresh_token() {
        let codec = codec();

        let token = codec
            .issue_refresh(&identity())
            .expect("Failed to issue token");
        let claims = codec
            .verify(&token, TokenKind::Refresh)
            .expect("Failed to verify token");

        assert_eq!(claims.sub, "account-123");
        assert_eq!(claims.username, None);
        assert_eq!(claims.token_type.as_deref(), Some(REFRESH_TOKEN_TYPE));
    }

    #[test]
    fn test_verify_rejects_wrong_kind_both_ways() {
        let codec = codec();

        let access = codec
            .issue_access(&identity())
            .expect("Failed to issue token");
        let refresh = codec
            .issue_refresh(&identity())
            .expect("Failed to issue token");

        assert!(matches!(
            codec.verify(&access, TokenKind::Refresh),
            Err(TokenError::KindMismatch {
                expected: TokenKind::Refresh
            })
        ));
        assert!(matches!(
            codec.verify(&refresh, TokenKind::Access),
            Err(TokenError::KindMismatch {
                expected: TokenKind::Access
            })
        ));
    }

    #[test]
    fn test_verify_expired_token() {
        // Negative lifetime backdates the expiration past the leeway window
        let codec = TokenCodec::new(SECRET, Duration::minutes(-5));

        let token = codec
            .issue_access(&identity())
            .expect("Failed to issue token");

        assert!(matches!(
            codec.verify(&token, TokenKind::Access),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn test_verify_with_wrong_secret() {
        let codec1 = TokenCodec::new(b"secret1_at_least_32_bytes_long_key!", Duration::minutes(15));
        let codec2 = TokenCodec::new(b"secret2_at_least_32_bytes_long_key!", Duration::minutes(15));

        let token = codec1
            .issue_access(&identity())
            .expect("Failed to issue token");

        assert!(matches!(
            codec2.verify(&token, TokenKind::Access),
            Err(TokenError::SignatureInvalid)
        ));
    }

    #[test]
    fn test_verify_garbage_token() {
        let codec = codec();

        assert!(matches!(
            codec.verify("invalid.token.here", TokenKind::Access),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn test_verify_rejects_foreign_issuer() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "account-123".to_string(),
            email: "nicola@example.com".to_string(),
            username: None,
            iss: "another-service".to_string(),
            aud: AUDIENCE.to_string(),
            iat: now,
            exp: now + 900,
            token_type: None,
        };

        // Signed with the right secret but the wrong issuer claim
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .expect("Failed to encode token");

        assert!(matches!(
            codec().verify(&token, TokenKind::Access),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn test_verify_rejects_foreign_audience() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "account-123".to_string(),
            email: "nicola@example.com".to_string(),
            username: None,
            iss: ISSUER.to_string(),
            aud: "another-audience".to_string(),
            iat: now,
            exp: now + 900,
            token_type: None,
        };

        // Signed with the right secret but the wrong audience claim
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .expect("Failed to encode token");

        assert!(matches!(
            codec().verify(&token, TokenKind::Access),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn test_decode_unverified_reads_expired_tokens() {
        let codec = TokenCodec::new(SECRET, Duration::minutes(-5));

        let token = codec
            .issue_access(&identity())
            .expect("Failed to issue token");
        let claims = codec
            .decode_unverified(&token)
            .expect("Failed to decode token");

        assert_eq!(claims.sub, "account-123");
        assert!(claims.is_expired(Utc::now().timestamp()));
    }

    #[test]
    fn test_expires_at_matches_ttl() {
        let codec = codec();
        let before = Utc::now().timestamp();

        let token = codec
            .issue_access(&identity())
            .expect("Failed to issue token");
        let expires = codec.expires_at(&token).expect("No expiration found");

        assert!((expires.timestamp() - (before + 15 * 60)).abs() <= 1);
    }

    #[test]
    fn test_expires_at_garbage_token() {
        assert!(codec().expires_at("not-a-token").is_none());
    }
}
