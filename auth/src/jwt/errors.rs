use thiserror::Error;

use super::claims::TokenKind;

/// Error type for token operations.
#[derive(Debug, Clone, Error)]
pub enum TokenError {
    #[error("Token is expired")]
    Expired,

    #[error("Token signature is invalid")]
    SignatureInvalid,

    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Wrong token kind: expected {expected} token")]
    KindMismatch { expected: TokenKind },

    #[error("Failed to sign token: {0}")]
    Signing(String),
}
