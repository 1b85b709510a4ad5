//! Authentication utilities library
//!
//! Provides reusable authentication infrastructure for the accounts service:
//! - Password hashing (Argon2id, PHC string output)
//! - Access and refresh token signing and validation (HS256)
//!
//! The service defines its own domain types and adapts these implementations.
//! Keeping them free of domain types avoids coupling the crate to any one
//! service's data model.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::default();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Session Tokens
//! ```
//! use auth::{IdentityClaim, TokenCodec, TokenKind};
//! use chrono::Duration;
//!
//! let codec = TokenCodec::new(b"secret_key_at_least_32_bytes_long!", Duration::minutes(15));
//! let identity = IdentityClaim {
//!     account_id: "account-123".to_string(),
//!     email: "nicola@example.com".to_string(),
//!     username: None,
//! };
//!
//! let token = codec.issue_access(&identity).unwrap();
//! let claims = codec.verify(&token, TokenKind::Access).unwrap();
//! assert_eq!(claims.sub, "account-123");
//! ```

pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use jwt::Claims;
pub use jwt::IdentityClaim;
pub use jwt::TokenCodec;
pub use jwt::TokenError;
pub use jwt::TokenKind;
pub use password::HashingParams;
pub use password::PasswordError;
pub use password::PasswordHasher;
