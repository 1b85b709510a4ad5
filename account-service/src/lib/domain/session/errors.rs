use auth::PasswordError;
use auth::TokenError;
use thiserror::Error;

use crate::account::errors::AuthenticateError;
use crate::account::errors::RegisterError;
use crate::account::errors::RepositoryError;

/// Session registration errors
#[derive(Debug, Clone, Error)]
pub enum RegistrationError {
    #[error("Password confirmation does not match")]
    PasswordMismatch,

    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error("Username already taken: {0}")]
    DuplicateUsername(String),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<RegisterError> for RegistrationError {
    fn from(err: RegisterError) -> Self {
        match err {
            RegisterError::PasswordMismatch => RegistrationError::PasswordMismatch,
            RegisterError::DuplicateEmail(email) => RegistrationError::DuplicateEmail(email),
            RegisterError::DuplicateUsername(username) => {
                RegistrationError::DuplicateUsername(username)
            }
            RegisterError::Hashing(e) => RegistrationError::Password(e),
            RegisterError::Repository(e) => RegistrationError::Repository(e),
        }
    }
}

/// Login errors
#[derive(Debug, Clone, Error)]
pub enum LoginError {
    #[error("Account is deactivated")]
    AccountDeactivated,

    #[error(transparent)]
    Password(PasswordError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<AuthenticateError> for LoginError {
    fn from(err: AuthenticateError) -> Self {
        match err {
            AuthenticateError::AccountDeactivated => LoginError::AccountDeactivated,
            AuthenticateError::Password(e) => LoginError::Password(e),
            AuthenticateError::Repository(e) => LoginError::Repository(e),
        }
    }
}

/// Token refresh errors
#[derive(Debug, Clone, Error)]
pub enum RefreshError {
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Session verification errors
#[derive(Debug, Clone, Error)]
pub enum VerifyError {
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
