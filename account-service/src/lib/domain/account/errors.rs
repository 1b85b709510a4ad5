use auth::PasswordError;
use thiserror::Error;

/// Account ID parsing errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountIdError {
    #[error("Invalid account ID format: {0}")]
    InvalidFormat(String),
}

/// Email validation errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Username validation errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error("Username may only contain letters, digits, underscores, and hyphens")]
    InvalidCharacters,
}

/// Password policy errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Password too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error("Password must contain a lowercase letter, an uppercase letter, and a digit")]
    TooWeak,
}

/// Display name validation errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DisplayNameError {
    #[error("Name cannot be empty")]
    Empty,

    #[error("Name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Errors reported by account repository implementations.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error("Username already taken: {0}")]
    DuplicateUsername(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl From<anyhow::Error> for RepositoryError {
    fn from(err: anyhow::Error) -> Self {
        RepositoryError::Unavailable(err.to_string())
    }
}

/// Account registration errors
#[derive(Debug, Clone, Error)]
pub enum RegisterError {
    #[error("Password confirmation does not match")]
    PasswordMismatch,

    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error("Username already taken: {0}")]
    DuplicateUsername(String),

    #[error(transparent)]
    Hashing(#[from] PasswordError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Credential authentication errors
#[derive(Debug, Clone, Error)]
pub enum AuthenticateError {
    #[error("Account is deactivated")]
    AccountDeactivated,

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Profile update errors
#[derive(Debug, Clone, Error)]
pub enum UpdateProfileError {
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Password change errors
#[derive(Debug, Clone, Error)]
pub enum ChangePasswordError {
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Account deactivation errors
#[derive(Debug, Clone, Error)]
pub enum DeactivateError {
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
