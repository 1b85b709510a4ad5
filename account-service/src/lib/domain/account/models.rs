use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::account::errors::AccountIdError;
use crate::account::errors::DisplayNameError;
use crate::account::errors::EmailError;
use crate::account::errors::PasswordPolicyError;
use crate::account::errors::UsernameError;

/// Account aggregate entity.
///
/// Represents a registered account. Not serializable: the credential hash
/// never leaves the domain layer. Outward-facing code works with
/// [`PublicAccount`] projections instead.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: AccountId,
    pub email: EmailAddress,
    pub username: Option<Username>,
    pub credential_hash: String,
    pub given_name: Option<DisplayName>,
    pub family_name: Option<DisplayName>,
    pub email_verified: bool,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Account unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AccountId(pub Uuid);

impl AccountId {
    /// Generate a new random account ID.
    ///
    /// # Returns
    /// AccountId with random UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an account ID from string.
    ///
    /// # Arguments
    /// * `s` - UUID string to parse
    ///
    /// # Returns
    /// Parsed AccountId
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, AccountIdError> {
        Uuid::parse_str(s)
            .map(AccountId)
            .map_err(|e| AccountIdError::InvalidFormat(e.to_string()))
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates format with an RFC 5322 compliant parser and canonicalizes to
/// lowercase, so lookups and uniqueness checks are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// Trims surrounding whitespace and lowercases before validating.
    ///
    /// # Arguments
    /// * `email` - Raw email string
    ///
    /// # Returns
    /// Validated EmailAddress value object
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        let canonical = email.trim().to_lowercase();

        email_address::EmailAddress::from_str(&canonical)
            .map(|_| Self(canonical))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    /// Get email as string slice.
    ///
    /// # Returns
    /// Email string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// Ensures username is 3-30 characters and contains only ASCII alphanumeric,
/// underscore, and hyphen. Canonicalized to lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Username(String);

impl Username {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 30;

    /// Create a new valid username.
    ///
    /// Trims and lowercases, then validates length and character constraints.
    ///
    /// # Arguments
    /// * `username` - Raw username string
    ///
    /// # Returns
    /// Validated Username value object
    ///
    /// # Errors
    /// * `TooShort` - Username shorter than 3 characters
    /// * `TooLong` - Username longer than 30 characters
    /// * `InvalidCharacters` - Contains characters outside letters, digits, underscore, hyphen
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let username = username.trim().to_lowercase();
        let username = Self::with_valid_length(username)?;
        let username = Self::with_valid_chars(username)?;
        Ok(Self(username))
    }

    fn with_valid_length(username: String) -> Result<String, UsernameError> {
        let length = username.chars().count();
        if length < Self::MIN_LENGTH {
            Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(username)
        }
    }

    fn with_valid_chars(username: String) -> Result<String, UsernameError> {
        if username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            Ok(username)
        } else {
            Err(UsernameError::InvalidCharacters)
        }
    }

    /// Get username as string slice.
    ///
    /// # Returns
    /// Username string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Display name value type (given or family name).
///
/// Trimmed, non-empty, at most 50 characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayName(String);

impl DisplayName {
    const MAX_LENGTH: usize = 50;

    /// Create a new validated display name.
    ///
    /// # Arguments
    /// * `name` - Raw name string
    ///
    /// # Returns
    /// Validated DisplayName value object
    ///
    /// # Errors
    /// * `Empty` - Name is empty after trimming
    /// * `TooLong` - Name longer than 50 characters
    pub fn new(name: String) -> Result<Self, DisplayNameError> {
        let name = name.trim().to_string();
        let length = name.chars().count();

        if name.is_empty() {
            Err(DisplayNameError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(DisplayNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(name))
        }
    }

    /// Get name as string slice.
    ///
    /// # Returns
    /// Name string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password accepted at registration or password change.
///
/// Enforces the password policy: 8-128 characters with at least one
/// lowercase letter, one uppercase letter, and one digit. Held only until
/// hashing; never serialized, and redacted from debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    const MIN_LENGTH: usize = 8;
    const MAX_LENGTH: usize = 128;

    /// Create a new policy-checked password.
    ///
    /// # Arguments
    /// * `password` - Raw plaintext password
    ///
    /// # Returns
    /// Policy-checked Password value object
    ///
    /// # Errors
    /// * `TooShort` - Fewer than 8 characters
    /// * `TooLong` - More than 128 characters
    /// * `TooWeak` - Missing a lowercase letter, uppercase letter, or digit
    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        let length = password.chars().count();
        if length < Self::MIN_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }
        if length > Self::MAX_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }

        let has_lowercase = password.chars().any(|c| c.is_ascii_lowercase());
        let has_uppercase = password.chars().any(|c| c.is_ascii_uppercase());
        let has_digit = password.chars().any(|c| c.is_ascii_digit());
        if !(has_lowercase && has_uppercase && has_digit) {
            return Err(PasswordPolicyError::TooWeak);
        }

        Ok(Self(password))
    }

    /// Get the plaintext as string slice, for hashing and comparison.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Password").field(&"<redacted>").finish()
    }
}

/// Outward-facing projection of an [`Account`].
///
/// Carries every attribute except the credential hash.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicAccount {
    pub id: AccountId,
    pub email: EmailAddress,
    pub username: Option<Username>,
    pub given_name: Option<DisplayName>,
    pub family_name: Option<DisplayName>,
    pub email_verified: bool,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Account> for PublicAccount {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            email: account.email.clone(),
            username: account.username.clone(),
            given_name: account.given_name.clone(),
            family_name: account.family_name.clone(),
            email_verified: account.email_verified,
            active: account.active,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

/// Command to register a new account with domain types.
#[derive(Debug)]
pub struct RegisterCommand {
    pub email: EmailAddress,
    pub password: Password,
    pub confirmation: String,
    pub username: Option<Username>,
    pub given_name: Option<DisplayName>,
    pub family_name: Option<DisplayName>,
}

impl RegisterCommand {
    /// Construct a registration command from the required fields.
    ///
    /// # Arguments
    /// * `email` - Validated email address
    /// * `password` - Policy-checked password (will be hashed by the service)
    /// * `confirmation` - Raw confirmation input, compared by the service
    ///
    /// # Returns
    /// RegisterCommand without optional fields set
    pub fn new(email: EmailAddress, password: Password, confirmation: String) -> Self {
        Self {
            email,
            password,
            confirmation,
            username: None,
            given_name: None,
            family_name: None,
        }
    }

    /// Set the optional username.
    pub fn with_username(mut self, username: Username) -> Self {
        self.username = Some(username);
        self
    }

    /// Set the optional given name.
    pub fn with_given_name(mut self, given_name: DisplayName) -> Self {
        self.given_name = Some(given_name);
        self
    }

    /// Set the optional family name.
    pub fn with_family_name(mut self, family_name: DisplayName) -> Self {
        self.family_name = Some(family_name);
        self
    }
}

/// Command to update profile fields with optional validated values.
///
/// All fields are optional to support partial updates.
/// Only provided fields will be updated.
#[derive(Debug, Default)]
pub struct UpdateProfileCommand {
    pub username: Option<Username>,
    pub given_name: Option<DisplayName>,
    pub family_name: Option<DisplayName>,
}

/// Partial update applied by the repository.
///
/// Enumerates exactly the mutable fields; fields left as `None` are not
/// touched. Repositories bump `updated_at` whenever a patch is applied.
#[derive(Debug, Clone, Default)]
pub struct AccountPatch {
    pub username: Option<Username>,
    pub given_name: Option<DisplayName>,
    pub family_name: Option<DisplayName>,
    pub credential_hash: Option<String>,
    pub active: Option<bool>,
}

/// Predicate selecting accounts for count queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountPredicate {
    /// Every account
    All,
    /// Accounts with active = true
    Active,
    /// Accounts with email_verified = true
    EmailVerified,
}

/// Aggregate account counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccountStatistics {
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
    pub verified: u64,
}
