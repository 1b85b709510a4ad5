use std::sync::Arc;

use auth::PasswordError;
use auth::PasswordHasher;
use chrono::Utc;

use crate::account::errors::AuthenticateError;
use crate::account::errors::ChangePasswordError;
use crate::account::errors::DeactivateError;
use crate::account::errors::RegisterError;
use crate::account::errors::RepositoryError;
use crate::account::errors::UpdateProfileError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::AccountPatch;
use crate::account::models::AccountPredicate;
use crate::account::models::AccountStatistics;
use crate::account::models::EmailAddress;
use crate::account::models::Password;
use crate::account::models::PublicAccount;
use crate::account::models::RegisterCommand;
use crate::account::models::UpdateProfileCommand;
use crate::account::ports::AccountRepository;

/// Domain service for account operations.
///
/// Argon2 hashing and verification run on the blocking thread pool so
/// request tasks are not stalled.
pub struct AccountService<R>
where
    R: AccountRepository,
{
    repository: Arc<R>,
    hasher: PasswordHasher,
}

impl<R> AccountService<R>
where
    R: AccountRepository,
{
    /// Create a new account service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Account persistence implementation
    /// * `hasher` - Configured credential hasher
    ///
    /// # Returns
    /// Configured account service instance
    pub fn new(repository: Arc<R>, hasher: PasswordHasher) -> Self {
        Self { repository, hasher }
    }

    /// Register a new account.
    ///
    /// Checks the password confirmation, pre-checks email and username
    /// availability, hashes the password, and persists the account. Storage
    /// uniqueness conflicts raced past the pre-checks are remapped to the
    /// same duplicate errors.
    ///
    /// # Arguments
    /// * `command` - Validated registration command
    ///
    /// # Returns
    /// Public projection of the created account
    ///
    /// # Errors
    /// * `PasswordMismatch` - Confirmation does not match the password
    /// * `DuplicateEmail` - Email is already registered
    /// * `DuplicateUsername` - Username is already taken
    /// * `Hashing` - Password hashing failed
    /// * `Repository` - Storage operation failed
    pub async fn register(&self, command: RegisterCommand) -> Result<PublicAccount, RegisterError> {
        let RegisterCommand {
            email,
            password,
            confirmation,
            username,
            given_name,
            family_name,
        } = command;

        if confirmation != password.as_str() {
            return Err(RegisterError::PasswordMismatch);
        }

        if self.repository.find_by_email(&email).await?.is_some() {
            return Err(RegisterError::DuplicateEmail(email.to_string()));
        }

        if let Some(username) = &username {
            if self.repository.find_by_username(username).await?.is_some() {
                return Err(RegisterError::DuplicateUsername(username.to_string()));
            }
        }

        let hasher = self.hasher.clone();
        let credential_hash = tokio::task::spawn_blocking(move || hasher.hash(password.as_str()))
            .await
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))??;

        let now = Utc::now();
        let account = Account {
            id: AccountId::new(),
            email,
            username,
            credential_hash,
            given_name,
            family_name,
            email_verified: false,
            active: true,
            created_at: now,
            updated_at: now,
        };

        match self.repository.create(account).await {
            Ok(created) => Ok(PublicAccount::from(&created)),
            Err(RepositoryError::DuplicateEmail(email)) => {
                Err(RegisterError::DuplicateEmail(email))
            }
            Err(RepositoryError::DuplicateUsername(username)) => {
                Err(RegisterError::DuplicateUsername(username))
            }
            Err(e) => Err(RegisterError::Repository(e)),
        }
    }

    /// Authenticate an account by email and password.
    ///
    /// A deactivated account is rejected before the password is checked,
    /// so its credentials are never evaluated.
    ///
    /// # Arguments
    /// * `email` - Canonical email address
    /// * `password` - Plaintext password to verify
    ///
    /// # Returns
    /// Public account on success, None for unknown email or wrong password
    ///
    /// # Errors
    /// * `AccountDeactivated` - Account exists but is deactivated
    /// * `Password` - Credential verification failed to run
    /// * `Repository` - Storage operation failed
    pub async fn authenticate(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<Option<PublicAccount>, AuthenticateError> {
        let account = match self.repository.find_by_email(email).await? {
            Some(account) => account,
            None => return Ok(None),
        };

        if !account.active {
            return Err(AuthenticateError::AccountDeactivated);
        }

        let hasher = self.hasher.clone();
        let password = password.to_string();
        let credential_hash = account.credential_hash.clone();
        let matches =
            tokio::task::spawn_blocking(move || hasher.verify(&password, &credential_hash))
                .await
                .map_err(|e| PasswordError::VerificationFailed(e.to_string()))??;

        if matches {
            Ok(Some(PublicAccount::from(&account)))
        } else {
            Ok(None)
        }
    }

    /// Retrieve an account by identifier.
    ///
    /// # Arguments
    /// * `id` - Account ID
    ///
    /// # Returns
    /// Optional public account (None if not found)
    ///
    /// # Errors
    /// * `Unavailable` - Storage operation failed
    pub async fn find_by_id(
        &self,
        id: &AccountId,
    ) -> Result<Option<PublicAccount>, RepositoryError> {
        let account = self.repository.find_by_id(id).await?;
        Ok(account.as_ref().map(PublicAccount::from))
    }

    /// Update profile fields of an existing account.
    ///
    /// # Arguments
    /// * `id` - Account ID to update
    /// * `command` - Optional username, given name, and family name
    ///
    /// # Returns
    /// Public projection of the updated account
    ///
    /// # Errors
    /// * `AccountNotFound` - Account does not exist
    /// * `UsernameTaken` - New username belongs to another account
    /// * `Repository` - Storage operation failed
    pub async fn update_profile(
        &self,
        id: &AccountId,
        command: UpdateProfileCommand,
    ) -> Result<PublicAccount, UpdateProfileError> {
        if let Some(username) = &command.username {
            if let Some(existing) = self.repository.find_by_username(username).await? {
                if existing.id != *id {
                    return Err(UpdateProfileError::UsernameTaken(username.to_string()));
                }
            }
        }

        let patch = AccountPatch {
            username: command.username,
            given_name: command.given_name,
            family_name: command.family_name,
            ..AccountPatch::default()
        };

        match self.repository.update(id, patch).await {
            Ok(Some(updated)) => Ok(PublicAccount::from(&updated)),
            Ok(None) => Err(UpdateProfileError::AccountNotFound(id.to_string())),
            Err(RepositoryError::DuplicateUsername(username)) => {
                Err(UpdateProfileError::UsernameTaken(username))
            }
            Err(e) => Err(UpdateProfileError::Repository(e)),
        }
    }

    /// Change an account password after verifying the current one.
    ///
    /// # Arguments
    /// * `id` - Account ID
    /// * `current` - Current plaintext password
    /// * `new_password` - Policy-checked replacement password
    ///
    /// # Returns
    /// True on success, false when the current password does not match
    ///
    /// # Errors
    /// * `AccountNotFound` - Account does not exist
    /// * `Password` - Hashing or verification failed to run
    /// * `Repository` - Storage operation failed
    pub async fn change_password(
        &self,
        id: &AccountId,
        current: &str,
        new_password: Password,
    ) -> Result<bool, ChangePasswordError> {
        let account = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(ChangePasswordError::AccountNotFound(id.to_string()))?;

        let hasher = self.hasher.clone();
        let current = current.to_string();
        let credential_hash = account.credential_hash.clone();
        let matches =
            tokio::task::spawn_blocking(move || hasher.verify(&current, &credential_hash))
                .await
                .map_err(|e| PasswordError::VerificationFailed(e.to_string()))??;

        if !matches {
            return Ok(false);
        }

        let hasher = self.hasher.clone();
        let new_hash = tokio::task::spawn_blocking(move || hasher.hash(new_password.as_str()))
            .await
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))??;

        let patch = AccountPatch {
            credential_hash: Some(new_hash),
            ..AccountPatch::default()
        };

        match self.repository.update(id, patch).await? {
            Some(_) => Ok(true),
            None => Err(ChangePasswordError::AccountNotFound(id.to_string())),
        }
    }

    /// Deactivate an account.
    ///
    /// Deactivation is a soft delete: the record survives but logins and
    /// token refreshes are refused until reactivated.
    ///
    /// # Arguments
    /// * `id` - Account ID to deactivate
    ///
    /// # Returns
    /// Public projection of the deactivated account
    ///
    /// # Errors
    /// * `AccountNotFound` - Account does not exist
    /// * `Repository` - Storage operation failed
    pub async fn deactivate(&self, id: &AccountId) -> Result<PublicAccount, DeactivateError> {
        let patch = AccountPatch {
            active: Some(false),
            ..AccountPatch::default()
        };

        match self.repository.update(id, patch).await? {
            Some(updated) => Ok(PublicAccount::from(&updated)),
            None => Err(DeactivateError::AccountNotFound(id.to_string())),
        }
    }

    /// Aggregate account counts.
    ///
    /// # Returns
    /// Total, active, inactive, and verified counts
    ///
    /// # Errors
    /// * `Unavailable` - Storage operation failed
    pub async fn statistics(&self) -> Result<AccountStatistics, RepositoryError> {
        let total = self.repository.count_by(AccountPredicate::All).await?;
        let active = self.repository.count_by(AccountPredicate::Active).await?;
        let verified = self
            .repository
            .count_by(AccountPredicate::EmailVerified)
            .await?;

        Ok(AccountStatistics {
            total,
            active,
            inactive: total.saturating_sub(active),
            verified,
        })
    }
}
