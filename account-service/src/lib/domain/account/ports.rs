use async_trait::async_trait;

use crate::account::errors::RepositoryError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::AccountPatch;
use crate::account::models::AccountPredicate;
use crate::account::models::EmailAddress;
use crate::account::models::Username;

/// Persistence operations for the account aggregate.
///
/// Implementations must enforce email and username uniqueness; the service
/// layer pre-checks are advisory and racy by nature, so storage is the
/// authority and reports conflicts as `DuplicateEmail` / `DuplicateUsername`.
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Persist new account to storage.
    ///
    /// # Arguments
    /// * `account` - Account entity to create
    ///
    /// # Returns
    /// Created account entity
    ///
    /// # Errors
    /// * `DuplicateEmail` - Email is already registered
    /// * `DuplicateUsername` - Username is already taken
    /// * `Unavailable` - Storage operation failed
    async fn create(&self, account: Account) -> Result<Account, RepositoryError>;

    /// Retrieve account by identifier.
    ///
    /// # Arguments
    /// * `id` - Account ID
    ///
    /// # Returns
    /// Optional account entity (None if not found)
    ///
    /// # Errors
    /// * `Unavailable` - Storage operation failed
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, RepositoryError>;

    /// Retrieve account by canonical email address.
    ///
    /// # Arguments
    /// * `email` - Email address to search for
    ///
    /// # Returns
    /// Optional account entity (None if not found)
    ///
    /// # Errors
    /// * `Unavailable` - Storage operation failed
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Account>, RepositoryError>;

    /// Retrieve account by canonical username.
    ///
    /// # Arguments
    /// * `username` - Username to search for
    ///
    /// # Returns
    /// Optional account entity (None if not found)
    ///
    /// # Errors
    /// * `Unavailable` - Storage operation failed
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Account>, RepositoryError>;

    /// Apply a partial update to an existing account.
    ///
    /// Fields left as `None` in the patch keep their stored value. The
    /// stored `updated_at` is bumped whenever a patch is applied.
    ///
    /// # Arguments
    /// * `id` - Account ID to update
    /// * `patch` - Fields to change
    ///
    /// # Returns
    /// Updated account entity (None if the account does not exist)
    ///
    /// # Errors
    /// * `DuplicateUsername` - Patched username is already taken
    /// * `Unavailable` - Storage operation failed
    async fn update(
        &self,
        id: &AccountId,
        patch: AccountPatch,
    ) -> Result<Option<Account>, RepositoryError>;

    /// Count accounts matching a predicate.
    ///
    /// # Arguments
    /// * `predicate` - Which accounts to count
    ///
    /// # Returns
    /// Number of matching accounts
    ///
    /// # Errors
    /// * `Unavailable` - Storage operation failed
    async fn count_by(&self, predicate: AccountPredicate) -> Result<u64, RepositoryError>;
}
