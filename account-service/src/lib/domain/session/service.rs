use std::sync::Arc;

use auth::IdentityClaim;
use auth::TokenCodec;
use auth::TokenError;
use auth::TokenKind;

use crate::account::models::AccountId;
use crate::account::models::EmailAddress;
use crate::account::models::PublicAccount;
use crate::account::models::RegisterCommand;
use crate::account::ports::AccountRepository;
use crate::account::service::AccountService;
use crate::session::errors::LoginError;
use crate::session::errors::RefreshError;
use crate::session::errors::RegistrationError;
use crate::session::errors::VerifyError;
use crate::session::models::AuthSession;
use crate::session::models::TokenPair;

/// Issues and renews authenticated sessions.
///
/// Wraps the account service with token handling: every successful
/// registration, login, and refresh produces a fresh access/refresh pair.
pub struct SessionService<R>
where
    R: AccountRepository,
{
    accounts: Arc<AccountService<R>>,
    codec: TokenCodec,
}

impl<R> SessionService<R>
where
    R: AccountRepository,
{
    /// Create a new session service with injected dependencies.
    ///
    /// # Arguments
    /// * `accounts` - Account domain service
    /// * `codec` - Configured token codec
    ///
    /// # Returns
    /// Configured session service instance
    pub fn new(accounts: Arc<AccountService<R>>, codec: TokenCodec) -> Self {
        Self { accounts, codec }
    }

    /// Register a new account and open its first session.
    ///
    /// # Arguments
    /// * `command` - Validated registration command
    ///
    /// # Returns
    /// The created account with its token pair
    ///
    /// # Errors
    /// * `PasswordMismatch` - Confirmation does not match the password
    /// * `DuplicateEmail` - Email is already registered
    /// * `DuplicateUsername` - Username is already taken
    /// * `Password` - Password hashing failed
    /// * `Token` - Token issuance failed
    /// * `Repository` - Storage operation failed
    pub async fn register(
        &self,
        command: RegisterCommand,
    ) -> Result<AuthSession, RegistrationError> {
        let account = self.accounts.register(command).await?;
        let tokens = self.issue_pair(&account)?;

        Ok(AuthSession { account, tokens })
    }

    /// Authenticate credentials and open a session.
    ///
    /// # Arguments
    /// * `email` - Canonical email address
    /// * `password` - Plaintext password
    ///
    /// # Returns
    /// Session on success, None for unknown email or wrong password
    ///
    /// # Errors
    /// * `AccountDeactivated` - Account exists but is deactivated
    /// * `Password` - Credential verification failed to run
    /// * `Token` - Token issuance failed
    /// * `Repository` - Storage operation failed
    pub async fn login(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<Option<AuthSession>, LoginError> {
        let account = match self.accounts.authenticate(email, password).await? {
            Some(account) => account,
            None => return Ok(None),
        };

        let tokens = self.issue_pair(&account)?;

        Ok(Some(AuthSession { account, tokens }))
    }

    /// Exchange a refresh token for a new session.
    ///
    /// Both tokens are rotated, and the account is re-checked against
    /// storage so a deactivated or deleted account cannot renew.
    ///
    /// # Arguments
    /// * `refresh_token` - Refresh token from a previous session
    ///
    /// # Returns
    /// New session, or None when the account is missing or deactivated
    ///
    /// # Errors
    /// * `Token` - Token is expired, forged, malformed, or of the wrong kind
    /// * `Repository` - Storage operation failed
    pub async fn refresh(&self, refresh_token: &str) -> Result<Option<AuthSession>, RefreshError> {
        let claims = self.codec.verify(refresh_token, TokenKind::Refresh)?;
        let account_id = parse_subject(&claims.sub)?;

        let account = match self.accounts.find_by_id(&account_id).await? {
            Some(account) if account.active => account,
            _ => return Ok(None),
        };

        let tokens = self.issue_pair(&account)?;

        Ok(Some(AuthSession { account, tokens }))
    }

    /// Resolve an access token to its account.
    ///
    /// # Arguments
    /// * `access_token` - Access token from a request
    ///
    /// # Returns
    /// The account, or None when it is missing or deactivated
    ///
    /// # Errors
    /// * `Token` - Token is expired, forged, malformed, or of the wrong kind
    /// * `Repository` - Storage operation failed
    pub async fn verify_session(
        &self,
        access_token: &str,
    ) -> Result<Option<PublicAccount>, VerifyError> {
        let claims = self.codec.verify(access_token, TokenKind::Access)?;
        let account_id = parse_subject(&claims.sub)?;

        let account = match self.accounts.find_by_id(&account_id).await? {
            Some(account) if account.active => account,
            _ => return Ok(None),
        };

        Ok(Some(account))
    }

    fn issue_pair(&self, account: &PublicAccount) -> Result<TokenPair, TokenError> {
        let identity = IdentityClaim::from(account);

        let access_token = self.codec.issue_access(&identity)?;
        let refresh_token = self.codec.issue_refresh(&identity)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }
}

fn parse_subject(sub: &str) -> Result<AccountId, TokenError> {
    AccountId::from_string(sub)
        .map_err(|e| TokenError::Malformed(format!("Invalid subject claim: {}", e)))
}
