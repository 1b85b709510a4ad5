use serde::Serialize;

use crate::account::models::PublicAccount;

/// Access and refresh tokens issued together.
///
/// The access token is short-lived and authorizes requests; the refresh
/// token is long-lived and can only be exchanged for a new pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// An authenticated session: the account plus its token pair.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub account: PublicAccount,
    pub tokens: TokenPair,
}

impl From<&PublicAccount> for auth::IdentityClaim {
    fn from(account: &PublicAccount) -> Self {
        Self {
            account_id: account.id.to_string(),
            email: account.email.to_string(),
            username: account.username.as_ref().map(|u| u.to_string()),
        }
    }
}
