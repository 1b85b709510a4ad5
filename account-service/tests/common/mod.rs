use std::collections::HashMap;
use std::sync::Arc;
use std::sync::RwLock;

use account_service::account::errors::RepositoryError;
use account_service::account::models::Account;
use account_service::account::models::AccountId;
use account_service::account::models::AccountPatch;
use account_service::account::models::AccountPredicate;
use account_service::account::models::EmailAddress;
use account_service::account::models::Password;
use account_service::account::models::RegisterCommand;
use account_service::account::models::Username;
use account_service::account::ports::AccountRepository;
use account_service::account::service::AccountService;
use account_service::config::Config;
use account_service::config::JwtConfig;
use account_service::inbound::http::middleware::optional_session;
use account_service::inbound::http::middleware::require_session;
use account_service::inbound::http::middleware::AuthState;
use account_service::inbound::http::middleware::AuthenticatedAccount;
use account_service::session::models::AuthSession;
use account_service::session::service::SessionService;
use async_trait::async_trait;
use auth::HashingParams;
use auth::PasswordHasher;
use auth::TokenCodec;
use axum::middleware;
use axum::routing::get;
use axum::Extension;
use axum::Json;
use axum::Router;
use chrono::Utc;
use serde_json::json;

/// In-memory account store standing in for a real database.
#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: RwLock<HashMap<AccountId, Account>>,
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn create(&self, account: Account) -> Result<Account, RepositoryError> {
        let mut accounts = self.accounts.write().unwrap();

        if accounts.values().any(|a| a.email == account.email) {
            return Err(RepositoryError::DuplicateEmail(account.email.to_string()));
        }
        if let Some(username) = &account.username {
            if accounts
                .values()
                .any(|a| a.username.as_ref() == Some(username))
            {
                return Err(RepositoryError::DuplicateUsername(username.to_string()));
            }
        }

        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, RepositoryError> {
        Ok(self.accounts.read().unwrap().get(id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Account>, RepositoryError> {
        Ok(self
            .accounts
            .read()
            .unwrap()
            .values()
            .find(|a| a.email == *email)
            .cloned())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Account>, RepositoryError> {
        Ok(self
            .accounts
            .read()
            .unwrap()
            .values()
            .find(|a| a.username.as_ref() == Some(username))
            .cloned())
    }

    async fn update(
        &self,
        id: &AccountId,
        patch: AccountPatch,
    ) -> Result<Option<Account>, RepositoryError> {
        let mut accounts = self.accounts.write().unwrap();

        if let Some(username) = &patch.username {
            if accounts
                .values()
                .any(|a| a.id != *id && a.username.as_ref() == Some(username))
            {
                return Err(RepositoryError::DuplicateUsername(username.to_string()));
            }
        }

        match accounts.get_mut(id) {
            Some(account) => {
                if let Some(username) = patch.username {
                    account.username = Some(username);
                }
                if let Some(given_name) = patch.given_name {
                    account.given_name = Some(given_name);
                }
                if let Some(family_name) = patch.family_name {
                    account.family_name = Some(family_name);
                }
                if let Some(credential_hash) = patch.credential_hash {
                    account.credential_hash = credential_hash;
                }
                if let Some(active) = patch.active {
                    account.active = active;
                }
                account.updated_at = Utc::now();

                Ok(Some(account.clone()))
            }
            None => Ok(None),
        }
    }

    async fn count_by(&self, predicate: AccountPredicate) -> Result<u64, RepositoryError> {
        let accounts = self.accounts.read().unwrap();

        let count = match predicate {
            AccountPredicate::All => accounts.len(),
            AccountPredicate::Active => accounts.values().filter(|a| a.active).count(),
            AccountPredicate::EmailVerified => {
                accounts.values().filter(|a| a.email_verified).count()
            }
        };

        Ok(count as u64)
    }
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub accounts: Arc<AccountService<InMemoryAccountRepository>>,
    pub sessions: Arc<SessionService<InMemoryAccountRepository>>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        // Light hashing parameters keep tests fast
        let config = Config {
            jwt: JwtConfig {
                secret: "test-secret-key-for-jwt-signing-at-least-32-bytes".to_string(),
                access_ttl_minutes: 15,
            },
            hashing: HashingParams {
                memory_kib: 8192,
                iterations: 1,
                parallelism: 1,
            },
        };

        let repository = Arc::new(InMemoryAccountRepository::default());
        let hasher = PasswordHasher::new(config.hashing).expect("Failed to create hasher");
        let accounts = Arc::new(AccountService::new(repository, hasher));

        let codec = TokenCodec::new(config.jwt.secret.as_bytes(), config.jwt.access_ttl());
        let sessions = Arc::new(SessionService::new(Arc::clone(&accounts), codec));

        let state = AuthState::new(Arc::clone(&sessions));

        let protected = Router::new()
            .route("/api/session", get(current_session))
            .route_layer(middleware::from_fn_with_state(
                state.clone(),
                require_session::<InMemoryAccountRepository>,
            ));

        let open = Router::new().route("/api/feed", get(feed)).route_layer(
            middleware::from_fn_with_state(state, optional_session::<InMemoryAccountRepository>),
        );

        let router = protected.merge(open);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            accounts,
            sessions,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Register an account and open its first session
    pub async fn register(&self, email: &str, username: &str, password: &str) -> AuthSession {
        let command = RegisterCommand::new(
            EmailAddress::new(email.to_string()).expect("Invalid test email"),
            Password::new(password.to_string()).expect("Invalid test password"),
            password.to_string(),
        )
        .with_username(Username::new(username.to_string()).expect("Invalid test username"));

        self.sessions
            .register(command)
            .await
            .expect("Failed to register test account")
    }
}

async fn current_session(
    Extension(auth): Extension<AuthenticatedAccount>,
) -> Json<serde_json::Value> {
    Json(json!({ "data": auth.account }))
}

async fn feed(auth: Option<Extension<AuthenticatedAccount>>) -> Json<serde_json::Value> {
    let viewer = match auth {
        Some(Extension(auth)) => json!(auth.account.id),
        None => json!("anonymous"),
    };

    Json(json!({ "viewer": viewer }))
}
