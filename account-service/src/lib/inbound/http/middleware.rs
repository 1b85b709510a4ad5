use std::sync::Arc;

use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;

use crate::account::models::PublicAccount;
use crate::account::ports::AccountRepository;
use crate::session::errors::VerifyError;
use crate::session::service::SessionService;

/// Shared state for the session middleware.
pub struct AuthState<R>
where
    R: AccountRepository,
{
    pub sessions: Arc<SessionService<R>>,
}

impl<R> AuthState<R>
where
    R: AccountRepository,
{
    pub fn new(sessions: Arc<SessionService<R>>) -> Self {
        Self { sessions }
    }
}

impl<R> Clone for AuthState<R>
where
    R: AccountRepository,
{
    fn clone(&self) -> Self {
        Self {
            sessions: Arc::clone(&self.sessions),
        }
    }
}

/// Extension type to store the authenticated account in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount {
    pub account: PublicAccount,
}

/// Middleware that rejects requests without a valid session.
///
/// Requires a `Bearer` access token that verifies and resolves to an
/// active account; the account is then available to handlers through the
/// [`AuthenticatedAccount`] request extension.
pub async fn require_session<R>(
    State(state): State<AuthState<R>>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response>
where
    R: AccountRepository,
{
    let token = extract_bearer_token(&req).ok_or_else(missing_token_response)?;
    let account = check_session(&state, token).await?;

    req.extensions_mut().insert(AuthenticatedAccount { account });

    Ok(next.run(req).await)
}

/// Middleware that attaches the account when a valid session is present.
///
/// Requests without a usable token pass through anonymously; handlers
/// read the identity as `Option<Extension<AuthenticatedAccount>>`.
pub async fn optional_session<R>(
    State(state): State<AuthState<R>>,
    mut req: Request,
    next: Next,
) -> Response
where
    R: AccountRepository,
{
    if let Some(token) = extract_bearer_token(&req) {
        if let Ok(account) = check_session(&state, token).await {
            req.extensions_mut().insert(AuthenticatedAccount { account });
        }
    }

    next.run(req).await
}

async fn check_session<R>(state: &AuthState<R>, token: &str) -> Result<PublicAccount, Response>
where
    R: AccountRepository,
{
    match state.sessions.verify_session(token).await {
        Ok(Some(account)) => Ok(account),
        Ok(None) => {
            tracing::warn!("Session rejected: account missing or deactivated");
            Err(invalid_token_response())
        }
        Err(VerifyError::Token(e)) => {
            tracing::warn!("Session rejected: {}", e);
            Err(invalid_token_response())
        }
        Err(VerifyError::Repository(e)) => {
            tracing::error!("Session lookup failed: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            )
                .into_response())
        }
    }
}

fn extract_bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn missing_token_response() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "Missing or malformed Authorization header"
        })),
    )
        .into_response()
}

fn invalid_token_response() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "Invalid or expired token"
        })),
    )
        .into_response()
}
