use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::AppState;
use crate::credentials::CredentialStore;
use crate::error::ApiError;

/// Cookie carrying the session token for browser page loads.
pub const SESSION_COOKIE: &str = "sage_token";

/// The authenticated caller, inserted into request extensions.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub username: String,
}

/// Resolves the caller from `Authorization: Bearer` or, when no bearer
/// header is sent, the session cookie.
pub fn resolve_user(credentials: &CredentialStore, headers: &HeaderMap, jar: &CookieJar) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    // A bearer header wins outright, even when its token is bad.
    if let Some(token) = bearer {
        return credentials.read_token(token);
    }

    jar.get(SESSION_COOKIE)
        .and_then(|cookie| credentials.read_token(cookie.value()))
}

pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let username = resolve_user(&state.credentials, req.headers(), &jar).ok_or(ApiError::Unauthorized)?;

    req.extensions_mut().insert(AuthUser { username });
    Ok(next.run(req).await)
}
