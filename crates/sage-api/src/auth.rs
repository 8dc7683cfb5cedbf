use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use tracing::info;

use sage_types::api::{LoginRequest, LogoutResponse, MeResponse, RegisterRequest, TokenResponse};
use sage_types::validate::Validate;

use crate::AppState;
use crate::credentials::{hash_password, verify_password};
use crate::error::ApiError;
use crate::middleware::{AuthUser, SESSION_COOKIE};

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<TokenResponse>), ApiError> {
    let Json(req) = payload?;
    ApiError::check(req.validate())?;

    let username = req.username.to_lowercase();
    let email = req.email.to_lowercase();
    let password = req.password;

    let db = state.clone();
    let name = username.clone();
    // Argon2 runs on the blocking pool alongside the insert
    let created = tokio::task::spawn_blocking(move || -> Result<_, ApiError> {
        let password_hash = hash_password(&password)?;
        Ok(db.db.create_user(&name, &email, &password_hash)?)
    })
    .await??;

    if created.is_none() {
        return Err(ApiError::Duplicate);
    }
    info!("Registered user {}", username);

    let token = state.credentials.issue_token(&username)?;
    Ok((jar.add(session_cookie(token.clone())), Json(TokenResponse::bearer(token))))
}

/// Unknown users and wrong passwords get the same answer.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<TokenResponse>), ApiError> {
    let Json(req) = payload?;

    let db = state.clone();
    let username = req.username.to_lowercase();
    let password = req.password;
    let user = tokio::task::spawn_blocking(move || -> Result<_, ApiError> {
        let user = db.db.get_user_by_username(&username)?.ok_or(ApiError::InvalidCredentials)?;
        if !verify_password(&password, &user.password_hash) {
            return Err(ApiError::InvalidCredentials);
        }
        Ok(user)
    })
    .await??;

    let token = state.credentials.issue_token(&user.username)?;
    Ok((jar.add(session_cookie(token.clone())), Json(TokenResponse::bearer(token))))
}

/// Tokens are stateless; logging out only drops the cookie.
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<LogoutResponse>) {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, Json(LogoutResponse { ok: true }))
}

pub async fn me(Extension(user): Extension<AuthUser>) -> Json<MeResponse> {
    Json(MeResponse {
        username: user.username,
    })
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}
