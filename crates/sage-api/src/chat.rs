use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::{info, warn};

use sage_types::api::{ChatRequest, ChatResponse};
use sage_types::validate::Validate;

use crate::AppState;
use crate::error::ApiError;
use crate::middleware::AuthUser;

/// Answers one message and stores the exchange. Provider failures never
/// surface here; the engine always produces some text.
pub async fn chat(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(req) = payload?;
    ApiError::check(req.validate())?;

    let reply = state.engine.respond(&req.message).await;
    info!("Chat reply for {} ({:?})", user.username, reply.origin);

    // TODO: accept an optional session id on ChatRequest so follow-up turns
    // append to one session instead of each turn opening a new one.
    let db = state.clone();
    let username = user.username;
    let assistant_text = reply.text.clone();
    tokio::task::spawn_blocking(move || -> anyhow::Result<()> {
        match db.db.get_user_by_username(&username)? {
            Some(row) => {
                db.db.record_exchange(row.id, &req.message, &assistant_text)?;
            }
            None => warn!("User {} no longer exists, exchange not saved", username),
        }
        Ok(())
    })
    .await??;

    Ok(Json(ChatResponse {
        response: reply.text,
        suggestions: reply.suggestions,
    }))
}
