use axum::{
    Extension, Json,
    extract::{Path, State, rejection::PathRejection},
};
use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;

use sage_types::api::{HistoryResponse, MessageView, SessionMessagesResponse, SessionSummary};

use crate::AppState;
use crate::error::ApiError;
use crate::middleware::AuthUser;

/// Most sessions returned by the history listing.
pub const HISTORY_LIMIT: u32 = 50;

pub async fn list_sessions(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.list_sessions(&user.username, HISTORY_LIMIT)).await??;

    let sessions = rows
        .into_iter()
        .map(|row| SessionSummary {
            id: row.id,
            created_at: parse_timestamp(&row.created_at),
            msg_count: row.message_count,
        })
        .collect();

    Ok(Json(HistoryResponse { sessions }))
}

/// A session owned by someone else is indistinguishable from a missing one.
pub async fn session_messages(
    State(state): State<AppState>,
    session_id: Result<Path<i64>, PathRejection>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<SessionMessagesResponse>, ApiError> {
    let Path(session_id) = session_id?;
    let db = state.clone();
    let rows =
        tokio::task::spawn_blocking(move || db.db.get_session_messages(session_id, &user.username)).await??;

    if rows.is_empty() {
        return Err(ApiError::SessionNotFound);
    }

    let messages = rows
        .into_iter()
        .map(|row| MessageView {
            created_at: parse_timestamp(&row.created_at),
            role: row.role,
            content: row.content,
        })
        .collect();

    Ok(Json(SessionMessagesResponse { messages }))
}

/// SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS" without timezone;
/// those are UTC.
fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc()))
        .unwrap_or_else(|e| {
            warn!("Corrupt created_at '{}': {}", raw, e);
            DateTime::default()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_sqlite_and_rfc3339() {
        let ts = parse_timestamp("2024-03-05 14:07:09");
        assert_eq!((ts.year(), ts.month(), ts.day()), (2024, 3, 5));
        assert_eq!((ts.hour(), ts.minute(), ts.second()), (14, 7, 9));

        let ts = parse_timestamp("2024-03-05T14:07:09Z");
        assert_eq!(ts.hour(), 14);
    }

    #[test]
    fn corrupt_timestamp_falls_back_to_epoch() {
        assert_eq!(parse_timestamp("yesterday").timestamp(), 0);
    }
}
