use crate::models::{MessageRow, SessionRow, UserRow};
use crate::Database;
use anyhow::Result;
use rusqlite::{Connection, ErrorCode};

impl Database {
    // -- Users --

    /// Inserts a user and returns its id, or `None` if the username or email
    /// is already taken.
    pub fn create_user(&self, username: &str, email: &str, password_hash: &str) -> Result<Option<i64>> {
        self.with_conn(|conn| {
            let inserted = conn.execute(
                "INSERT INTO users (username, email, password_hash) VALUES (?1, ?2, ?3)",
                (username, email, password_hash),
            );

            match inserted {
                Ok(_) => Ok(Some(conn.last_insert_rowid())),
                Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                    Ok(None)
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_username(conn, username))
    }

    // -- Chat history --

    /// Stores one chat turn: a new session row holding the user message
    /// followed by the assistant reply. Returns the session id.
    pub fn record_exchange(&self, user_id: i64, user_text: &str, assistant_text: &str) -> Result<i64> {
        self.with_conn(|conn| {
            let tx = conn.unchecked_transaction()?;

            tx.execute("INSERT INTO chat_sessions (user_id) VALUES (?1)", [user_id])?;
            let session_id = tx.last_insert_rowid();

            tx.execute(
                "INSERT INTO messages (session_id, role, content) VALUES (?1, 'user', ?2)",
                rusqlite::params![session_id, user_text],
            )?;
            tx.execute(
                "INSERT INTO messages (session_id, role, content) VALUES (?1, 'assistant', ?2)",
                rusqlite::params![session_id, assistant_text],
            )?;

            tx.commit()?;
            Ok(session_id)
        })
    }

    /// Newest-first sessions of `username` with their message counts.
    pub fn list_sessions(&self, username: &str, limit: u32) -> Result<Vec<SessionRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT s.id, s.created_at,
                        (SELECT COUNT(*) FROM messages m WHERE m.session_id = s.id)
                 FROM chat_sessions s
                 JOIN users u ON s.user_id = u.id
                 WHERE u.username = ?1
                 ORDER BY s.created_at DESC, s.id DESC
                 LIMIT ?2",
            )?;

            let rows = stmt
                .query_map(rusqlite::params![username, limit], |row| {
                    Ok(SessionRow {
                        id: row.get(0)?,
                        created_at: row.get(1)?,
                        message_count: row.get(2)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// Messages of one session in chronological order. Ownership is enforced
    /// by the join on `username`: a session belonging to someone else yields
    /// an empty list, same as a missing one.
    pub fn get_session_messages(&self, session_id: i64, username: &str) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT m.role, m.content, m.created_at
                 FROM messages m
                 JOIN chat_sessions s ON m.session_id = s.id
                 JOIN users u ON s.user_id = u.id
                 WHERE s.id = ?1 AND u.username = ?2
                 ORDER BY m.created_at, m.id",
            )?;

            let rows = stmt
                .query_map(rusqlite::params![session_id, username], |row| {
                    Ok(MessageRow {
                        role: row.get(0)?,
                        content: row.get(1)?,
                        created_at: row.get(2)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }
}

fn query_user_by_username(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, username, email, password_hash, created_at FROM users WHERE username = ?1",
    )?;

    let row = stmt
        .query_row([username], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                email: row.get(2)?,
                password_hash: row.get(3)?,
                created_at: row.get(4)?,
            })
        })
        .optional()?;

    Ok(row)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
