/// Database row types. These map directly to SQLite rows and are kept
/// separate from the sage-types wire models.

pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: String,
}

pub struct SessionRow {
    pub id: i64,
    pub created_at: String,
    pub message_count: i64,
}

pub struct MessageRow {
    pub role: String,
    pub content: String,
    pub created_at: String,
}
