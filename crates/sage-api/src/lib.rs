pub mod auth;
pub mod chat;
pub mod credentials;
pub mod error;
pub mod history;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use sage_db::Database;
use sage_engine::ResponseEngine;

use crate::credentials::CredentialStore;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub credentials: CredentialStore,
    pub engine: ResponseEngine,
}
