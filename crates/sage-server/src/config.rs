use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use sage_engine::{DEFAULT_PROVIDER_TIMEOUT, EngineConfig};

/// Placeholder signing secrets that should never reach production.
pub const PLACEHOLDER_SECRETS: &[&str] = &[
    "sage-secret-key-change-in-production",
    "change-me-to-a-random-string",
    "dev-secret-change-me",
];

const DEFAULT_JWT_SECRET: &str = "sage-secret-key-change-in-production";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub db_path: PathBuf,
    pub assets_dir: PathBuf,
    pub jwt_secret: String,
    pub engine: EngineConfig,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = var("SAGE_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = match var("SAGE_PORT") {
            Some(port) => port.parse().context("SAGE_PORT is not a valid port")?,
            None => 8000,
        };
        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", host, port))?;

        let request_timeout = match var("SAGE_PROVIDER_TIMEOUT_SECS") {
            Some(secs) => Duration::from_secs(secs.parse().context("SAGE_PROVIDER_TIMEOUT_SECS is not a number")?),
            None => DEFAULT_PROVIDER_TIMEOUT,
        };

        Ok(Self {
            addr,
            db_path: var("SAGE_DB_PATH").unwrap_or_else(|| "sage.db".into()).into(),
            assets_dir: var("SAGE_ASSETS_DIR").unwrap_or_else(|| ".".into()).into(),
            jwt_secret: var("SAGE_JWT_SECRET").unwrap_or_else(|| DEFAULT_JWT_SECRET.into()),
            engine: EngineConfig {
                openai_api_key: var("OPENAI_API_KEY"),
                groq_api_key: var("GROQ_API_KEY"),
                request_timeout,
            },
        })
    }

    pub fn uses_placeholder_secret(&self) -> bool {
        PLACEHOLDER_SECRETS.contains(&self.jwt_secret.as_str())
    }
}
