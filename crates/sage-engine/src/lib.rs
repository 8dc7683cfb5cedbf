//! Sage response engine
//!
//! Turns one user message into one reply. Crisis language short-circuits to
//! a fixed safety message; otherwise configured providers are tried in order
//! and, if none answers, a templated reply is synthesized locally.

pub mod crisis;
pub mod fallback;
pub mod provider;
pub mod topics;

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::provider::{ChatCompletionsProvider, TextProvider};
use crate::topics::Topic;

/// Suggestions attached to every provider-generated reply.
pub const PROVIDER_SUGGESTIONS: [&str; 3] = [
    "Tell me more",
    "What coping strategies help?",
    "I need professional help",
];

pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOrigin {
    Crisis,
    Provider(String),
    Fallback(Topic),
}

#[derive(Debug, Clone)]
pub struct Reply {
    pub text: String,
    pub suggestions: Vec<String>,
    pub origin: ReplyOrigin,
}

impl Reply {
    pub fn new(text: String, suggestions: &[&str], origin: ReplyOrigin) -> Self {
        Self {
            text,
            suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
            origin,
        }
    }
}

/// Provider credentials, read once at startup.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub openai_api_key: Option<String>,
    pub groq_api_key: Option<String>,
    pub request_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            groq_api_key: None,
            request_timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }
}

pub struct ResponseEngine {
    providers: Vec<Box<dyn TextProvider>>,
}

impl ResponseEngine {
    /// Providers are tried in the given order.
    pub fn new(providers: Vec<Box<dyn TextProvider>>) -> Self {
        Self { providers }
    }

    pub fn fallback_only() -> Self {
        Self::new(Vec::new())
    }

    /// OpenAI first, then Groq, each only when its key is non-empty.
    pub fn from_config(config: &EngineConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        let mut providers: Vec<Box<dyn TextProvider>> = Vec::new();
        if let Some(key) = non_empty(&config.openai_api_key) {
            providers.push(Box::new(ChatCompletionsProvider::openai(key, client.clone())));
        }
        if let Some(key) = non_empty(&config.groq_api_key) {
            providers.push(Box::new(ChatCompletionsProvider::groq(key, client)));
        }

        let engine = Self::new(providers);
        if engine.providers.is_empty() {
            info!("No provider keys configured, using built-in responses only");
        } else {
            info!("Response providers: {}", engine.provider_names().join(", "));
        }
        Ok(engine)
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub async fn respond(&self, message: &str) -> Reply {
        let mut rng = StdRng::from_os_rng();
        self.respond_with(message, &mut rng).await
    }

    /// Same as [`respond`](Self::respond) with a caller-supplied random
    /// source for the fallback path.
    pub async fn respond_with<R: Rng + Send>(&self, message: &str, rng: &mut R) -> Reply {
        if let Some(reply) = crisis::check(message) {
            info!("Crisis language detected, returning helpline message");
            return reply;
        }

        if let Some(reply) = self.ask_providers(message).await {
            return reply;
        }

        let reply = fallback::synthesize(message, rng);
        debug!("Fallback reply ({:?})", reply.origin);
        reply
    }

    async fn ask_providers(&self, message: &str) -> Option<Reply> {
        for provider in &self.providers {
            match provider.generate(message).await {
                Ok(text) => {
                    debug!("Reply from provider {}", provider.name());
                    return Some(Reply::new(
                        text,
                        &PROVIDER_SUGGESTIONS,
                        ReplyOrigin::Provider(provider.name().to_string()),
                    ));
                }
                Err(e) => warn!("Provider {} failed: {}", provider.name(), e),
            }
        }
        None
    }
}

fn non_empty(key: &Option<String>) -> Option<&str> {
    key.as_deref().map(str::trim).filter(|k| !k.is_empty())
}
