//! Remote text-generation providers speaking the OpenAI chat-completions
//! protocol.

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SYSTEM_PROMPT: &str = "You are Sage, a compassionate AI assistant that helps users cope with \
depression, anxiety, stress, and other mental health challenges. \
You are empathetic, supportive, and non-judgmental. You listen actively \
and offer gentle encouragement. Keep responses concise (2-4 short paragraphs). \
You never diagnose or prescribe. You encourage professional help when appropriate. \
If someone mentions suicide or self-harm, acknowledge their pain and \
encourage them to contact a crisis helpline immediately.";

pub const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const GROQ_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const GROQ_MODEL: &str = "llama-3.1-8b-instant";

const MAX_TOKENS: u32 = 400;
const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),
    #[error("response contained no text")]
    EmptyReply,
}

/// A service that turns one user message into one reply.
pub trait TextProvider: Send + Sync {
    fn name(&self) -> &str;

    fn generate<'a>(&'a self, message: &'a str) -> BoxFuture<'a, Result<String, ProviderError>>;
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: [ChatTurn<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatTurn<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat-completions endpoint authenticated with a bearer key.
pub struct ChatCompletionsProvider {
    name: &'static str,
    endpoint: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
}

impl ChatCompletionsProvider {
    pub fn new(
        name: &'static str,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            name,
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.into(),
            client,
        }
    }

    pub fn openai(api_key: impl Into<String>, client: reqwest::Client) -> Self {
        Self::new("openai", OPENAI_ENDPOINT, OPENAI_MODEL, api_key, client)
    }

    pub fn groq(api_key: impl Into<String>, client: reqwest::Client) -> Self {
        Self::new("groq", GROQ_ENDPOINT, GROQ_MODEL, api_key, client)
    }

    async fn complete(&self, message: &str) -> Result<String, ProviderError> {
        let body = CompletionRequest {
            model: &self.model,
            messages: [
                ChatTurn { role: "system", content: SYSTEM_PROMPT },
                ChatTurn { role: "user", content: message },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(ProviderError::Status(status));
        }

        let parsed: CompletionResponse = response.json().await?;
        extract_text(parsed)
    }
}

impl TextProvider for ChatCompletionsProvider {
    fn name(&self) -> &str {
        self.name
    }

    fn generate<'a>(&'a self, message: &'a str) -> BoxFuture<'a, Result<String, ProviderError>> {
        Box::pin(self.complete(message))
    }
}

fn extract_text(response: CompletionResponse) -> Result<String, ProviderError> {
    let text = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(ProviderError::EmptyReply);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use std::time::Duration;

    use axum::{
        Json, Router,
        http::{HeaderMap, StatusCode, header},
        routing::post,
    };
    use serde_json::{Value, json};

    use crate::{ReplyOrigin, ResponseEngine};

    const TEST_KEY: &str = "test-key";

    /// Local chat-completions stand-in: `/fail` answers 500, `/ok` echoes the
    /// user turn for the right key, `/slow` never answers in time.
    async fn spawn_completions_server() -> SocketAddr {
        let app = Router::new()
            .route("/fail", post(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
            .route("/ok", post(echo_completion))
            .route(
                "/slow",
                post(|| async {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    StatusCode::OK
                }),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        addr
    }

    async fn echo_completion(headers: HeaderMap, Json(body): Json<Value>) -> Result<Json<Value>, StatusCode> {
        let auth = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok());
        if auth != Some("Bearer test-key") {
            return Err(StatusCode::UNAUTHORIZED);
        }
        if body["messages"][0]["role"] != "system" || body["max_tokens"] != 400 {
            return Err(StatusCode::BAD_REQUEST);
        }
        let said = body["messages"][1]["content"].as_str().unwrap_or_default();
        Ok(Json(json!({
            "choices": [{ "message": { "role": "assistant", "content": format!("  You said: {said}\n") } }]
        })))
    }

    fn local_provider(name: &'static str, url: String, key: &str, timeout: Duration) -> ChatCompletionsProvider {
        let client = reqwest::Client::builder().timeout(timeout).build().unwrap();
        ChatCompletionsProvider::new(name, url, "test-model", key, client)
    }

    fn parse(json: &str) -> Result<String, ProviderError> {
        extract_text(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn takes_first_choice_trimmed() {
        let text = parse(r#"{"choices":[{"message":{"role":"assistant","content":"  Hello.\n"}},{"message":{"content":"no"}}]}"#);
        assert_eq!(text.unwrap(), "Hello.");
    }

    #[test]
    fn blank_or_missing_content_is_an_error() {
        assert!(matches!(parse(r#"{"choices":[]}"#), Err(ProviderError::EmptyReply)));
        assert!(matches!(parse(r#"{"choices":[{"message":{"content":"   "}}]}"#), Err(ProviderError::EmptyReply)));
        assert!(matches!(parse(r#"{"choices":[{"message":{"content":null}}]}"#), Err(ProviderError::EmptyReply)));
    }

    #[test]
    fn request_body_shape() {
        let body = CompletionRequest {
            model: GROQ_MODEL,
            messages: [
                ChatTurn { role: "system", content: SYSTEM_PROMPT },
                ChatTurn { role: "user", content: "hi" },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "llama-3.1-8b-instant");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hi");
        assert_eq!(json["max_tokens"], 400);
    }

    #[tokio::test]
    async fn non_ok_status_is_an_error() {
        let addr = spawn_completions_server().await;
        let provider = local_provider("local", format!("http://{addr}/fail"), TEST_KEY, Duration::from_secs(5));

        let err = provider.generate("hi").await.unwrap_err();
        assert!(matches!(err, ProviderError::Status(s) if s == reqwest::StatusCode::INTERNAL_SERVER_ERROR), "{err}");
    }

    #[tokio::test]
    async fn sends_bearer_key_and_returns_trimmed_text() {
        let addr = spawn_completions_server().await;
        let provider = local_provider("local", format!("http://{addr}/ok"), TEST_KEY, Duration::from_secs(5));
        assert_eq!(provider.generate("hello there").await.unwrap(), "You said: hello there");

        let wrong_key = local_provider("local", format!("http://{addr}/ok"), "other-key", Duration::from_secs(5));
        let err = wrong_key.generate("hello there").await.unwrap_err();
        assert!(matches!(err, ProviderError::Status(s) if s == reqwest::StatusCode::UNAUTHORIZED), "{err}");
    }

    #[tokio::test]
    async fn slow_endpoint_times_out() {
        let addr = spawn_completions_server().await;
        let provider = local_provider("local", format!("http://{addr}/slow"), TEST_KEY, Duration::from_millis(200));

        match provider.generate("hi").await {
            Err(ProviderError::Http(e)) => assert!(e.is_timeout(), "{e}"),
            other => panic!("expected a timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn refused_connection_is_a_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let provider = local_provider("local", format!("http://{addr}/ok"), TEST_KEY, Duration::from_secs(5));
        assert!(matches!(provider.generate("hi").await, Err(ProviderError::Http(_))));
    }

    #[tokio::test]
    async fn timed_out_provider_falls_through_to_next() {
        let addr = spawn_completions_server().await;
        let slow = local_provider("slow", format!("http://{addr}/slow"), TEST_KEY, Duration::from_millis(200));
        let ok = local_provider("ok", format!("http://{addr}/ok"), TEST_KEY, Duration::from_secs(5));
        let engine = ResponseEngine::new(vec![Box::new(slow), Box::new(ok)]);

        let reply = engine.respond("hello there").await;
        assert_eq!(reply.text, "You said: hello there");
        assert_eq!(reply.origin, ReplyOrigin::Provider("ok".into()));
    }
}
