use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use safar_core::PlanError;
use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "mistralai/mistral-7b-instruct";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

/// A text-in, text-out language model. Implementations report every failure
/// as [`PlanError::UpstreamCallFailure`]; interpreting the reply is the
/// caller's job.
#[allow(async_fn_in_trait)]
pub trait CompletionModel: Send + Sync {
    fn name(&self) -> &str;
    async fn complete(&self, prompt: &str) -> Result<String, PlanError>;
}

#[derive(Debug, Clone)]
pub struct ChatCompletionsConfig {
    pub api_key: String,
    pub base_url: Url,
    pub model: String,
    pub timeout: Duration,
}

impl ChatCompletionsConfig {
    /// Reads `SAFAR_LLM_*`. Returns `None` when no API key is set.
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("SAFAR_LLM_API_KEY")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())?;

        let raw_base = env::var("SAFAR_LLM_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let base_url = match parse_base_url(&raw_base) {
            Ok(url) => url,
            Err(err) => {
                warn!(base_url = %raw_base, error = %err, "ignoring invalid SAFAR_LLM_BASE_URL");
                parse_base_url(DEFAULT_BASE_URL).ok()?
            }
        };
        let model = env::var("SAFAR_LLM_MODEL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let timeout = Duration::from_secs(
            env::var("SAFAR_LLM_TIMEOUT_SECONDS")
                .ok()
                .and_then(|value| value.trim().parse::<u64>().ok())
                .map(|value| value.clamp(5, 300))
                .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
        );

        Some(Self {
            api_key,
            base_url,
            model,
            timeout,
        })
    }
}

/// Parses a base URL and guarantees a trailing slash so that joining
/// `chat/completions` appends instead of replacing the last segment.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    };
    Url::parse(&with_slash).with_context(|| format!("invalid base url {}", raw))
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI-compatible `chat/completions` client.
#[derive(Debug, Clone)]
pub struct ChatCompletionsClient {
    http_client: Client,
    endpoint: Url,
    api_key: String,
    model: String,
}

impl ChatCompletionsClient {
    pub fn new(config: ChatCompletionsConfig) -> Result<Self> {
        let endpoint = config
            .base_url
            .join("chat/completions")
            .context("failed to build chat completions endpoint")?;
        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(6))
            .timeout(config.timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http_client,
            endpoint,
            api_key: config.api_key,
            model: config.model,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl CompletionModel for ChatCompletionsClient {
    fn name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String, PlanError> {
        let payload = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .http_client
            .post(self.endpoint.clone())
            .bearer_auth(self.api_key.as_str())
            .json(&payload)
            .send()
            .await
            .map_err(|err| PlanError::upstream(format!("request failed: {}", err)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlanError::upstream(format!(
                "non-success status {}: {}",
                status.as_u16(),
                truncate(&body, 300)
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|err| PlanError::upstream(format!("unreadable response body: {}", err)))?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| PlanError::upstream("response carried no message content"))
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

/// The model the service actually runs with.
#[derive(Debug, Clone)]
pub enum Completion {
    Remote(ChatCompletionsClient),
    /// No model configured; every call fails so plans are synthesized.
    Offline,
}

impl Completion {
    pub fn from_env() -> Result<Self> {
        match ChatCompletionsConfig::from_env() {
            Some(config) => Ok(Self::Remote(ChatCompletionsClient::new(config)?)),
            None => Ok(Self::Offline),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

impl CompletionModel for Completion {
    fn name(&self) -> &str {
        match self {
            Self::Remote(client) => client.name(),
            Self::Offline => "offline",
        }
    }

    async fn complete(&self, prompt: &str) -> Result<String, PlanError> {
        match self {
            Self::Remote(client) => client.complete(prompt).await,
            Self::Offline => Err(PlanError::upstream("no completion model configured")),
        }
    }
}
