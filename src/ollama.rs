use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::config::BackendConfig;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: ChatRole::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: ChatRole::User, content: content.into() }
    }
}

/// Chat-completion request body.
#[derive(Serialize, Clone, Debug)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendErrorKind {
    Unreachable,
    Timeout,
    Status,
    Malformed,
    Empty,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("backend unreachable: {0}")]
    Unreachable(String),
    #[error("backend timed out: {0}")]
    Timeout(String),
    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed backend response: {0}")]
    Malformed(String),
    #[error("backend returned no completion text")]
    EmptyCompletion,
}

impl BackendError {
    pub fn kind(&self) -> BackendErrorKind {
        match self {
            BackendError::Unreachable(_) => BackendErrorKind::Unreachable,
            BackendError::Timeout(_) => BackendErrorKind::Timeout,
            BackendError::Status { .. } => BackendErrorKind::Status,
            BackendError::Malformed(_) => BackendErrorKind::Malformed,
            BackendError::EmptyCompletion => BackendErrorKind::Empty,
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            BackendError::Timeout(e.to_string())
        } else if e.is_decode() {
            BackendError::Malformed(e.to_string())
        } else if let Some(status) = e.status() {
            BackendError::Status { status: status.as_u16(), body: e.to_string() }
        } else {
            BackendError::Unreachable(e.to_string())
        }
    }
}

/// Anything that can turn a chat request into a single completion text.
/// One best-effort attempt per call; callers pick their own fallback.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(&self, request: ChatRequest) -> Result<String, BackendError>;
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
    usage: Option<CompletionUsage>,
}

#[derive(Deserialize)]
struct CompletionUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[derive(Debug, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    #[serde(default)]
    pub size: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

/// Client for a local Ollama server speaking the OpenAI-compatible chat API.
#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    completions_url: String,
    health_url: String,
    health_timeout: Duration,
}

impl OllamaClient {
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let completions_url = completions_url(&config.base_url)?;

        Ok(Self {
            client: Client::new(),
            completions_url,
            health_url: config.health_url.clone(),
            health_timeout: Duration::from_secs(config.health_timeout_secs),
        })
    }

    pub fn completions_url(&self) -> &str {
        &self.completions_url
    }

    pub fn health_url(&self) -> &str {
        &self.health_url
    }

    /// Lists model names from the health endpoint. Used once at startup to
    /// decide whether serving conversations is possible at all.
    pub async fn list_models(&self) -> Result<Vec<String>, BackendError> {
        debug!("Probing backend at {}", self.health_url);

        let response = self
            .client
            .get(&self.health_url)
            .timeout(self.health_timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status { status, body });
        }

        let tags: TagsResponse = response.json().await?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }
}

#[async_trait]
impl ChatBackend for OllamaClient {
    async fn complete(&self, request: ChatRequest) -> Result<String, BackendError> {
        info!("Sending chat request to {} with model: {}", self.completions_url, request.model);

        let response = self
            .client
            .post(&self.completions_url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            error!("Backend error {}: {}", status, body);
            return Err(BackendError::Status { status, body });
        }

        let completion: CompletionResponse = response.json().await?;

        if let Some(usage) = &completion.usage {
            debug!(
                "Token usage - Prompt: {}, Completion: {}, Total: {}",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| BackendError::Malformed("no choices in completion response".to_string()))?;

        if content.trim().is_empty() {
            return Err(BackendError::EmptyCompletion);
        }

        Ok(content)
    }
}

fn completions_url(base_url: &str) -> Result<String, BackendError> {
    let mut base = Url::parse(base_url)
        .map_err(|e| BackendError::Unreachable(format!("invalid base URL {}: {}", base_url, e)))?;

    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    base.join("chat/completions")
        .map(|url| url.to_string())
        .map_err(|e| BackendError::Unreachable(format!("invalid base URL {}: {}", base_url, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completions_url_joins_under_base_path() {
        assert_eq!(
            completions_url("http://localhost:11434/v1").unwrap(),
            "http://localhost:11434/v1/chat/completions"
        );
        assert_eq!(
            completions_url("http://localhost:11434/v1/").unwrap(),
            "http://localhost:11434/v1/chat/completions"
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let err = completions_url("not a url").unwrap_err();
        assert_eq!(err.kind(), BackendErrorKind::Unreachable);
    }

    #[test]
    fn test_request_serializes_chat_shape() {
        let request = ChatRequest {
            model: "llama2".to_string(),
            messages: vec![ChatMessage::system("be brief"), ChatMessage::user("hi")],
            max_tokens: 500,
            temperature: 0.7,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hi");
        assert_eq!(json["max_tokens"], 500);
    }

    #[test]
    fn test_tags_response_tolerates_missing_models() {
        let tags: TagsResponse = serde_json::from_str("{}").unwrap();
        assert!(tags.models.is_empty());

        let tags: TagsResponse =
            serde_json::from_str(r#"{"models":[{"name":"llama2:latest","size":3826793677}]}"#).unwrap();
        assert_eq!(tags.models[0].name, "llama2:latest");
    }

    #[tokio::test]
    async fn test_unreachable_server_maps_to_backend_error() {
        let config = BackendConfig {
            base_url: "http://127.0.0.1:9/v1".to_string(),
            health_url: "http://127.0.0.1:9/api/tags".to_string(),
            ..BackendConfig::default()
        };
        let client = OllamaClient::new(&config).unwrap();

        let err = client.list_models().await.unwrap_err();
        assert!(matches!(err.kind(), BackendErrorKind::Unreachable | BackendErrorKind::Timeout));

        let request = ChatRequest {
            model: config.model.clone(),
            messages: vec![ChatMessage::user("hello")],
            max_tokens: 10,
            temperature: 0.0,
        };
        assert!(client.complete(request).await.is_err());
    }
}
