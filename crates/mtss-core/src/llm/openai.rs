//! OpenAI-compatible chat completions client
//!
//! Implements [`TextGenerator`] against `POST {base_url}/chat/completions`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{ChatTurn, GenerationError, GenerationRequest, TextGenerator};
use crate::config::LlmSettings;

/// Chat completions client
pub struct OpenAiGenerator {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiGenerator {
    /// Create a generator with an explicit key
    pub fn new(api_key: impl Into<String>) -> Self {
        let defaults = LlmSettings::default();
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: defaults.model,
            base_url: defaults.base_url,
        }
    }

    /// Build from settings, reading the key from the configured
    /// environment variable. A missing key is an auth error.
    pub fn from_settings(settings: &LlmSettings) -> Result<Self, GenerationError> {
        let api_key = std::env::var(&settings.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                GenerationError::Auth(format!("{} not set", settings.api_key_env))
            })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            model: settings.model.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Use a specific model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Use a custom base URL (compatible APIs, local proxies)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let body = CompletionRequest {
            model: &self.model,
            messages: &request.turns,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let err = GenerationError::from_status(status.as_u16(), &error_message(&text));
            tracing::warn!(status = status.as_u16(), error = %err, "Chat completion failed");
            return Err(err);
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Malformed(e.to_string()))?;

        extract_content(completion)
    }

    fn name(&self) -> &str {
        "openai"
    }
}

fn extract_content(completion: CompletionResponse) -> Result<String, GenerationError> {
    let content = completion
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| GenerationError::Malformed("response has no choices".to_string()))?;

    if content.trim().is_empty() {
        return Err(GenerationError::Empty);
    }
    Ok(content)
}

/// Pull `error.message` out of an OpenAI error body, or return it unchanged
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|r| r.error)
        .and_then(|d| d.message)
        .unwrap_or_else(|| body.to_string())
}

// Request/Response types

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatTurn],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let turns = vec![ChatTurn::system("sys"), ChatTurn::user("hi")];
        let body = CompletionRequest {
            model: "gpt-4-turbo-preview",
            messages: &turns,
            temperature: 0.5,
            max_tokens: 2000,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hi");
        assert_eq!(json["max_tokens"], 2000);
    }

    #[test]
    fn test_extract_content() {
        let completion: CompletionResponse = serde_json::from_str(
            r##"{"choices":[{"message":{"role":"assistant","content":"# Menu"}}]}"##,
        )
        .unwrap();
        assert_eq!(extract_content(completion).unwrap(), "# Menu");
    }

    #[test]
    fn test_blank_content_is_empty_error() {
        let completion: CompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"  "}}]}"#).unwrap();
        assert_eq!(extract_content(completion), Err(GenerationError::Empty));

        let none: CompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(
            extract_content(none),
            Err(GenerationError::Malformed(_))
        ));
    }

    #[test]
    fn test_error_message_parsing() {
        assert_eq!(
            error_message(r#"{"error":{"message":"Invalid API key"}}"#),
            "Invalid API key"
        );
        assert_eq!(error_message("gateway timeout"), "gateway timeout");
    }

    #[test]
    fn test_missing_key_is_auth_error() {
        let settings = LlmSettings {
            api_key_env: "MTSS_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            OpenAiGenerator::from_settings(&settings),
            Err(GenerationError::Auth(_))
        ));
    }
}
