//! Text generator abstraction
//!
//! The language model that drafts prose is an external collaborator. The
//! core only sees [`TextGenerator::generate`]: ordered chat turns in,
//! markdown text or a classified [`GenerationError`] out.

#[cfg(feature = "openai")]
pub mod openai;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::conversation::{Message, Sender};

#[cfg(feature = "openai")]
pub use openai::OpenAiGenerator;

/// Chat role of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One `{role, content}` turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

impl From<&Message> for ChatTurn {
    fn from(message: &Message) -> Self {
        match message.sender {
            Sender::User => ChatTurn::user(message.text.clone()),
            Sender::Assistant => ChatTurn::assistant(message.text.clone()),
        }
    }
}

/// A generation request
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub turns: Vec<ChatTurn>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl GenerationRequest {
    pub fn new(turns: Vec<ChatTurn>) -> Self {
        Self {
            turns,
            temperature: 0.7,
            max_tokens: 1000,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Classified text generator failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// Credentials missing or rejected (HTTP 401)
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Too many requests (HTTP 429)
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Any other non-success status
    #[error("Generator returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Transport failure before a status was received
    #[error("Network error: {0}")]
    Network(String),

    /// Success status with no text
    #[error("Generator returned an empty response")]
    Empty,

    /// Success status with an undecodable body
    #[error("Malformed generator response: {0}")]
    Malformed(String),
}

impl GenerationError {
    /// Whether another attempt may succeed
    ///
    /// Auth and rate-limit failures are terminal; retrying a 429 would only
    /// add load.
    pub fn is_retryable(&self) -> bool {
        match self {
            GenerationError::Auth(_) | GenerationError::RateLimited(_) => false,
            GenerationError::Status { .. }
            | GenerationError::Network(_)
            | GenerationError::Empty
            | GenerationError::Malformed(_) => true,
        }
    }

    /// Map an HTTP status and body to an error kind
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = if body.trim().is_empty() {
            "no details".to_string()
        } else {
            body.trim().to_string()
        };
        match status {
            401 => GenerationError::Auth(message),
            429 => GenerationError::RateLimited(message),
            _ => GenerationError::Status { status, message },
        }
    }
}

/// Black-box text generator
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Produce markdown text for the request
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;

    /// Short name for logs
    fn name(&self) -> &str;
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for Box<T> {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        (**self).generate(request).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            GenerationError::from_status(401, "bad key"),
            GenerationError::Auth(_)
        ));
        assert!(matches!(
            GenerationError::from_status(429, ""),
            GenerationError::RateLimited(_)
        ));
        assert_eq!(
            GenerationError::from_status(503, " down "),
            GenerationError::Status {
                status: 503,
                message: "down".to_string()
            }
        );
    }

    #[test]
    fn test_retryable_taxonomy() {
        assert!(!GenerationError::Auth("x".into()).is_retryable());
        assert!(!GenerationError::RateLimited("x".into()).is_retryable());
        assert!(GenerationError::Network("reset".into()).is_retryable());
        assert!(GenerationError::Empty.is_retryable());
        assert!(GenerationError::from_status(500, "").is_retryable());
    }

    #[test]
    fn test_turn_from_message() {
        let turn = ChatTurn::from(&Message::assistant("Hello"));
        assert_eq!(turn.role, Role::Assistant);
        let json = serde_json::to_string(&turn).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"Hello"}"#);
    }
}
