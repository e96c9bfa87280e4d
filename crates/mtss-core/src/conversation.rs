//! Conversation session state
//!
//! A [`Session`] is the explicit context object threaded through every
//! chat and generation call. The transcript is append-only; nothing in the
//! crate removes or rewrites a message once pushed.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, Result};
use crate::resource::ResourceType;

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    /// Chat role name understood by the text generator
    pub fn role(self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Assistant => "assistant",
        }
    }
}

/// One transcript entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub sender: Sender,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::User,
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::Assistant,
        }
    }
}

/// Per-conversation context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub school_level: String,
    pub resource_type: ResourceType,
    transcript: Vec<Message>,
}

impl Session {
    /// Start an empty session for a school level
    pub fn new(school_level: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            school_level: school_level.into(),
            resource_type: ResourceType::Unset,
            transcript: Vec::new(),
        }
    }

    /// Builder-style resource type
    pub fn with_resource_type(mut self, resource_type: ResourceType) -> Self {
        self.resource_type = resource_type;
        self
    }

    /// Append a user message
    pub fn push_user(&mut self, text: impl Into<String>) {
        self.transcript.push(Message::user(text));
    }

    /// Append an assistant message
    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.transcript.push(Message::assistant(text));
    }

    /// Ordered messages
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// Number of assistant messages
    pub fn assistant_turns(&self) -> usize {
        self.transcript
            .iter()
            .filter(|m| m.sender == Sender::Assistant)
            .count()
    }

    /// User messages joined by newlines, used as section context
    pub fn user_context(&self) -> String {
        self.transcript
            .iter()
            .filter(|m| m.sender == Sender::User)
            .map(|m| m.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Whole transcript as `"role: text"` lines
    pub fn transcript_context(&self) -> String {
        self.transcript
            .iter()
            .filter(|m| !m.text.trim().is_empty())
            .map(|m| format!("{}: {}", m.sender.role(), m.text.trim()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Messages with blank text dropped; an empty result is an input error
    pub fn validated_transcript(&self) -> Result<Vec<&Message>> {
        let messages: Vec<&Message> = self
            .transcript
            .iter()
            .filter(|m| !m.text.trim().is_empty())
            .collect();
        if messages.is_empty() {
            return Err(CoreError::InvalidInput(
                "conversation has no messages".to_string(),
            ));
        }
        Ok(messages)
    }

    /// Serialize the session to JSON for saving between CLI runs
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Restore a session saved by [`Session::to_json`]
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
