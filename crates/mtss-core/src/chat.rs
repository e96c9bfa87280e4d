//! Chat service
//!
//! Runs chat turns and resource generation against a [`Session`] with the
//! bounded retry policy. The session is only mutated after a call
//! succeeds; on failure the transcript and resource type are exactly as
//! they were.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assembler::{AssemblyError, DocumentAssembler};
use crate::buttons::{extract_buttons, ButtonReply, POST_GENERATION_BUTTONS};
use crate::config::Settings;
use crate::conversation::Session;
use crate::llm::{ChatTurn, GenerationError, GenerationRequest, TextGenerator};
use crate::prompt::PromptComposer;
use crate::resource::{ResourceDocument, ResourceType};
use crate::retry::{RetryOutcome, RetryPolicy};

/// Chat-level failure surfaced to the UI layer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChatError {
    /// Empty or malformed input, rejected before any generation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The chat reply could not be generated
    #[error("Chat failed after {attempts} attempt(s): {source}")]
    Generation {
        attempts: u32,
        #[source]
        source: GenerationError,
    },

    /// The resource could not be assembled
    #[error("Resource generation failed after {attempts} attempt(s): {source}")]
    Assembly {
        attempts: u32,
        #[source]
        source: AssemblyError,
    },
}

impl ChatError {
    fn generation_error(&self) -> Option<&GenerationError> {
        match self {
            ChatError::InvalidInput(_) => None,
            ChatError::Generation { source, .. } => Some(source),
            ChatError::Assembly { source, .. } => source.generation_error(),
        }
    }

    /// Whether the failure was a rate limit
    pub fn is_rate_limited(&self) -> bool {
        matches!(
            self.generation_error(),
            Some(GenerationError::RateLimited(_))
        )
    }

    /// Message to show the user in place of an assistant reply
    pub fn user_message(&self) -> &'static str {
        if let ChatError::InvalidInput(_) = self {
            return "Please type a message before sending.";
        }
        match self.generation_error() {
            Some(GenerationError::RateLimited(_)) => {
                "Too many requests right now. Please wait a few minutes and try again."
            }
            Some(GenerationError::Auth(_)) => {
                "The assistant is not configured correctly. Please contact support."
            }
            _ => "Sorry, something went wrong while generating a response. Please try again.",
        }
    }
}

/// Assistant reply for one chat turn
pub type ChatReply = ButtonReply;

/// A generated resource plus the confirmation reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedResource {
    pub document: ResourceDocument,
    pub reply: ChatReply,
}

/// Chat and resource generation front door
#[derive(Clone)]
pub struct ChatService {
    generator: Arc<dyn TextGenerator>,
    composer: PromptComposer,
    assembler: DocumentAssembler,
    retry: RetryPolicy,
    temperature: f32,
    chat_max_tokens: u32,
    organization: String,
}

impl ChatService {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            assembler: DocumentAssembler::new(Arc::clone(&generator)),
            generator,
            composer: PromptComposer::default(),
            retry: RetryPolicy::default(),
            temperature: 0.7,
            chat_max_tokens: 1000,
            organization: "Nsightz".to_string(),
        }
    }

    pub fn from_settings(generator: Arc<dyn TextGenerator>, settings: &Settings) -> Self {
        Self {
            assembler: DocumentAssembler::from_settings(Arc::clone(&generator), settings),
            generator,
            composer: PromptComposer::default().with_branding(
                settings.branding.organization.clone(),
                settings.branding.promo_url.clone(),
            ),
            retry: RetryPolicy::from(&settings.retry),
            temperature: settings.llm.temperature,
            chat_max_tokens: settings.llm.chat_max_tokens,
            organization: settings.branding.organization.clone(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_assembler(mut self, assembler: DocumentAssembler) -> Self {
        self.assembler = assembler;
        self
    }

    pub fn assembler(&self) -> &DocumentAssembler {
        &self.assembler
    }

    /// Send a user message and record the exchange on success
    ///
    /// The resource type is re-inferred from every message, so a user can
    /// switch to a different resource mid-conversation.
    pub async fn send(&self, session: &mut Session, message: &str) -> Result<ChatReply, ChatError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ChatError::InvalidInput("message is empty".to_string()));
        }

        let resource_type = ResourceType::infer(message).unwrap_or(session.resource_type);

        let mut turns = vec![ChatTurn::system(
            self.composer
                .system_prompt(resource_type, &session.school_level),
        )];
        turns.extend(
            session
                .transcript()
                .iter()
                .filter(|m| !m.text.trim().is_empty())
                .map(ChatTurn::from),
        );
        turns.push(ChatTurn::user(message));

        let request = GenerationRequest::new(turns)
            .with_temperature(self.temperature)
            .with_max_tokens(self.chat_max_tokens);

        tracing::debug!(
            session = %session.id,
            resource_type = %resource_type,
            turns = request.turns.len(),
            "Sending chat turn"
        );

        let outcome = self
            .retry
            .run(|_| self.generator.generate(&request))
            .await;

        let text = match outcome {
            RetryOutcome::Success { value, .. } => value,
            RetryOutcome::RetryableFailure {
                attempts,
                last_error,
            } => {
                return Err(ChatError::Generation {
                    attempts,
                    source: last_error,
                })
            }
            RetryOutcome::TerminalFailure { attempts, error } => {
                return Err(ChatError::Generation {
                    attempts,
                    source: error,
                })
            }
        };

        let reply = extract_buttons(&text, resource_type);
        session.resource_type = resource_type;
        session.push_user(message);
        session.push_assistant(reply.text.clone());
        Ok(reply)
    }

    /// Assemble the session's resource and record a confirmation message
    pub async fn generate_resource(
        &self,
        session: &mut Session,
    ) -> Result<GeneratedResource, ChatError> {
        let snapshot: &Session = session;
        let outcome = self.retry.run(|_| self.assembler.assemble(snapshot)).await;

        let document = match outcome {
            RetryOutcome::Success { value, attempts } => {
                tracing::info!(
                    session = %session.id,
                    resource_type = %value.resource_type,
                    attempts,
                    "Resource generated"
                );
                value
            }
            RetryOutcome::RetryableFailure {
                attempts,
                last_error,
            } => {
                return Err(ChatError::Assembly {
                    attempts,
                    source: last_error,
                })
            }
            RetryOutcome::TerminalFailure { attempts, error } => {
                return Err(ChatError::Assembly {
                    attempts,
                    source: error,
                })
            }
        };

        let text = format!(
            "I've generated your {}! You can preview it below, download it as a PDF, \
or export it as HTML for Google Docs.",
            document.resource_type.header_title(&self.organization)
        );
        session.push_assistant(text.clone());

        Ok(GeneratedResource {
            document,
            reply: ChatReply {
                text,
                suggested_buttons: POST_GENERATION_BUTTONS
                    .iter()
                    .map(|b| b.to_string())
                    .collect(),
            },
        })
    }
}
