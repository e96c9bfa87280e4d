//! Document Assembler
//!
//! Turns a session into a titled markdown [`ResourceDocument`], either with
//! one large generation call or one call per named section. A failed call
//! fails the whole assembly; partial documents are never returned.

use std::fmt::Write;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Settings;
use crate::conversation::Session;
use crate::llm::{ChatTurn, GenerationError, GenerationRequest, TextGenerator};
use crate::prompt::{PromptComposer, SECTION_REQUEST};
use crate::resource::{ResourceDocument, ResourceType};
use crate::retry::Retryable;

/// How the body is obtained from the generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GenerationStrategy {
    /// One call covering the whole resource
    #[default]
    #[serde(rename = "whole")]
    WholeDocument,
    /// One call per section of [`ResourceType::sections`]
    #[serde(rename = "sections")]
    SectionWise,
}

/// Assembly failure
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssemblyError {
    /// The session has nothing to generate from
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A generator call failed
    #[error("Generation failed{}: {source}", .section.as_ref().map(|s| format!(" in section '{}'", s)).unwrap_or_default())]
    GenerationFailed {
        /// Section being generated, if section-wise
        section: Option<String>,
        #[source]
        source: GenerationError,
    },
}

impl AssemblyError {
    /// Underlying generator error, if any
    pub fn generation_error(&self) -> Option<&GenerationError> {
        match self {
            AssemblyError::GenerationFailed { source, .. } => Some(source),
            AssemblyError::InvalidInput(_) => None,
        }
    }
}

impl Retryable for AssemblyError {
    fn is_retryable(&self) -> bool {
        self.generation_error()
            .is_some_and(GenerationError::is_retryable)
    }
}

/// Builds resource documents from sessions
#[derive(Clone)]
pub struct DocumentAssembler {
    generator: Arc<dyn TextGenerator>,
    composer: PromptComposer,
    strategy: GenerationStrategy,
    temperature: f32,
    resource_max_tokens: u32,
    section_max_tokens: u32,
}

impl DocumentAssembler {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            composer: PromptComposer::default(),
            strategy: GenerationStrategy::default(),
            temperature: 0.7,
            resource_max_tokens: 2000,
            section_max_tokens: 1000,
        }
    }

    /// Configure strategy, sampling and branding from settings
    pub fn from_settings(generator: Arc<dyn TextGenerator>, settings: &Settings) -> Self {
        Self {
            generator,
            composer: PromptComposer::default().with_branding(
                settings.branding.organization.clone(),
                settings.branding.promo_url.clone(),
            ),
            strategy: settings.generation.strategy,
            temperature: settings.llm.temperature,
            resource_max_tokens: settings.llm.resource_max_tokens,
            section_max_tokens: settings.llm.section_max_tokens,
        }
    }

    pub fn with_strategy(mut self, strategy: GenerationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_composer(mut self, composer: PromptComposer) -> Self {
        self.composer = composer;
        self
    }

    pub fn strategy(&self) -> GenerationStrategy {
        self.strategy
    }

    /// Assemble the resource named by the session's resource type
    pub async fn assemble(&self, session: &Session) -> Result<ResourceDocument, AssemblyError> {
        session
            .validated_transcript()
            .map_err(|e| AssemblyError::InvalidInput(e.to_string()))?;

        let resource_type = session.resource_type;
        tracing::info!(
            resource_type = %resource_type,
            strategy = ?self.strategy,
            generator = self.generator.name(),
            "Assembling resource"
        );

        let body = match self.strategy {
            GenerationStrategy::WholeDocument => self.generate_whole(session).await?,
            GenerationStrategy::SectionWise => self.generate_sections(session).await?,
        };

        let markdown = finalize(resource_type, &session.school_level, &body);
        Ok(ResourceDocument::new(resource_type, markdown))
    }

    async fn generate_whole(&self, session: &Session) -> Result<String, AssemblyError> {
        let prompt = self.composer.resource_prompt(
            session.resource_type,
            &session.school_level,
            &session.transcript_context(),
        );
        let request = GenerationRequest::new(vec![ChatTurn::user(prompt)])
            .with_temperature(self.temperature)
            .with_max_tokens(self.resource_max_tokens);

        self.call(&request, None).await
    }

    async fn generate_sections(&self, session: &Session) -> Result<String, AssemblyError> {
        let context = session.user_context();
        let mut parts = Vec::new();

        for section in session.resource_type.sections() {
            let prompt = self.composer.section_prompt(
                session.resource_type,
                section,
                &session.school_level,
                &context,
            );
            let request =
                GenerationRequest::new(vec![ChatTurn::system(prompt), ChatTurn::user(SECTION_REQUEST)])
                    .with_temperature(self.temperature)
                    .with_max_tokens(self.section_max_tokens);

            tracing::debug!(section, "Generating section");
            parts.push(self.call(&request, Some(section)).await?);
        }

        Ok(parts.join("\n\n"))
    }

    async fn call(
        &self,
        request: &GenerationRequest,
        section: Option<&str>,
    ) -> Result<String, AssemblyError> {
        let failed = |source| AssemblyError::GenerationFailed {
            section: section.map(String::from),
            source,
        };

        let text = self.generator.generate(request).await.map_err(failed)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(failed(GenerationError::Empty));
        }
        Ok(text.to_string())
    }
}

/// Prefix the generated body with the resource heading
///
/// A level-1 heading the generator put on its first line is replaced by
/// the fixed title so every document opens the same way.
pub fn finalize(resource_type: ResourceType, school_level: &str, body: &str) -> String {
    let body = body.trim();
    let body = match body.split_once('\n') {
        Some((first, rest)) if is_h1(first) => rest.trim_start(),
        None if is_h1(body) => "",
        _ => body,
    };

    let mut out = String::new();
    writeln!(out, "# {}", resource_type.title()).unwrap();
    writeln!(out).unwrap();
    if !school_level.trim().is_empty() {
        writeln!(out, "**School Level:** {}", school_level.trim()).unwrap();
        writeln!(out).unwrap();
    }
    if !body.is_empty() {
        writeln!(out, "{}", body).unwrap();
    }
    out
}

fn is_h1(line: &str) -> bool {
    line.trim_start().starts_with("# ")
}
