//! mtss-core - evidence-based MTSS resources from a conversation
//!
//! Core library for the MTSS assistant: the intervention catalog, prompt
//! composition, the text generator seam, bounded retry, document assembly,
//! and the markdown parser/generator pair the renderers build on.
//!
//! # Example
//!
//! ```
//! use mtss_core::{generate, parse, ResourceType};
//!
//! let doc = parse("# MTSS Intervention Menu\n\n- **WOOP**: goal setting");
//! assert_eq!(doc.metadata.title.as_deref(), Some(ResourceType::InterventionMenu.title()));
//! assert_eq!(generate(&doc), "# MTSS Intervention Menu\n\n- **WOOP**: goal setting");
//! ```

pub mod assembler;
pub mod buttons;
pub mod catalog;
pub mod chat;
pub mod config;
pub mod conversation;
pub mod error;
pub mod export;
pub mod generator;
pub mod llm;
pub mod parser;
pub mod prompt;
pub mod resource;
pub mod retry;

// Re-export main types and functions
pub use assembler::{finalize, AssemblyError, DocumentAssembler, GenerationStrategy};
pub use buttons::{
    extract_buttons, ButtonReply, POST_GENERATION_BUTTONS, WELCOME_BUTTONS, WELCOME_MESSAGE,
};
pub use catalog::{Catalog, CatalogQuery, Domain, Grade, GradeRange, Intervention, Tier};
pub use chat::{ChatError, ChatReply, ChatService, GeneratedResource};
pub use config::{Rgb, Settings};
pub use conversation::{Message, Sender, Session};
pub use error::{CoreError, Result};
pub use export::ExportArtifact;
pub use generator::{generate, generate_with_config, GeneratorConfig, MarkdownGenerator};
pub use llm::{ChatTurn, GenerationError, GenerationRequest, Role, TextGenerator};
pub use parser::parse;
pub use prompt::PromptComposer;
pub use resource::{ResourceDocument, ResourceType};
pub use retry::{RetryOutcome, RetryPolicy, Retryable};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
