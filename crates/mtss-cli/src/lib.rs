//! mtss CLI - Command-line interface library
//!
//! This library provides the CLI functionality for the MTSS assistant:
//! - Chat: Talk to the assistant and generate a resource interactively
//! - Generate: Assemble a resource from a saved session or messages
//! - Render: Convert markdown or an edited preview to PDF or HTML
//! - Normalize: Convert preview HTML back to markdown
//! - Catalog: Browse the built-in intervention catalog
//!
//! # Library Usage
//!
//! ```ignore
//! use mtss_cli::{render_command, RenderFormat};
//!
//! render_command("menu.md", RenderFormat::Pdf, ResourceType::InterventionMenu,
//!     Path::new("out"), &settings, &ExportOptions::default())?;
//! ```
//!
//! # Binary Usage
//!
//! ```bash
//! # Generate a student plan from two messages
//! mtss generate -m "I need a student plan" -m "Reading fluency, grade 3"
//!
//! # Render an edited preview to PDF
//! mtss render preview.html --resource-type plan --output out/
//!
//! # List tier 2 behavior interventions
//! mtss catalog --tier 2 --domain behavior
//! ```

pub mod app;

// Re-export main entry point and types
pub use app::{
    build_session, catalog_command, catalog_listing, chat_command, generate_command,
    normalize_command, pick_button, render_command,
};
pub use app::{run_cli, ExportFormat, OutputFormat, RenderFormat};
