//! # mtss-html
//!
//! HTML side of the MTSS resource pipeline.
//!
//! This crate provides functionality to:
//! - Render assembled markdown as a themed HTML preview
//! - Read rendered (or hand-edited) HTML back into a document AST
//! - Normalize that HTML into the markdown the PDF layout engine reads
//! - Package a resource as a standalone HTML file
//!
//! ## Example
//!
//! ```
//! use mtss_html::{normalize, render_html, Theme};
//!
//! let html = render_html("## Tier 1\n\n- **CICO**: daily check-in", &Theme::default());
//! assert_eq!(normalize(&html)?, "## Tier 1\n\n- **CICO**: daily check-in\n");
//! # Ok::<(), mtss_html::HtmlError>(())
//! ```

pub mod error;
pub mod export;
pub mod normalizer;
pub mod reader;
pub mod renderer;
pub mod theme;

pub use error::{HtmlError, Result};
pub use export::{export_html, export_preview, standalone_document, IMPORT_INSTRUCTIONS};
pub use normalizer::normalize;
pub use reader::read_html;
pub use renderer::{render_document, render_html, HtmlRenderer};
pub use theme::Theme;
