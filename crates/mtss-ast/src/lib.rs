//! mtss-ast - Markdown AST fragment
//!
//! This crate provides the block and inline types that sit between the
//! markdown parser, the themed HTML renderer, the HTML reader and the
//! markdown generator. Only the subset of markdown the assistant actually
//! produces is modelled: headings, paragraphs, lists, tables, bold/italic
//! spans and links.

pub mod block;
pub mod document;
pub mod inline;

pub use block::{Block, Heading, List, ListItem, ListType, Paragraph, Table, TableCell, TableRow};
pub use document::{Document, DocumentMeta};
pub use inline::{FormatType, Inline, Link};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
