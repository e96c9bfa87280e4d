//! Error types for PDF generation

use thiserror::Error;

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// Errors that can occur during PDF generation
#[derive(Error, Debug)]
pub enum PdfError {
    /// Nothing left to lay out after normalization
    #[error("Resource has no content to render")]
    EmptyDocument,

    /// The preview HTML could not be normalized
    #[error("Normalization failed: {0}")]
    Html(#[from] mtss_html::HtmlError),

    /// Branding colors are not valid
    #[error("Invalid branding: {0}")]
    Branding(#[from] mtss_core::CoreError),

    /// Serializing or compressing the file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
