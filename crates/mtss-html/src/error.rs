//! Error types for HTML operations

use thiserror::Error;

/// Errors that can occur while reading or exporting HTML
#[derive(Error, Debug)]
pub enum HtmlError {
    /// The markup could not be tokenized
    #[error("HTML parsing error at byte {position}: {source}")]
    Parse {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    /// Branding colors are not valid
    #[error("Invalid theme: {0}")]
    Theme(#[from] mtss_core::CoreError),
}

/// Result type for HTML operations
pub type Result<T> = std::result::Result<T, HtmlError>;
