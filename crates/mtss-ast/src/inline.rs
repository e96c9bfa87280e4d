//! Inline elements for block content
//!
//! Inline runs appear inside headings, paragraphs, list items and table
//! cells.

use serde::{Deserialize, Serialize};

/// Inline-level content element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Inline {
    /// Plain text content
    Text(String),
    /// Emphasised content (bold or italic)
    Format(FormatType, Box<Inline>),
    /// A run of several inline elements
    Span(Vec<Inline>),
    /// A hyperlink
    Link(Link),
}

/// Emphasis kinds the pipeline round-trips
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormatType {
    /// `**bold**`
    Bold,
    /// `*italic*`
    Italic,
}

/// A hyperlink element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// The URL target
    pub url: String,
    /// The link text
    pub text: Vec<Inline>,
}

impl Inline {
    /// Shorthand for a plain text run
    pub fn text(text: impl Into<String>) -> Self {
        Inline::Text(text.into())
    }

    /// Shorthand for a bold run around plain text
    pub fn bold(text: impl Into<String>) -> Self {
        Inline::Format(FormatType::Bold, Box::new(Inline::Text(text.into())))
    }

    /// Shorthand for an italic run around plain text
    pub fn italic(text: impl Into<String>) -> Self {
        Inline::Format(FormatType::Italic, Box::new(Inline::Text(text.into())))
    }

    /// Text content with all markup removed
    pub fn plain_text(&self) -> String {
        match self {
            Inline::Text(text) => text.clone(),
            Inline::Format(_, inner) => inner.plain_text(),
            Inline::Span(inlines) => plain_text(inlines),
            Inline::Link(link) => plain_text(&link.text),
        }
    }

    /// Whether this inline carries no visible text
    pub fn is_blank(&self) -> bool {
        self.plain_text().trim().is_empty()
    }
}

/// Concatenated plain text of a run of inlines
pub fn plain_text(inlines: &[Inline]) -> String {
    inlines.iter().map(Inline::plain_text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_inline() {
        let inline = Inline::text("Hello");
        assert_eq!(inline, Inline::Text("Hello".to_string()));
    }

    #[test]
    fn test_formatted_text() {
        let bold = Inline::bold("important");
        if let Inline::Format(FormatType::Bold, inner) = bold {
            assert_eq!(*inner, Inline::Text("important".to_string()));
        } else {
            panic!("Expected Bold format");
        }
    }

    #[test]
    fn test_plain_text_flattens_nesting() {
        let inline = Inline::Span(vec![
            Inline::text("Check "),
            Inline::bold("In"),
            Inline::text("/"),
            Inline::Link(Link {
                url: "https://example.com".to_string(),
                text: vec![Inline::italic("Out")],
            }),
        ]);
        assert_eq!(inline.plain_text(), "Check In/Out");
    }

    #[test]
    fn test_is_blank() {
        assert!(Inline::text("  ").is_blank());
        assert!(!Inline::bold("x").is_blank());
    }
}
