//! Bold span parsing for PDF text runs

use std::sync::OnceLock;

use regex::Regex;

/// A run of text drawn in one font weight
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSpan {
    pub text: String,
    pub bold: bool,
}

impl TextSpan {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
        }
    }
}

fn bold_pattern() -> &'static Regex {
    static BOLD: OnceLock<Regex> = OnceLock::new();
    BOLD.get_or_init(|| Regex::new(r"\*\*(.*?)\*\*").unwrap())
}

/// Split text into plain and bold spans on `**...**` pairs
///
/// A colon right after a closing `**` belongs to the bold span, so
/// `**Label**:` draws as a bold `Label:`. Text with no pairs is a single
/// plain span.
pub fn parse_bold_spans(text: &str) -> Vec<TextSpan> {
    let mut spans = Vec::new();
    let mut current = 0;

    for caps in bold_pattern().captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() < current {
            continue;
        }
        if whole.start() > current {
            spans.push(TextSpan::plain(&text[current..whole.start()]));
        }

        let mut bold = inner.as_str().to_string();
        current = whole.end();
        if text[current..].starts_with(':') {
            bold.push(':');
            current += 1;
        }
        spans.push(TextSpan::bold(bold));
    }

    if current < text.len() {
        spans.push(TextSpan::plain(&text[current..]));
    }
    if spans.is_empty() {
        spans.push(TextSpan::plain(text));
    }
    spans
}

/// Concatenated text with the bold markers removed
pub fn strip_bold(text: &str) -> String {
    parse_bold_spans(text)
        .into_iter()
        .map(|span| span.text)
        .collect()
}
