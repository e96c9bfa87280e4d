//! HTML to markdown normalizer
//!
//! Inverts the renderer, including whatever the user changed in the
//! preview, back into the markdown subset the PDF layout engine reads.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::Result;
use crate::reader::read_html;

fn blank_runs() -> &'static Regex {
    static BLANK_RUNS: OnceLock<Regex> = OnceLock::new();
    BLANK_RUNS.get_or_init(|| Regex::new(r"\n[ \t]*\n(?:[ \t]*\n)+").unwrap())
}

/// Normalize rendered HTML into markdown
///
/// Emphasis becomes `**`/`*` markers inside whichever block holds it, lists
/// become `- ` lines, and tables get a separator row sized to the first
/// row. Runs of blank lines collapse to one. The result ends with exactly
/// one newline, or is empty when the HTML holds no content.
pub fn normalize(html: &str) -> Result<String> {
    let doc = read_html(html)?;
    let markdown = mtss_core::generate(&doc);
    let collapsed = blank_runs().replace_all(&markdown, "\n\n");
    let trimmed = collapsed.trim();

    if trimmed.is_empty() {
        return Ok(String::new());
    }
    tracing::debug!(blocks = doc.blocks.len(), "Normalized HTML");
    Ok(format!("{}\n", trimmed))
}
