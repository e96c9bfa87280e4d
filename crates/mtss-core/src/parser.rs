//! Markdown Parser
//!
//! Parses the markdown subset produced by the assembler into a
//! `mtss_ast::Document`.
//!
//! # Supported Syntax
//!
//! - Headings: `#` to `######`
//! - Paragraphs: text separated by blank lines
//! - Formatting: `**bold**`, `*italic*`, `_italic_`, `[text](url)`
//! - Lists: `- item`, `* item`, `+ item`, `1. item`
//! - Tables: `| a | b |` rows with an optional `| --- | --- |` separator
//!
//! Anything else is paragraph text; the parser never fails.
//!
//! # Example
//!
//! ```
//! use mtss_core::parse;
//!
//! let doc = parse("# Menu\n\nHello **world**.");
//! assert_eq!(doc.metadata.title, Some("Menu".to_string()));
//! assert_eq!(doc.len(), 2);
//! ```

use std::sync::OnceLock;

use mtss_ast::{
    Block, Document, FormatType, Heading, Inline, Link, List, ListItem, ListType,
    Paragraph, Table, TableCell, TableRow,
};
use regex::Regex;

/// Parser state for tracking what kind of block we're currently building
#[derive(Debug, Clone, PartialEq)]
enum ParserState {
    /// At the root level, not in any block
    Root,
    /// Building a paragraph with accumulated lines
    Paragraph(Vec<String>),
    /// Building a list with accumulated item texts
    List(ListType, Vec<String>),
    /// Building a table; `header` is set once a separator row is seen
    Table { rows: Vec<Vec<String>>, header: bool },
}

/// Markdown parser using a state machine approach
struct Parser {
    blocks: Vec<Block>,
    state: ParserState,
}

impl Parser {
    fn new() -> Self {
        Self {
            blocks: Vec::new(),
            state: ParserState::Root,
        }
    }

    fn parse(mut self, text: &str) -> Document {
        let text = text.replace("\r\n", "\n");

        for line in text.lines() {
            self.process_line(line);
        }
        self.flush_state();

        Document::from_blocks(self.blocks)
    }

    fn process_line(&mut self, line: &str) {
        if line.trim().is_empty() {
            self.flush_state();
            return;
        }

        if let Some(heading) = try_parse_heading(line) {
            self.flush_state();
            self.blocks.push(Block::Heading(heading));
            return;
        }

        if let Some(cells) = try_parse_table_row(line) {
            self.handle_table_row(cells);
            return;
        }

        if let Some((list_type, content)) = try_parse_list_item(line) {
            self.handle_list_item(list_type, content);
            return;
        }

        self.handle_text_line(line);
    }

    fn handle_table_row(&mut self, cells: Vec<String>) {
        let separator = is_separator_row(&cells);
        match &mut self.state {
            ParserState::Table { rows, header } => {
                if separator {
                    if rows.len() == 1 {
                        *header = true;
                    }
                } else {
                    rows.push(cells);
                }
            }
            _ => {
                self.flush_state();
                // A separator with nothing above it carries no content
                if !separator {
                    self.state = ParserState::Table {
                        rows: vec![cells],
                        header: false,
                    };
                }
            }
        }
    }

    fn handle_list_item(&mut self, list_type: ListType, content: String) {
        match &mut self.state {
            ParserState::List(current_type, items) if *current_type == list_type => {
                items.push(content);
            }
            _ => {
                self.flush_state();
                self.state = ParserState::List(list_type, vec![content]);
            }
        }
    }

    /// Plain text continues a paragraph or the last list item
    fn handle_text_line(&mut self, line: &str) {
        match &mut self.state {
            ParserState::Paragraph(lines) => lines.push(line.trim().to_string()),
            ParserState::List(_, items) => {
                if let Some(last) = items.last_mut() {
                    last.push(' ');
                    last.push_str(line.trim());
                }
            }
            _ => {
                self.flush_state();
                self.state = ParserState::Paragraph(vec![line.trim().to_string()]);
            }
        }
    }

    /// Flush the current state to blocks
    fn flush_state(&mut self) {
        let state = std::mem::replace(&mut self.state, ParserState::Root);

        match state {
            ParserState::Root => {}
            ParserState::Paragraph(lines) => {
                if !lines.is_empty() {
                    let text = lines.join(" ");
                    self.blocks
                        .push(Block::Paragraph(Paragraph::new(parse_inlines(&text))));
                }
            }
            ParserState::List(list_type, items) => {
                if !items.is_empty() {
                    self.blocks.push(Block::List(List {
                        list_type,
                        items: items
                            .iter()
                            .map(|t| ListItem::new(parse_inlines(t)))
                            .collect(),
                    }));
                }
            }
            ParserState::Table { rows, header } => {
                let rows = rows
                    .into_iter()
                    .enumerate()
                    .map(|(i, cells)| TableRow {
                        cells: cells
                            .iter()
                            .map(|c| TableCell {
                                inlines: parse_inlines(c),
                            })
                            .collect(),
                        is_header: header && i == 0,
                    })
                    .collect();
                self.blocks.push(Block::Table(Table { rows }));
            }
        }
    }
}

fn try_parse_heading(line: &str) -> Option<Heading> {
    let trimmed = line.trim_start();
    let level = trimmed.chars().take_while(|&c| c == '#').count();

    if (1..=6).contains(&level) {
        let rest = &trimmed[level..];
        if rest.starts_with(' ') || rest.is_empty() {
            return Some(Heading {
                level: level as u8,
                text: parse_inlines(rest.trim().trim_end_matches('#').trim_end()),
            });
        }
    }
    None
}

fn try_parse_list_item(line: &str) -> Option<(ListType, String)> {
    let trimmed = line.trim_start();

    for marker in ["- ", "* ", "+ "] {
        if let Some(rest) = trimmed.strip_prefix(marker) {
            return Some((ListType::Unordered, rest.trim().to_string()));
        }
    }

    let digits = trimmed.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        if let Some(rest) = trimmed[digits..].strip_prefix(". ") {
            return Some((ListType::Ordered, rest.trim().to_string()));
        }
    }
    None
}

/// Split a `| a | b |` line into trimmed cells
fn try_parse_table_row(line: &str) -> Option<Vec<String>> {
    let trimmed = line.trim();
    if !trimmed.starts_with('|') {
        return None;
    }
    Some(split_table_cells(trimmed))
}

/// Cells of a pipe table row, trimmed. `\|` is a literal pipe inside a
/// cell and comes back unescaped.
pub fn split_table_cells(row: &str) -> Vec<String> {
    let inner = row.trim();
    let inner = inner.strip_prefix('|').unwrap_or(inner);
    let inner = match inner.strip_suffix('|') {
        Some(stripped) if !stripped.ends_with('\\') => stripped,
        _ => inner,
    };

    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                cell.push('|');
                chars.next();
            }
            '|' => cells.push(std::mem::take(&mut cell).trim().to_string()),
            _ => cell.push(c),
        }
    }
    cells.push(cell.trim().to_string());
    cells
}

/// A separator row has only `---`-style cells (colons allowed for alignment)
pub fn is_separator_row(cells: &[String]) -> bool {
    !cells.is_empty()
        && cells.iter().all(|c| {
            let c = c.trim();
            c.contains("---") && c.chars().all(|ch| ch == '-' || ch == ':')
        })
}

fn inline_patterns() -> &'static [(Regex, InlineKind); 4] {
    static PATTERNS: OnceLock<[(Regex, InlineKind); 4]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            (Regex::new(r"\*\*(.+?)\*\*").unwrap(), InlineKind::Bold),
            (Regex::new(r"\*([^*\s][^*]*)\*").unwrap(), InlineKind::Italic),
            (Regex::new(r"\b_([^_]+)_\b").unwrap(), InlineKind::Italic),
            (
                Regex::new(r"\[([^\]]+)\]\(([^)\s]+)\)").unwrap(),
                InlineKind::Link,
            ),
        ]
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InlineKind {
    Bold,
    Italic,
    Link,
}

/// Parse inline formatting in text
pub fn parse_inlines(text: &str) -> Vec<Inline> {
    let patterns = inline_patterns();
    let mut result = Vec::new();
    let mut remaining = text;

    while !remaining.is_empty() {
        // Earliest match wins; on a tie the first pattern (bold) wins
        let earliest = patterns
            .iter()
            .filter_map(|(re, kind)| re.captures(remaining).map(|caps| (caps, *kind)))
            .min_by_key(|(caps, _)| caps.get(0).map_or(usize::MAX, |m| m.start()));

        let Some((caps, kind)) = earliest else {
            result.push(Inline::Text(remaining.to_string()));
            break;
        };
        let Some(whole) = caps.get(0) else {
            break;
        };

        if whole.start() > 0 {
            result.push(Inline::Text(remaining[..whole.start()].to_string()));
        }

        let content = caps.get(1).map_or("", |m| m.as_str());
        let inline = match kind {
            InlineKind::Bold => Inline::Format(FormatType::Bold, Box::new(nested(content))),
            InlineKind::Italic => Inline::Format(FormatType::Italic, Box::new(nested(content))),
            InlineKind::Link => Inline::Link(Link {
                url: caps.get(2).map_or("", |m| m.as_str()).to_string(),
                text: parse_inlines(content),
            }),
        };
        result.push(inline);

        remaining = &remaining[whole.end()..];
    }

    result
}

/// Inner content of an emphasis run: one inline, or a span of several
fn nested(content: &str) -> Inline {
    let mut inlines = parse_inlines(content);
    if inlines.len() == 1 {
        inlines.remove(0)
    } else {
        Inline::Span(inlines)
    }
}

/// Parse markdown text into an AST Document.
///
/// The parser is lenient: unknown constructs are treated as paragraph
/// text, so it never fails.
pub fn parse(text: &str) -> Document {
    Parser::new().parse(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_inlines_simple() {
        let inlines = parse_inlines("Hello world");
        assert_eq!(inlines, vec![Inline::Text("Hello world".to_string())]);
    }

    #[test]
    fn test_parse_inlines_bold_with_colon() {
        let inlines = parse_inlines("**Name**: value");
        assert_eq!(inlines, vec![Inline::bold("Name"), Inline::text(": value")]);
    }

    #[test]
    fn test_parse_inlines_italic_and_link() {
        let inlines = parse_inlines("see *this* and [site](https://mtss.nsightz.com/launch)");
        assert_eq!(inlines[1], Inline::italic("this"));
        assert!(matches!(&inlines[3], Inline::Link(l) if l.url == "https://mtss.nsightz.com/launch"));
    }

    #[test]
    fn test_snake_case_is_not_italic() {
        let inlines = parse_inlines("file_name_here");
        assert_eq!(inlines, vec![Inline::text("file_name_here")]);
    }

    #[test]
    fn test_bold_wins_over_italic_at_same_position() {
        let inlines = parse_inlines("**Tier 1** *universal*");
        assert_eq!(inlines[0], Inline::bold("Tier 1"));
        assert_eq!(inlines[2], Inline::italic("universal"));
    }

    #[test]
    fn test_separator_detection() {
        let sep = vec!["---".to_string(), ":---:".to_string()];
        assert!(is_separator_row(&sep));
        assert!(!is_separator_row(&["--".to_string()]));
        assert!(!is_separator_row(&["a---".to_string()]));
    }

    #[test]
    fn test_split_table_cells_honors_escaped_pipe() {
        assert_eq!(split_table_cells("| x \\| y | 2 |"), vec!["x | y", "2"]);
        assert_eq!(split_table_cells("| a | b \\|"), vec!["a", "b |"]);
        assert_eq!(split_table_cells("|a|b|"), vec!["a", "b"]);
    }
}
