//! Block classification of normalized markdown
//!
//! The layout engine works on blank-line separated blocks, classified in
//! priority order: heading, list, table, paragraph. Anything that matches
//! no pattern is laid out as a paragraph.

use mtss_core::parser::{is_separator_row, split_table_cells};

/// A classified markdown block
#[derive(Debug, Clone, PartialEq)]
pub enum PdfBlock {
    /// `#` count and trimmed text
    Heading { level: usize, text: String },
    /// Item text with the `- ` marker removed
    List(Vec<String>),
    /// Cell text per row, separator rows removed; the first row is the header
    Table(Vec<Vec<String>>),
    /// Lines joined with single spaces
    Paragraph(String),
}

/// Split markdown into blocks and classify each one
pub fn classify(markdown: &str) -> Vec<PdfBlock> {
    let mut blocks = Vec::new();
    for group in split_blocks(markdown) {
        classify_group(&group, &mut blocks);
    }
    blocks
}

/// Group non-blank lines; blank or whitespace-only lines separate blocks
fn split_blocks(markdown: &str) -> Vec<Vec<&str>> {
    let mut groups = Vec::new();
    let mut current = Vec::new();
    for line in markdown.lines() {
        let line = line.trim_end();
        if line.trim().is_empty() {
            if !current.is_empty() {
                groups.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        groups.push(current);
    }
    groups
}

fn classify_group(lines: &[&str], blocks: &mut Vec<PdfBlock>) {
    let Some(first) = lines.first() else {
        return;
    };
    let first = first.trim_start();

    if first.starts_with('#') {
        let level = first.chars().take_while(|&c| c == '#').count();
        let text = first[level..].trim().to_string();
        blocks.push(PdfBlock::Heading { level, text });
        // Lines under a heading without a blank line form their own block
        if lines.len() > 1 {
            classify_group(&lines[1..], blocks);
        }
        return;
    }

    if first.starts_with("- ") {
        blocks.push(PdfBlock::List(list_items(lines)));
        return;
    }

    if lines.iter().any(|l| l.contains('|')) {
        let rows = table_rows(lines);
        if !rows.is_empty() {
            blocks.push(PdfBlock::Table(rows));
            return;
        }
    }

    let text = lines
        .iter()
        .map(|l| l.trim())
        .collect::<Vec<_>>()
        .join(" ");
    blocks.push(PdfBlock::Paragraph(text));
}

fn list_items(lines: &[&str]) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();
    for line in lines {
        let line = line.trim();
        match line.strip_prefix('-') {
            Some(rest) => items.push(rest.trim().to_string()),
            None => match items.last_mut() {
                // Continuation of the previous item
                Some(last) => {
                    last.push(' ');
                    last.push_str(line);
                }
                None => items.push(line.to_string()),
            },
        }
    }
    items.retain(|item| !item.is_empty());
    items
}

fn table_rows(lines: &[&str]) -> Vec<Vec<String>> {
    lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| l.starts_with('|'))
        .map(split_table_cells)
        .filter(|cells| !is_separator_row(cells))
        .collect()
}
