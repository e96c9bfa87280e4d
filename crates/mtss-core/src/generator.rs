//! Markdown Generator
//!
//! Converts a `mtss_ast::Document` back into the markdown subset the
//! pagination engine reads.
//!
//! # Example
//!
//! ```
//! use mtss_ast::{Block, Document, Heading};
//! use mtss_core::generate;
//!
//! let mut doc = Document::new();
//! doc.push(Block::Heading(Heading::new(2, "Tier 1")));
//!
//! assert_eq!(generate(&doc), "## Tier 1");
//! ```

use std::fmt::Write;

use mtss_ast::{Block, Document, FormatType, Heading, Inline, List, ListType, Paragraph, Table};

/// Markdown generator configuration
#[derive(Debug, Clone, Default)]
pub struct GeneratorConfig {
    /// Write ordered lists as `1.`, `2.`; otherwise every list uses `- `
    pub numbered_lists: bool,
}

/// Markdown generator
pub struct MarkdownGenerator {
    config: GeneratorConfig,
    output: String,
}

impl Default for MarkdownGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownGenerator {
    /// Create a new generator with default configuration
    pub fn new() -> Self {
        Self::with_config(GeneratorConfig::default())
    }

    /// Create a generator with custom configuration
    pub fn with_config(config: GeneratorConfig) -> Self {
        Self {
            config,
            output: String::new(),
        }
    }

    /// Generate markdown from a document
    ///
    /// Blocks are separated by one blank line; trailing whitespace is
    /// trimmed.
    pub fn generate(&mut self, doc: &Document) -> String {
        self.output.clear();

        for (i, block) in doc.blocks.iter().enumerate() {
            if i > 0 {
                writeln!(self.output).unwrap();
            }
            self.generate_block(block);
        }

        self.output.trim_end().to_string()
    }

    fn generate_block(&mut self, block: &Block) {
        match block {
            Block::Heading(h) => self.generate_heading(h),
            Block::Paragraph(p) => self.generate_paragraph(p),
            Block::List(l) => self.generate_list(l),
            Block::Table(t) => self.generate_table(t),
        }
    }

    fn generate_heading(&mut self, heading: &Heading) {
        let level = heading.level.clamp(1, 6) as usize;
        write!(self.output, "{} ", "#".repeat(level)).unwrap();
        let text = self.inline_text(&heading.text);
        writeln!(self.output, "{}", text.trim()).unwrap();
    }

    fn generate_paragraph(&mut self, para: &Paragraph) {
        let text = self.inline_text(&para.inlines);
        writeln!(self.output, "{}", text.trim()).unwrap();
    }

    fn generate_list(&mut self, list: &List) {
        for (i, item) in list.items.iter().enumerate() {
            let text = self.inline_text(&item.inlines);
            match (list.list_type, self.config.numbered_lists) {
                (ListType::Ordered, true) => {
                    writeln!(self.output, "{}. {}", i + 1, text.trim()).unwrap()
                }
                _ => writeln!(self.output, "- {}", text.trim()).unwrap(),
            }
        }
    }

    /// First row is written as the header, followed by a separator sized
    /// to its column count.
    fn generate_table(&mut self, table: &Table) {
        let Some((first, rest)) = table.rows.split_first() else {
            return;
        };

        let header: Vec<String> = first
            .cells
            .iter()
            .map(|c| self.inline_text(&c.inlines))
            .collect();
        self.write_row(&header);
        let separator = vec!["---".to_string(); header.len().max(1)];
        self.write_row(&separator);

        for row in rest {
            let cells: Vec<String> = row
                .cells
                .iter()
                .map(|c| self.inline_text(&c.inlines))
                .collect();
            self.write_row(&cells);
        }
    }

    fn write_row(&mut self, cells: &[String]) {
        write!(self.output, "|").unwrap();
        for cell in cells {
            write!(self.output, " {} |", cell.trim().replace('|', "\\|")).unwrap();
        }
        writeln!(self.output).unwrap();
    }

    fn inline_text(&self, inlines: &[Inline]) -> String {
        let mut out = String::new();
        for inline in inlines {
            write_inline(&mut out, inline);
        }
        out
    }
}

fn write_inline(out: &mut String, inline: &Inline) {
    match inline {
        Inline::Text(text) => out.push_str(text),
        Inline::Format(format_type, inner) => {
            let marker = match format_type {
                FormatType::Bold => "**",
                FormatType::Italic => "*",
            };
            // Emphasis markers must hug the text, so surrounding spaces
            // move outside the markers
            let mut inner_text = String::new();
            write_inline(&mut inner_text, inner);
            let trimmed = inner_text.trim();
            if trimmed.is_empty() {
                out.push_str(&inner_text);
                return;
            }
            let lead = &inner_text[..inner_text.len() - inner_text.trim_start().len()];
            let trail = &inner_text[inner_text.trim_end().len()..];
            write!(out, "{}{}{}{}{}", lead, marker, trimmed, marker, trail).unwrap();
        }
        Inline::Span(inlines) => {
            for inner in inlines {
                write_inline(out, inner);
            }
        }
        Inline::Link(link) => {
            out.push('[');
            for inner in &link.text {
                write_inline(out, inner);
            }
            write!(out, "]({})", link.url).unwrap();
        }
    }
}

/// Generate markdown with the default configuration
pub fn generate(doc: &Document) -> String {
    MarkdownGenerator::new().generate(doc)
}

/// Generate markdown with a custom configuration
pub fn generate_with_config(doc: &Document, config: GeneratorConfig) -> String {
    MarkdownGenerator::with_config(config).generate(doc)
}
