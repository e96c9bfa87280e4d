//! Markdown to HTML renderer
//!
//! Produces a display-only HTML fragment with the theme applied as inline
//! styles, so the fragment looks the same wherever it is embedded.

use std::fmt::Write;

use mtss_ast::{Block, Document, FormatType, Heading, Inline, List, ListType, Paragraph, Table};

use crate::theme::Theme;

/// Themed HTML renderer
pub struct HtmlRenderer {
    theme: Theme,
    output: String,
}

impl HtmlRenderer {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            output: String::new(),
        }
    }

    /// Render a document to an HTML fragment, one block per line group
    pub fn render(&mut self, doc: &Document) -> String {
        self.output.clear();
        for block in &doc.blocks {
            self.render_block(block);
        }
        std::mem::take(&mut self.output)
    }

    fn render_block(&mut self, block: &Block) {
        match block {
            Block::Heading(h) => self.render_heading(h),
            Block::Paragraph(p) => self.render_paragraph(p),
            Block::List(l) => self.render_list(l),
            Block::Table(t) => self.render_table(t),
        }
    }

    fn render_heading(&mut self, heading: &Heading) {
        let level = heading.level.clamp(1, 6);
        let inner = inlines_html(&heading.text);
        writeln!(
            self.output,
            "<h{level} style=\"{}\">{}</h{level}>",
            self.theme.heading_style(level),
            inner,
        )
        .unwrap();
    }

    fn render_paragraph(&mut self, para: &Paragraph) {
        writeln!(self.output, "<p>{}</p>", inlines_html(&para.inlines)).unwrap();
    }

    fn render_list(&mut self, list: &List) {
        let tag = match list.list_type {
            ListType::Unordered => "ul",
            ListType::Ordered => "ol",
        };
        writeln!(self.output, "<{}>", tag).unwrap();
        for item in &list.items {
            writeln!(self.output, "<li>{}</li>", inlines_html(&item.inlines)).unwrap();
        }
        writeln!(self.output, "</{}>", tag).unwrap();
    }

    fn render_table(&mut self, table: &Table) {
        writeln!(
            self.output,
            "<table style=\"{}\">",
            self.theme.table_style()
        )
        .unwrap();

        let th_style = self.theme.th_style();
        let td_style = self.theme.td_style();
        let header = table.header();

        if let Some(row) = header {
            writeln!(self.output, "<thead>").unwrap();
            self.open_row(0);
            for cell in &row.cells {
                write!(
                    self.output,
                    "<th style=\"{}\">{}</th>",
                    th_style,
                    inlines_html(&cell.inlines)
                )
                .unwrap();
            }
            writeln!(self.output, "</tr>").unwrap();
            writeln!(self.output, "</thead>").unwrap();
        }

        writeln!(self.output, "<tbody>").unwrap();
        let offset = usize::from(header.is_some());
        for (i, row) in table.body().iter().enumerate() {
            self.open_row(i + offset);
            for cell in &row.cells {
                write!(
                    self.output,
                    "<td style=\"{}\">{}</td>",
                    td_style,
                    inlines_html(&cell.inlines)
                )
                .unwrap();
            }
            writeln!(self.output, "</tr>").unwrap();
        }
        writeln!(self.output, "</tbody>").unwrap();
        writeln!(self.output, "</table>").unwrap();
    }

    fn open_row(&mut self, index: usize) {
        match self.theme.row_style(index) {
            Some(style) => write!(self.output, "<tr style=\"{}\">", style).unwrap(),
            None => write!(self.output, "<tr>").unwrap(),
        }
    }
}

fn inlines_html(inlines: &[Inline]) -> String {
    let mut out = String::new();
    for inline in inlines {
        write_inline(&mut out, inline);
    }
    out
}

fn write_inline(out: &mut String, inline: &Inline) {
    match inline {
        Inline::Text(text) => out.push_str(&escape(text)),
        Inline::Format(format_type, inner) => {
            let tag = match format_type {
                FormatType::Bold => "strong",
                FormatType::Italic => "em",
            };
            write!(out, "<{}>", tag).unwrap();
            write_inline(out, inner);
            write!(out, "</{}>", tag).unwrap();
        }
        Inline::Span(inlines) => {
            for inner in inlines {
                write_inline(out, inner);
            }
        }
        Inline::Link(link) => {
            write!(out, "<a href=\"{}\">", escape(&link.url)).unwrap();
            for inner in &link.text {
                write_inline(out, inner);
            }
            out.push_str("</a>");
        }
    }
}

/// Escape text for element content and double-quoted attributes
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render a document with the given theme
pub fn render_document(doc: &Document, theme: &Theme) -> String {
    HtmlRenderer::new(*theme).render(doc)
}

/// Parse markdown and render it with the given theme
pub fn render_html(markdown: &str, theme: &Theme) -> String {
    render_document(&mtss_core::parse(markdown), theme)
}
