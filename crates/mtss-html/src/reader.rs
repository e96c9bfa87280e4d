//! HTML reader
//!
//! Reads rendered (and possibly hand-edited) HTML back into a
//! `mtss_ast::Document`. The tokenizer is quick-xml with end-name checks
//! off, so HTML void elements and omitted end tags are tolerated.
//!
//! Emphasis elements become `Inline::Format` nodes inside whatever block
//! contains them, so bold and italic survive inside headings, list items
//! and table cells. Nested lists are flattened into the outer list; loose
//! text outside any block becomes a paragraph.

use std::borrow::Cow;

use mtss_ast::{
    Block, Document, FormatType, Heading, Inline, Link, List, ListItem, ListType, Paragraph,
    Table, TableCell, TableRow,
};
use quick_xml::escape::resolve_html5_entity;
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::Reader;

use crate::error::{HtmlError, Result};

/// Block currently collecting inline content
#[derive(Debug)]
enum Capture {
    Heading(u8),
    Paragraph,
    ListItem,
    Cell { header: bool },
}

/// An open emphasis or link element
#[derive(Debug)]
struct InlineFrame {
    kind: FrameKind,
    inlines: Vec<Inline>,
}

#[derive(Debug, Clone, PartialEq)]
enum FrameKind {
    Format(FormatType),
    Link(String),
}

#[derive(Debug, Default)]
struct TableBuilder {
    rows: Vec<TableRow>,
    row: Option<Vec<(TableCell, bool)>>,
    in_head: bool,
}

/// HTML to AST reader
#[derive(Default)]
struct HtmlReader {
    blocks: Vec<Block>,
    capture: Option<(Capture, Vec<Inline>)>,
    frames: Vec<InlineFrame>,
    list: Option<List>,
    list_depth: usize,
    table: Option<TableBuilder>,
    skip_depth: usize,
}

impl HtmlReader {
    fn read(mut self, html: &str) -> Result<Document> {
        let html = escape_stray_lt(html);
        let mut reader = Reader::from_str(&html);
        let config = reader.config_mut();
        config.trim_text(false);
        config.check_end_names = false;
        config.allow_unmatched_ends = true;

        loop {
            let position = reader.buffer_position();
            match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    let name = element_name(e);
                    if is_void(&name) {
                        self.empty_element(&name);
                    } else {
                        self.start_element(&name, e);
                    }
                }
                Ok(Event::Empty(ref e)) => {
                    let name = element_name(e);
                    self.empty_element(&name);
                }
                Ok(Event::End(ref e)) => {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).to_ascii_lowercase();
                    self.end_element(&name);
                }
                Ok(Event::Text(ref e)) => {
                    let text = decode_text(e);
                    self.text(&text);
                }
                Ok(Event::CData(ref e)) => {
                    let text = String::from_utf8_lossy(&e[..]).into_owned();
                    self.text(&text);
                }
                Ok(Event::Eof) => break,
                Err(source) => {
                    return Err(HtmlError::Parse {
                        position: position as u64,
                        source,
                    })
                }
                _ => {}
            }
        }

        self.close_all();
        Ok(Document::from_blocks(self.blocks))
    }

    fn start_element(&mut self, name: &str, e: &BytesStart) {
        if self.skip_depth > 0 || matches!(name, "head" | "style" | "script" | "title") {
            self.skip_depth += 1;
            return;
        }

        match name {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                if self.in_container() {
                    self.separate();
                } else {
                    let level = name[1..].parse().unwrap_or(1);
                    self.begin(Capture::Heading(level));
                }
            }
            "p" => {
                // Paragraphs inside list items and cells only separate text
                if self.in_container() {
                    self.separate();
                } else {
                    self.begin(Capture::Paragraph);
                }
            }
            "ul" | "ol" => {
                let list_type = if name == "ol" {
                    ListType::Ordered
                } else {
                    ListType::Unordered
                };
                if self.list_depth == 0 {
                    self.finish_capture();
                    self.list = Some(List {
                        list_type,
                        items: Vec::new(),
                    });
                } else {
                    // Nested list: close the parent item so children follow it
                    self.finish_list_item();
                }
                self.list_depth += 1;
            }
            "li" => {
                self.finish_list_item();
                if self.list.is_none() {
                    self.finish_capture();
                    self.list = Some(List {
                        list_type: ListType::Unordered,
                        items: Vec::new(),
                    });
                }
                self.capture = Some((Capture::ListItem, Vec::new()));
            }
            "table" => {
                self.finish_capture();
                self.finish_list();
                self.table = Some(TableBuilder::default());
            }
            "thead" => {
                if let Some(table) = self.table.as_mut() {
                    table.in_head = true;
                }
            }
            "tbody" | "tfoot" => {
                if let Some(table) = self.table.as_mut() {
                    table.in_head = false;
                }
            }
            "tr" => {
                self.finish_cell();
                self.finish_row();
                if let Some(table) = self.table.as_mut() {
                    table.row = Some(Vec::new());
                }
            }
            "th" | "td" => {
                self.finish_cell();
                if let Some(table) = self.table.as_mut() {
                    let in_head = table.in_head;
                    table.row.get_or_insert_with(Vec::new);
                    self.capture = Some((
                        Capture::Cell {
                            header: name == "th" || in_head,
                        },
                        Vec::new(),
                    ));
                }
            }
            "strong" | "b" => self.push_frame(FrameKind::Format(FormatType::Bold)),
            "em" | "i" => self.push_frame(FrameKind::Format(FormatType::Italic)),
            "a" => {
                let href = e
                    .try_get_attribute("href")
                    .ok()
                    .flatten()
                    .map(|a| unescape_lenient(&String::from_utf8_lossy(&a.value)))
                    .unwrap_or_default();
                self.push_frame(FrameKind::Link(href));
            }
            "div" | "section" | "article" | "blockquote" => {
                if !self.in_container() {
                    self.finish_capture();
                }
            }
            _ => {}
        }
    }

    fn end_element(&mut self, name: &str) {
        if self.skip_depth > 0 {
            if matches!(name, "head" | "style" | "script" | "title") || self.skip_depth > 1 {
                self.skip_depth -= 1;
            }
            return;
        }

        match name {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "p" => {
                if !self.in_container() {
                    self.finish_capture();
                }
            }
            "li" => self.finish_list_item(),
            "ul" | "ol" => {
                self.finish_list_item();
                self.list_depth = self.list_depth.saturating_sub(1);
                if self.list_depth == 0 {
                    self.finish_list();
                }
            }
            "th" | "td" => self.finish_cell(),
            "tr" => {
                self.finish_cell();
                self.finish_row();
            }
            "thead" => {
                if let Some(table) = self.table.as_mut() {
                    table.in_head = false;
                }
            }
            "table" => self.finish_table(),
            "strong" | "b" => self.pop_frame(&FrameKind::Format(FormatType::Bold)),
            "em" | "i" => self.pop_frame(&FrameKind::Format(FormatType::Italic)),
            "a" => {
                if let Some(pos) = self
                    .frames
                    .iter()
                    .rposition(|f| matches!(f.kind, FrameKind::Link(_)))
                {
                    self.close_frames_from(pos);
                }
            }
            "div" | "section" | "article" | "blockquote" => {
                if !self.in_container() {
                    self.finish_capture();
                }
            }
            _ => {}
        }
    }

    fn empty_element(&mut self, name: &str) {
        if self.skip_depth > 0 {
            return;
        }
        match name {
            "br" => self.push_inline(Inline::Text(" ".to_string())),
            "hr" => {
                if !self.in_container() {
                    self.finish_capture();
                }
            }
            "td" | "th" => {
                self.start_element(name, &BytesStart::new(name.to_string()));
                self.finish_cell();
            }
            _ => {}
        }
    }

    fn text(&mut self, raw: &str) {
        if self.skip_depth > 0 {
            return;
        }
        let text = collapse_whitespace(raw);
        if text.is_empty() {
            return;
        }
        if self.capture.is_none() {
            if text.trim().is_empty() {
                return;
            }
            // Text between table cells or list items has no home
            if self.table.is_some() || self.list.is_some() {
                return;
            }
            self.capture = Some((Capture::Paragraph, Vec::new()));
        }
        self.push_inline(Inline::Text(text));
    }

    fn in_container(&self) -> bool {
        matches!(
            self.capture,
            Some((Capture::ListItem | Capture::Cell { .. }, _))
        )
    }

    fn begin(&mut self, capture: Capture) {
        self.finish_capture();
        self.capture = Some((capture, Vec::new()));
    }

    /// Separate two text runs inside the same capture
    fn separate(&mut self) {
        if let Some((_, inlines)) = self.capture.as_ref() {
            if !inlines.is_empty() {
                self.push_inline(Inline::Text(" ".to_string()));
            }
        }
    }

    fn push_inline(&mut self, inline: Inline) {
        if let Some(frame) = self.frames.last_mut() {
            frame.inlines.push(inline);
        } else if let Some((_, inlines)) = self.capture.as_mut() {
            inlines.push(inline);
        }
    }

    fn push_frame(&mut self, kind: FrameKind) {
        if self.capture.is_none() && self.table.is_none() && self.list.is_none() {
            self.capture = Some((Capture::Paragraph, Vec::new()));
        }
        self.frames.push(InlineFrame {
            kind,
            inlines: Vec::new(),
        });
    }

    fn pop_frame(&mut self, kind: &FrameKind) {
        if let Some(pos) = self.frames.iter().rposition(|f| &f.kind == kind) {
            self.close_frames_from(pos);
        }
    }

    /// Close every frame at or above `pos`, innermost first
    fn close_frames_from(&mut self, pos: usize) {
        while self.frames.len() > pos {
            let Some(frame) = self.frames.pop() else {
                break;
            };
            let inline = match frame.kind {
                FrameKind::Format(format_type) => {
                    if frame.inlines.is_empty() {
                        continue;
                    }
                    Inline::Format(format_type, Box::new(merge_inner(frame.inlines)))
                }
                FrameKind::Link(url) => Inline::Link(Link {
                    url,
                    text: merge_text(frame.inlines),
                }),
            };
            self.push_inline(inline);
        }
    }

    fn take_capture(&mut self) -> Option<(Capture, Vec<Inline>)> {
        self.close_frames_from(0);
        self.capture
            .take()
            .map(|(capture, inlines)| (capture, trim_inlines(merge_text(inlines))))
    }

    fn finish_capture(&mut self) {
        match self.capture {
            Some((Capture::Heading(_) | Capture::Paragraph, _)) => {}
            _ => return,
        }
        let Some((capture, inlines)) = self.take_capture() else {
            return;
        };
        if inlines.iter().all(Inline::is_blank) {
            return;
        }
        match capture {
            Capture::Heading(level) => {
                self.blocks.push(Block::Heading(Heading {
                    level,
                    text: inlines,
                }));
            }
            _ => self.blocks.push(Block::Paragraph(Paragraph::new(inlines))),
        }
    }

    fn finish_list_item(&mut self) {
        if !matches!(self.capture, Some((Capture::ListItem, _))) {
            return;
        }
        if let Some((_, inlines)) = self.take_capture() {
            if let Some(list) = self.list.as_mut() {
                if !inlines.iter().all(Inline::is_blank) {
                    list.items.push(ListItem::new(inlines));
                }
            }
        }
    }

    fn finish_list(&mut self) {
        self.finish_list_item();
        self.list_depth = 0;
        if let Some(list) = self.list.take() {
            if !list.items.is_empty() {
                self.blocks.push(Block::List(list));
            }
        }
    }

    fn finish_cell(&mut self) {
        if !matches!(self.capture, Some((Capture::Cell { .. }, _))) {
            return;
        }
        if let Some((Capture::Cell { header }, inlines)) = self.take_capture() {
            if let Some(row) = self.table.as_mut().and_then(|t| t.row.as_mut()) {
                row.push((TableCell { inlines }, header));
            }
        }
    }

    fn finish_row(&mut self) {
        if let Some(table) = self.table.as_mut() {
            if let Some(cells) = table.row.take() {
                if cells.is_empty() {
                    return;
                }
                let is_header = table.rows.is_empty() && cells.iter().all(|(_, h)| *h);
                table.rows.push(TableRow {
                    cells: cells.into_iter().map(|(c, _)| c).collect(),
                    is_header,
                });
            }
        }
    }

    fn finish_table(&mut self) {
        self.finish_cell();
        self.finish_row();
        if let Some(table) = self.table.take() {
            if !table.rows.is_empty() {
                self.blocks.push(Block::Table(Table { rows: table.rows }));
            }
        }
    }

    fn close_all(&mut self) {
        self.finish_capture();
        self.finish_list();
        self.finish_table();
        // A stray capture (cell or item with no container) becomes a paragraph
        if let Some((_, inlines)) = self.take_capture() {
            if !inlines.iter().all(Inline::is_blank) {
                self.blocks.push(Block::Paragraph(Paragraph::new(inlines)));
            }
        }
    }
}

fn element_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).to_ascii_lowercase()
}

fn is_void(name: &str) -> bool {
    matches!(
        name,
        "br" | "hr" | "img" | "meta" | "link" | "input" | "col" | "wbr" | "source"
    )
}

fn decode_text(e: &BytesText) -> String {
    unescape_lenient(&String::from_utf8_lossy(&e[..]))
}

/// Escape every `<` that cannot open a tag, so `5 < 6` stays text
fn escape_stray_lt(html: &str) -> Cow<'_, str> {
    let opens_tag = |rest: &str| {
        rest.chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'))
    };
    let stray = html
        .match_indices('<')
        .any(|(i, _)| !opens_tag(&html[i + 1..]));
    if !stray {
        return Cow::Borrowed(html);
    }

    let mut out = String::with_capacity(html.len() + 8);
    for (i, c) in html.char_indices() {
        if c == '<' && !opens_tag(&html[i + 1..]) {
            out.push_str("&lt;");
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

/// Resolve character and HTML5 named references, keeping unknown ones
/// (and bare ampersands) as literal text
fn unescape_lenient(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let resolved = after
            .find(';')
            .filter(|&end| end > 0 && end <= 32)
            .and_then(|end| resolve_reference(&after[..end]).map(|text| (text, end)));
        match resolved {
            Some((text, end)) => {
                out.push_str(&text);
                rest = &after[end + 1..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn resolve_reference(name: &str) -> Option<Cow<'static, str>> {
    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix('x').or_else(|| number.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse().ok()?,
        };
        return char::from_u32(code).map(|c| Cow::Owned(c.to_string()));
    }
    match name {
        // Markdown has no use for a non-breaking space
        "nbsp" => Some(Cow::Borrowed(" ")),
        _ => resolve_html5_entity(name).map(Cow::Borrowed),
    }
}

/// Collapse runs of whitespace to a single space, as HTML rendering does
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// Merge adjacent text runs and collapse doubled spaces at their joins
fn merge_text(inlines: Vec<Inline>) -> Vec<Inline> {
    let mut out: Vec<Inline> = Vec::with_capacity(inlines.len());
    for inline in inlines {
        match (out.last_mut(), inline) {
            (Some(Inline::Text(prev)), Inline::Text(next)) => {
                if prev.ends_with(' ') && next.starts_with(' ') {
                    prev.push_str(&next[1..]);
                } else {
                    prev.push_str(&next);
                }
            }
            (_, inline) => out.push(inline),
        }
    }
    out
}

fn merge_inner(inlines: Vec<Inline>) -> Inline {
    let mut merged = merge_text(inlines);
    if merged.len() == 1 {
        merged.remove(0)
    } else {
        Inline::Span(merged)
    }
}

/// Trim leading whitespace of the first run and trailing of the last
fn trim_inlines(mut inlines: Vec<Inline>) -> Vec<Inline> {
    if let Some(Inline::Text(first)) = inlines.first_mut() {
        *first = first.trim_start().to_string();
    }
    if let Some(Inline::Text(last)) = inlines.last_mut() {
        *last = last.trim_end().to_string();
    }
    inlines.retain(|i| !matches!(i, Inline::Text(t) if t.is_empty()));
    inlines
}

/// Read an HTML document or fragment into a document AST
pub fn read_html(html: &str) -> Result<Document> {
    let doc = HtmlReader::default().read(html)?;
    tracing::debug!(blocks = doc.blocks.len(), "Read HTML");
    Ok(doc)
}
