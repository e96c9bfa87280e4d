//! Pagination layout engine
//!
//! Lays normalized markdown out on A4 pages as absolute draw operations.
//! All coordinates are millimetres from the top-left corner of the page;
//! text `y` is the baseline.
//!
//! The engine keeps one cursor per call. Before any line is drawn it checks
//! that the line fits above the bottom margin and starts a new page first
//! if it does not, so no text ever lands in the footer area. Every new page
//! gets the header band as it is created; footers are drawn in a final pass
//! over all pages.

use chrono::NaiveDate;
use mtss_core::config::BrandingSettings;
use mtss_core::{ResourceType, Rgb};

use crate::blocks::{classify, PdfBlock};
use crate::error::Result;
use crate::metrics::TextMeasure;
use crate::spans::{parse_bold_spans, strip_bold, TextSpan};
use crate::wrap::{wrap_spans, WrappedLine};

pub const BODY_SIZE: f32 = 11.0;
pub const HEADER_SIZE: f32 = 12.0;
pub const FOOTER_SIZE: f32 = 8.0;

/// Height of the colored header band
pub const HEADER_BAND: f32 = 15.0;

const HEADING_GAP: f32 = 5.0;
const HEADING_LINE: f32 = 8.0;
const BODY_LINE: f32 = 7.0;
const PARAGRAPH_GAP: f32 = 3.0;
const TABLE_ROW: f32 = 8.0;
const TABLE_GAP: f32 = 5.0;
const CELL_PADDING: f32 = 2.0;
const BULLET_INDENT: f32 = 5.0;
const WRAP_INDENT: f32 = 10.0;

/// Page margins in millimetres
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 20.0,
            bottom: 20.0,
            left: 15.0,
            right: 15.0,
        }
    }
}

/// Page size and margins
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margins: Margins,
}

impl PageGeometry {
    pub const A4: PageGeometry = PageGeometry {
        width: 210.0,
        height: 297.0,
        margins: Margins {
            top: 20.0,
            bottom: 20.0,
            left: 15.0,
            right: 15.0,
        },
    };

    /// Width available between the side margins
    pub fn content_width(&self) -> f32 {
        self.width - self.margins.left - self.margins.right
    }

    /// Lowest baseline any body line may use
    pub fn bottom_limit(&self) -> f32 {
        self.height - self.margins.bottom
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::A4
    }
}

/// Header and footer text drawn on every page
#[derive(Debug, Clone, PartialEq)]
pub struct PageDecoration {
    /// e.g. `Nsightz MTSS Intervention Menu`
    pub title: String,
    pub generated_on: NaiveDate,
    pub copyright: String,
    pub promo: String,
    pub band_color: Rgb,
}

impl PageDecoration {
    pub fn from_branding(
        resource_type: ResourceType,
        branding: &BrandingSettings,
        generated_on: NaiveDate,
    ) -> Result<Self> {
        Ok(Self {
            title: resource_type.header_title(&branding.organization),
            generated_on,
            copyright: branding.copyright.clone(),
            promo: branding.promo.clone(),
            band_color: branding.primary()?,
        })
    }

    /// Left header text for page `number`
    pub fn header_text(&self, number: usize) -> String {
        format!("{} - Page {}", self.title, number)
    }

    /// Right header text, e.g. `Generated on: March 5, 2025`
    pub fn date_text(&self) -> String {
        format!("Generated on: {}", self.generated_on.format("%B %-d, %Y"))
    }
}

/// A positioned text run
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub bold: bool,
    pub color: Rgb,
    pub text: String,
}

/// A filled rectangle, `y` is its top edge
#[derive(Debug, Clone, PartialEq)]
pub struct FilledRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: Rgb,
}

/// Draw operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text(TextRun),
    Rect(FilledRect),
}

impl DrawOp {
    pub fn as_text(&self) -> Option<&TextRun> {
        match self {
            DrawOp::Text(run) => Some(run),
            DrawOp::Rect(_) => None,
        }
    }
}

/// One laid-out page
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    /// 1-based page number
    pub number: usize,
    pub header: Vec<DrawOp>,
    pub body: Vec<DrawOp>,
    pub footer: Vec<DrawOp>,
}

impl Page {
    /// Header, body and footer operations in drawing order
    pub fn ops(&self) -> impl Iterator<Item = &DrawOp> {
        self.header.iter().chain(&self.body).chain(&self.footer)
    }

    pub fn body_text(&self) -> impl Iterator<Item = &TextRun> {
        self.body.iter().filter_map(DrawOp::as_text)
    }
}

/// Current page and vertical offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutCursor {
    /// Index into the page list
    pub page: usize,
    pub y: f32,
}

/// Paginating layout engine
pub struct LayoutEngine<'a> {
    metrics: &'a dyn TextMeasure,
    geometry: PageGeometry,
    decoration: PageDecoration,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(metrics: &'a dyn TextMeasure, decoration: PageDecoration) -> Self {
        Self {
            metrics,
            geometry: PageGeometry::A4,
            decoration,
        }
    }

    pub fn with_geometry(mut self, geometry: PageGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn decoration(&self) -> &PageDecoration {
        &self.decoration
    }

    /// Lay out markdown into pages, each with one header and one footer
    pub fn layout(&self, markdown: &str) -> Vec<Page> {
        let mut state = LayoutState {
            engine: self,
            pages: Vec::new(),
            cursor: LayoutCursor {
                page: 0,
                y: self.geometry.margins.top,
            },
        };
        state.new_page();

        let blocks = classify(markdown);
        for block in &blocks {
            match block {
                PdfBlock::Heading { level, text } => state.heading(*level, text),
                PdfBlock::List(items) => state.list(items),
                PdfBlock::Table(rows) => state.table(rows),
                PdfBlock::Paragraph(text) => state.paragraph(text),
            }
        }

        let mut pages = state.pages;
        self.draw_footers(&mut pages);
        tracing::debug!(blocks = blocks.len(), pages = pages.len(), "Laid out document");
        pages
    }

    /// Draw the footer band on every page, replacing any earlier footer
    pub fn draw_footers(&self, pages: &mut [Page]) {
        for page in pages.iter_mut() {
            page.footer = self.footer_ops();
        }
    }

    fn header_ops(&self, number: usize) -> Vec<DrawOp> {
        let d = &self.decoration;
        let date = d.date_text();
        let date_width = self.metrics.text_width(&date, HEADER_SIZE, true);
        vec![
            DrawOp::Rect(FilledRect {
                x: 0.0,
                y: 0.0,
                width: self.geometry.width,
                height: HEADER_BAND,
                color: d.band_color,
            }),
            DrawOp::Text(TextRun {
                x: 10.0,
                y: 10.0,
                size: HEADER_SIZE,
                bold: true,
                color: Rgb::WHITE,
                text: d.header_text(number),
            }),
            DrawOp::Text(TextRun {
                x: self.geometry.width - 10.0 - date_width,
                y: 10.0,
                size: HEADER_SIZE,
                bold: true,
                color: Rgb::WHITE,
                text: date,
            }),
        ]
    }

    fn footer_ops(&self) -> Vec<DrawOp> {
        let d = &self.decoration;
        let h = self.geometry.height;
        [(&d.copyright, h - 10.0), (&d.promo, h - 6.0)]
            .into_iter()
            .filter(|(text, _)| !text.is_empty())
            .map(|(text, y)| {
                let width = self.metrics.text_width(text, FOOTER_SIZE, false);
                DrawOp::Text(TextRun {
                    x: (self.geometry.width - width) / 2.0,
                    y,
                    size: FOOTER_SIZE,
                    bold: false,
                    color: Rgb::BLACK,
                    text: text.clone(),
                })
            })
            .collect()
    }
}

/// Per-call mutable state
struct LayoutState<'e, 'a> {
    engine: &'e LayoutEngine<'a>,
    pages: Vec<Page>,
    cursor: LayoutCursor,
}

impl LayoutState<'_, '_> {
    fn geometry(&self) -> &PageGeometry {
        &self.engine.geometry
    }

    fn new_page(&mut self) {
        let number = self.pages.len() + 1;
        self.pages.push(Page {
            number,
            header: self.engine.header_ops(number),
            body: Vec::new(),
            footer: Vec::new(),
        });
        self.cursor = LayoutCursor {
            page: number - 1,
            y: self.geometry().margins.top,
        };
    }

    /// Start a new page unless `height` more fits above the bottom margin
    ///
    /// A fresh page is never abandoned, so content taller than a page
    /// cannot loop.
    fn ensure_space(&mut self, height: f32) {
        let fresh = self.cursor.y <= self.geometry().margins.top
            && self.pages[self.cursor.page].body.is_empty();
        if self.cursor.y + height > self.geometry().bottom_limit() && !fresh {
            self.new_page();
        }
    }

    fn push(&mut self, op: DrawOp) {
        self.pages[self.cursor.page].body.push(op);
    }

    fn draw_line(&mut self, line: &WrappedLine, x: f32, size: f32) {
        let mut x = x;
        let y = self.cursor.y;
        for segment in &line.segments {
            self.push(DrawOp::Text(TextRun {
                x,
                y,
                size,
                bold: segment.bold,
                color: Rgb::BLACK,
                text: segment.text.clone(),
            }));
            x += self
                .engine
                .metrics
                .text_width(&segment.text, size, segment.bold);
        }
    }

    fn heading(&mut self, level: usize, text: &str) {
        let size = match level {
            1 => 16.0,
            2 => 14.0,
            3 => 12.0,
            _ => 11.0,
        };
        self.cursor.y += HEADING_GAP;

        let spans = [TextSpan::bold(strip_bold(text))];
        let width = self.geometry().content_width();
        let lines = wrap_spans(&spans, self.engine.metrics, size, width, width);
        let left = self.geometry().margins.left;
        for line in &lines {
            self.ensure_space(HEADING_LINE);
            self.draw_line(line, left, size);
            self.cursor.y += HEADING_LINE;
        }
    }

    fn list(&mut self, items: &[String]) {
        let left = self.geometry().margins.left;
        let content = self.geometry().content_width();
        for item in items {
            let spans = parse_bold_spans(item);
            let lines = wrap_spans(
                &spans,
                self.engine.metrics,
                BODY_SIZE,
                content - BULLET_INDENT,
                content - WRAP_INDENT,
            );
            for (i, line) in lines.iter().enumerate() {
                self.ensure_space(BODY_LINE);
                if i == 0 {
                    self.push(DrawOp::Text(TextRun {
                        x: left,
                        y: self.cursor.y,
                        size: BODY_SIZE,
                        bold: false,
                        color: Rgb::BLACK,
                        text: "•".to_string(),
                    }));
                    self.draw_line(line, left + BULLET_INDENT, BODY_SIZE);
                } else {
                    self.draw_line(line, left + WRAP_INDENT, BODY_SIZE);
                }
                self.cursor.y += BODY_LINE;
            }
        }
    }

    fn table(&mut self, rows: &[Vec<String>]) {
        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        if columns == 0 {
            return;
        }
        let widths = self.column_widths(rows, columns);

        self.ensure_space(rows.len() as f32 * TABLE_ROW + TABLE_GAP);

        let left = self.geometry().margins.left;
        for (r, row) in rows.iter().enumerate() {
            let header = r == 0;
            let cells: Vec<Vec<WrappedLine>> = row
                .iter()
                .zip(&widths)
                .map(|(cell, width)| {
                    let mut spans = parse_bold_spans(cell);
                    if header {
                        spans.iter_mut().for_each(|s| s.bold = true);
                    }
                    let max = (width - CELL_PADDING).max(0.0);
                    wrap_spans(&spans, self.engine.metrics, BODY_SIZE, max, max)
                })
                .collect();

            let line_count = cells.iter().map(Vec::len).max().unwrap_or(0).max(1);
            self.ensure_space(line_count as f32 * BODY_LINE);

            // A row taller than the page continues on the next one
            for i in 0..line_count {
                self.ensure_space(BODY_LINE);
                let mut x = left;
                for (lines, width) in cells.iter().zip(&widths) {
                    if let Some(line) = lines.get(i) {
                        self.draw_line(line, x, BODY_SIZE);
                    }
                    x += width;
                }
                self.cursor.y += BODY_LINE;
            }
            self.cursor.y += TABLE_ROW - BODY_LINE;
        }
        self.cursor.y += TABLE_GAP;
    }

    /// Widest measured cell per column, scaled to the content width
    fn column_widths(&self, rows: &[Vec<String>], columns: usize) -> Vec<f32> {
        let mut widths = vec![0.0_f32; columns];
        for row in rows {
            for (i, cell) in row.iter().enumerate() {
                let w = self
                    .engine
                    .metrics
                    .text_width(&strip_bold(cell), BODY_SIZE, false);
                widths[i] = widths[i].max(w);
            }
        }

        let available = self.geometry().content_width();
        let total: f32 = widths.iter().sum();
        if total <= 0.0 {
            return vec![available / columns as f32; columns];
        }
        let scale = available / total;
        widths.iter().map(|w| w * scale).collect()
    }

    fn paragraph(&mut self, text: &str) {
        let spans = parse_bold_spans(text);
        let width = self.geometry().content_width();
        let lines = wrap_spans(&spans, self.engine.metrics, BODY_SIZE, width, width);
        if lines.is_empty() {
            return;
        }
        let left = self.geometry().margins.left;
        for line in &lines {
            self.ensure_space(BODY_LINE);
            self.draw_line(line, left, BODY_SIZE);
            self.cursor.y += BODY_LINE;
        }
        self.cursor.y += PARAGRAPH_GAP;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{HelveticaMetrics, MonospaceMetrics};

    fn decoration() -> PageDecoration {
        PageDecoration::from_branding(
            ResourceType::InterventionMenu,
            &BrandingSettings::default(),
            NaiveDate::from_ymd_opt(2025, 3, 5).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_header_text() {
        let d = decoration();
        assert_eq!(d.header_text(2), "Nsightz MTSS Intervention Menu - Page 2");
        assert_eq!(d.date_text(), "Generated on: March 5, 2025");
    }

    #[test]
    fn test_first_line_starts_at_top_margin() {
        let metrics = MonospaceMetrics::default();
        let engine = LayoutEngine::new(&metrics, decoration());
        let pages = engine.layout("Hello");
        let run = pages[0].body_text().next().unwrap();
        assert_eq!(run.y, 20.0);
        assert_eq!(run.x, 15.0);
    }

    #[test]
    fn test_heading_sizes_and_spacing() {
        let metrics = MonospaceMetrics::default();
        let engine = LayoutEngine::new(&metrics, decoration());
        let pages = engine.layout("# One\n\n## Two\n\n### Three\n\n##### Five");
        let runs: Vec<&TextRun> = pages[0].body_text().collect();
        let sizes: Vec<f32> = runs.iter().map(|r| r.size).collect();
        assert_eq!(sizes, vec![16.0, 14.0, 12.0, 11.0]);
        assert!(runs.iter().all(|r| r.bold));
        // 5 before each heading, 8 per line
        assert_eq!(runs[0].y, 25.0);
        assert_eq!(runs[1].y, 38.0);
    }

    #[test]
    fn test_list_bullets_and_indent() {
        let metrics = MonospaceMetrics::default();
        let engine = LayoutEngine::new(&metrics, decoration());
        let pages = engine.layout("- **CICO**: daily\n- WOOP");
        let runs: Vec<&TextRun> = pages[0].body_text().collect();
        assert_eq!(runs[0].text, "•");
        assert_eq!(runs[1].text, "CICO:");
        assert!(runs[1].bold);
        assert_eq!(runs[1].x, 20.0);
        assert_eq!(runs[2].text, " daily");
        assert!(!runs[2].bold);
        assert_eq!(runs[3].text, "•");
        assert_eq!(runs[3].y, runs[0].y + 7.0);
    }

    #[test]
    fn test_table_columns_fill_content_width() {
        let metrics = MonospaceMetrics::default();
        let engine = LayoutEngine::new(&metrics, decoration());
        let pages = engine.layout("| Name | Tier |\n| --- | --- |\n| WOOP | 1 |");
        let runs: Vec<&TextRun> = pages[0].body_text().collect();
        let header: Vec<&&TextRun> = runs.iter().filter(|r| r.y == 20.0).collect();
        assert_eq!(header.len(), 2);
        assert!(header.iter().all(|r| r.bold));
        // Both columns are four characters wide, so they split evenly
        assert!((header[1].x - 105.0).abs() < 1e-3);
        let body: Vec<&&TextRun> = runs.iter().filter(|r| r.y == 28.0).collect();
        assert_eq!(body.len(), 2);
        assert!(body.iter().all(|r| !r.bold));
    }

    #[test]
    fn test_footer_pass_is_idempotent() {
        let metrics = MonospaceMetrics::default();
        let engine = LayoutEngine::new(&metrics, decoration());
        let mut pages = engine.layout("Text");
        let once = pages.clone();
        engine.draw_footers(&mut pages);
        engine.draw_footers(&mut pages);
        assert_eq!(pages, once);
        assert_eq!(pages[0].footer.len(), 2);
    }

    #[test]
    fn test_footer_positions() {
        let metrics = MonospaceMetrics::default();
        let engine = LayoutEngine::new(&metrics, decoration());
        let pages = engine.layout("Text");
        let footer: Vec<&TextRun> = pages[0].footer.iter().filter_map(DrawOp::as_text).collect();
        assert_eq!(footer[0].y, 287.0);
        assert_eq!(footer[1].y, 291.0);
        assert_eq!(footer[0].text, "© 2025 Nsightz Inc. All Rights Reserved");
        assert_eq!(footer[0].size, 8.0);
    }

    #[test]
    fn test_oversized_table_does_not_loop() {
        let metrics = MonospaceMetrics::default();
        let engine = LayoutEngine::new(&metrics, decoration());
        let mut md = String::from("| A |\n| --- |\n");
        for i in 0..60 {
            md.push_str(&format!("| row {} |\n", i));
        }
        let pages = engine.layout(&md);
        assert!(pages.len() >= 2);
        let limit = engine.geometry().bottom_limit();
        for page in &pages {
            assert!(page.body_text().all(|r| r.y <= limit));
        }
    }

    #[test]
    fn test_tall_row_continues_on_next_page() {
        let metrics = HelveticaMetrics;
        let engine = LayoutEngine::new(&metrics, decoration());
        let long = "word ".repeat(900);
        let md = format!(
            "| Strategy | Notes |\n| --- | --- |\n| {} | {} |\n",
            long.trim(),
            long.trim()
        );
        let pages = engine.layout(&md);
        assert!(pages.len() >= 3);

        let limit = engine.geometry().bottom_limit();
        let mut words = 0;
        for page in &pages {
            for run in page.body_text() {
                assert!(run.y <= limit, "line at {} below {}", run.y, limit);
                words += run.text.split_whitespace().filter(|w| *w == "word").count();
            }
        }
        // Nothing is dropped from either cell
        assert_eq!(words, 1800);
    }
}
