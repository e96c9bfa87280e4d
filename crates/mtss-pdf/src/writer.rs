//! PDF 1.4 serializer
//!
//! Writes laid-out pages with the two base-14 Helvetica faces, so no font
//! program is embedded. Text is encoded as WinAnsi, which covers the
//! typographic punctuation and the `©` and `•` glyphs the layout uses.

use std::io::Write;

use chrono::NaiveDateTime;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use mtss_core::Rgb;

use crate::error::Result;
use crate::layout::{DrawOp, FilledRect, Page, PageGeometry, TextRun};
use crate::metrics::PT_TO_MM;

/// Document information dictionary entries
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentInfo {
    pub title: String,
    pub created: NaiveDateTime,
}

/// PDF serializer
#[derive(Debug, Clone, Copy)]
pub struct PdfWriter {
    geometry: PageGeometry,
    compress: bool,
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self {
            geometry: PageGeometry::A4,
            compress: true,
        }
    }
}

/// Object numbers fixed by the writer
const CATALOG: usize = 1;
const PAGES: usize = 2;
const FONT_REGULAR: usize = 3;
const FONT_BOLD: usize = 4;
const INFO: usize = 5;
const FIRST_PAGE: usize = 6;

impl PdfWriter {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            ..Self::default()
        }
    }

    /// Flate-compress content streams (on by default)
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Serialize pages into a complete PDF file
    pub fn write(&self, pages: &[Page], info: &DocumentInfo) -> Result<Vec<u8>> {
        let mut out = ObjectWriter::default();
        out.buf.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

        out.begin(CATALOG);
        write!(out.buf, "<< /Type /Catalog /Pages {} 0 R >>", PAGES)?;
        out.end()?;

        let kids: Vec<String> = (0..pages.len())
            .map(|i| format!("{} 0 R", FIRST_PAGE + 2 * i))
            .collect();
        out.begin(PAGES);
        write!(
            out.buf,
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            pages.len()
        )?;
        out.end()?;

        for (id, base) in [(FONT_REGULAR, "Helvetica"), (FONT_BOLD, "Helvetica-Bold")] {
            out.begin(id);
            write!(
                out.buf,
                "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                base
            )?;
            out.end()?;
        }

        out.begin(INFO);
        out.buf.extend_from_slice(b"<< /Title ");
        write_string(&mut out.buf, &info.title);
        write!(
            out.buf,
            " /Producer (mtss-pdf {}) /CreationDate (D:{}) >>",
            env!("CARGO_PKG_VERSION"),
            info.created.format("%Y%m%d%H%M%S")
        )?;
        out.end()?;

        let width = self.geometry.width / PT_TO_MM;
        let height = self.geometry.height / PT_TO_MM;
        for (i, page) in pages.iter().enumerate() {
            let page_id = FIRST_PAGE + 2 * i;
            let content_id = page_id + 1;

            out.begin(page_id);
            write!(
                out.buf,
                "<< /Type /Page /Parent {} 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Resources << /Font << /F1 {} 0 R /F2 {} 0 R >> >> /Contents {} 0 R >>",
                PAGES, width, height, FONT_REGULAR, FONT_BOLD, content_id
            )?;
            out.end()?;

            let content = self.content_stream(page);
            let (data, filter) = if self.compress {
                let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(&content)?;
                (encoder.finish()?, " /Filter /FlateDecode")
            } else {
                (content, "")
            };
            out.begin(content_id);
            write!(out.buf, "<< /Length {}{} >>\nstream\n", data.len(), filter)?;
            out.buf.extend_from_slice(&data);
            out.buf.extend_from_slice(b"\nendstream");
            out.end()?;
        }

        let bytes = out.finish()?;
        tracing::debug!(pages = pages.len(), bytes = bytes.len(), "Wrote PDF");
        Ok(bytes)
    }

    /// Page drawing operators
    pub fn content_stream(&self, page: &Page) -> Vec<u8> {
        let mut stream = Vec::new();
        for op in page.ops() {
            match op {
                DrawOp::Rect(rect) => self.write_rect(&mut stream, rect),
                DrawOp::Text(run) => self.write_text(&mut stream, run),
            }
        }
        stream
    }

    fn write_rect(&self, stream: &mut Vec<u8>, rect: &FilledRect) {
        let y = self.geometry.height - rect.y - rect.height;
        stream.extend_from_slice(
            format!(
                "{} rg\n{} {} {} {} re f\n",
                color(rect.color),
                pt(rect.x),
                pt(y),
                pt(rect.width),
                pt(rect.height)
            )
            .as_bytes(),
        );
    }

    fn write_text(&self, stream: &mut Vec<u8>, run: &TextRun) {
        let font = if run.bold { "F2" } else { "F1" };
        stream.extend_from_slice(
            format!(
                "BT\n/{} {} Tf\n{} rg\n{} {} Td\n",
                font,
                num(run.size),
                color(run.color),
                pt(run.x),
                pt(self.geometry.height - run.y)
            )
            .as_bytes(),
        );
        write_string(stream, &run.text);
        stream.extend_from_slice(b" Tj\nET\n");
    }
}

/// Tracks object byte offsets for the cross-reference table
#[derive(Default)]
struct ObjectWriter {
    buf: Vec<u8>,
    offsets: Vec<(usize, usize)>,
}

impl ObjectWriter {
    fn begin(&mut self, id: usize) {
        self.offsets.push((id, self.buf.len()));
        self.buf
            .extend_from_slice(format!("{} 0 obj\n", id).as_bytes());
    }

    fn end(&mut self) -> std::io::Result<()> {
        self.buf.write_all(b"\nendobj\n")
    }

    fn finish(mut self) -> std::io::Result<Vec<u8>> {
        self.offsets.sort_unstable();
        let size = self.offsets.len() + 1;
        let xref = self.buf.len();

        write!(self.buf, "xref\n0 {}\n0000000000 65535 f \n", size)?;
        for (_, offset) in &self.offsets {
            write!(self.buf, "{:010} 00000 n \n", offset)?;
        }
        write!(
            self.buf,
            "trailer\n<< /Size {} /Root {} 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            size, CATALOG, INFO, xref
        )?;
        Ok(self.buf)
    }
}

/// Millimetres to points, two decimals
fn pt(mm: f32) -> String {
    num(mm / PT_TO_MM)
}

fn num(value: f32) -> String {
    let s = format!("{:.2}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

fn color(rgb: Rgb) -> String {
    let (r, g, b) = rgb.to_unit();
    format!("{} {} {}", num(r), num(g), num(b))
}

/// Write a literal string in WinAnsi encoding
fn write_string(out: &mut Vec<u8>, text: &str) {
    out.push(b'(');
    for byte in text.chars().map(win_ansi) {
        if matches!(byte, b'(' | b')' | b'\\') {
            out.push(b'\\');
        }
        out.push(byte);
    }
    out.push(b')');
}

/// WinAnsiEncoding byte for a character, `?` when it has none
pub fn win_ansi(c: char) -> u8 {
    match c {
        ' '..='~' => c as u8,
        '\u{a0}' => b' ',
        '€' => 0x80,
        '‚' => 0x82,
        '„' => 0x84,
        '…' => 0x85,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '™' => 0x99,
        '\u{a1}'..='\u{ff}' => c as u32 as u8,
        _ => b'?',
    }
}
