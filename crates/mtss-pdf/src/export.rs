//! PDF export
//!
//! Assembled markdown goes through the themed HTML preview and the
//! normalizer before layout, so a PDF always matches what the preview
//! shows, including any edits made there.

use chrono::{Local, NaiveDate};
use mtss_core::{ExportArtifact, ResourceDocument, ResourceType, Settings};
use mtss_html::{normalize, render_html, Theme};

use crate::error::{PdfError, Result};
use crate::layout::{LayoutEngine, PageDecoration};
use crate::metrics::{HelveticaMetrics, TextMeasure};
use crate::writer::{DocumentInfo, PdfWriter};

/// Options for a PDF export
#[derive(Debug, Clone, Copy)]
pub struct ExportOptions {
    /// Flate-compress page content
    pub compress: bool,
    /// Date shown in page headers; today when unset
    pub generated_on: Option<NaiveDate>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            compress: true,
            generated_on: None,
        }
    }
}

/// Lay out and serialize markdown with the given metrics
pub fn render_pdf_with(
    markdown: &str,
    decoration: PageDecoration,
    metrics: &dyn TextMeasure,
    writer: &PdfWriter,
) -> Result<Vec<u8>> {
    if markdown.trim().is_empty() {
        return Err(PdfError::EmptyDocument);
    }
    let info = DocumentInfo {
        title: decoration.title.clone(),
        created: Local::now().naive_local(),
    };
    let engine = LayoutEngine::new(metrics, decoration);
    let pages = engine.layout(markdown);
    writer.write(&pages, &info)
}

/// Lay out and serialize markdown in Helvetica on A4
pub fn render_pdf(markdown: &str, decoration: PageDecoration) -> Result<Vec<u8>> {
    render_pdf_with(markdown, decoration, &HelveticaMetrics, &PdfWriter::default())
}

/// Export a preview, possibly hand-edited, as a PDF file
pub fn export_preview_pdf(
    preview_html: &str,
    resource_type: ResourceType,
    settings: &Settings,
    options: &ExportOptions,
) -> Result<ExportArtifact> {
    let markdown = normalize(preview_html)?;
    let generated_on = options
        .generated_on
        .unwrap_or_else(|| Local::now().date_naive());
    let decoration = PageDecoration::from_branding(resource_type, &settings.branding, generated_on)?;
    let writer = PdfWriter::default().with_compression(options.compress);

    let bytes = render_pdf_with(&markdown, decoration, &HelveticaMetrics, &writer)?;
    tracing::info!(
        resource_type = %resource_type,
        bytes = bytes.len(),
        "Exported PDF"
    );
    Ok(ExportArtifact::new(
        resource_type.filename("pdf"),
        bytes,
        ExportArtifact::PDF_MIME,
    ))
}

/// Export an assembled resource as a PDF file with custom options
pub fn export_pdf_with(
    doc: &ResourceDocument,
    settings: &Settings,
    options: &ExportOptions,
) -> Result<ExportArtifact> {
    let theme = Theme::from_branding(&settings.branding)?;
    let preview = render_html(&doc.markdown, &theme);
    export_preview_pdf(&preview, doc.resource_type, settings, options)
}

/// Export an assembled resource as a PDF file
pub fn export_pdf(doc: &ResourceDocument, settings: &Settings) -> Result<ExportArtifact> {
    export_pdf_with(doc, settings, &ExportOptions::default())
}
