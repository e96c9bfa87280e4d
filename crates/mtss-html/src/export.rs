//! Standalone HTML export
//!
//! Wraps a rendered resource in a complete HTML document with an embedded
//! stylesheet and the branding footer, ready to upload into a web document
//! editor.

use std::fmt::Write;

use mtss_core::config::BrandingSettings;
use mtss_core::{ExportArtifact, ResourceDocument, ResourceType, Settings};

use crate::error::Result;
use crate::normalizer::normalize;
use crate::renderer::{escape, render_html};
use crate::theme::Theme;

/// Shown to the user after an HTML export
pub const IMPORT_INSTRUCTIONS: &str = "File downloaded successfully!

To import to Google Docs:
1. Go to drive.google.com
2. Click \"New\" > \"File upload\"
3. Select the downloaded HTML file
4. Right-click the file > \"Open with\" > \"Google Docs\"

The document will maintain all formatting, including:
• Headers and styling
• Tables and lists
• Bold and italic text
• Custom colors and spacing";

/// Build a complete HTML document around rendered markdown
pub fn standalone_document(
    markdown: &str,
    title: &str,
    theme: &Theme,
    branding: &BrandingSettings,
) -> String {
    let body = render_html(markdown, theme);
    let mut out = String::new();

    writeln!(out, "<!DOCTYPE html>").unwrap();
    writeln!(out, "<html>").unwrap();
    writeln!(out, "<head>").unwrap();
    writeln!(out, "<meta charset=\"UTF-8\">").unwrap();
    writeln!(out, "<title>{}</title>", escape(title)).unwrap();
    writeln!(out, "<style>").unwrap();
    out.push_str(&theme.stylesheet());
    writeln!(out, "</style>").unwrap();
    writeln!(out, "</head>").unwrap();
    writeln!(out, "<body>").unwrap();
    out.push_str(&body);
    writeln!(out, "<div class=\"footer\">").unwrap();
    writeln!(out, "  <p>{}</p>", escape(&branding.copyright)).unwrap();
    if !branding.promo.is_empty() {
        writeln!(out, "  <p>{}</p>", escape(&branding.promo)).unwrap();
    }
    writeln!(out, "</div>").unwrap();
    writeln!(out, "</body>").unwrap();
    writeln!(out, "</html>").unwrap();
    out
}

/// Export an assembled resource as a standalone HTML file
pub fn export_html(doc: &ResourceDocument, settings: &Settings) -> Result<ExportArtifact> {
    let theme = Theme::from_branding(&settings.branding)?;
    let title = doc
        .resource_type
        .header_title(&settings.branding.organization);
    let html = standalone_document(&doc.markdown, &title, &theme, &settings.branding);

    tracing::info!(
        resource_type = %doc.resource_type,
        bytes = html.len(),
        "Exported HTML"
    );
    Ok(ExportArtifact::new(
        doc.filename("html"),
        html.into_bytes(),
        ExportArtifact::HTML_MIME,
    ))
}

/// Export an edited preview: normalize it first, then package it
pub fn export_preview(
    preview_html: &str,
    resource_type: ResourceType,
    settings: &Settings,
) -> Result<ExportArtifact> {
    let markdown = normalize(preview_html)?;
    export_html(&ResourceDocument::new(resource_type, markdown), settings)
}
