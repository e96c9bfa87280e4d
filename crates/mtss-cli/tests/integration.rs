//! Integration tests for the mtss CLI
//!
//! These drive the command functions against files in a temp directory:
//! markdown -> PDF/HTML, preview HTML -> markdown, and a full generate run
//! against a canned text generator.

use std::fs;
use std::sync::Arc;

use async_trait::async_trait;
use mtss_cli::{
    build_session, catalog_listing, generate_command, normalize_command, render_command,
    ExportFormat, OutputFormat, RenderFormat,
};
use mtss_core::{ChatService, GenerationError, GenerationRequest, ResourceType, Settings, TextGenerator};
use mtss_html::render_html;
use mtss_html::Theme;
use mtss_pdf::ExportOptions;
use tempfile::TempDir;

const MENU: &str = "# MTSS Intervention Menu\n\n\
## Tier 1\n\n\
- **Check-In/Check-Out**: daily mentor contact\n\
- **WOOP**: goal setting\n\n\
| Intervention | Domain |\n| --- | --- |\n| WOOP | Behavior |\n";

fn uncompressed() -> ExportOptions {
    ExportOptions {
        compress: false,
        generated_on: None,
    }
}

#[test]
fn test_render_markdown_to_pdf() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("menu.md");
    fs::write(&input, MENU).unwrap();
    let out = dir.path().join("out");

    let written = render_command(
        input.to_str().unwrap(),
        RenderFormat::Pdf,
        ResourceType::InterventionMenu,
        &out,
        &Settings::default(),
        &uncompressed(),
    )
    .unwrap();

    assert_eq!(written, vec![out.join("menu.pdf")]);
    let bytes = fs::read(&written[0]).unwrap();
    assert!(bytes.starts_with(b"%PDF-1.4"));
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains("(Nsightz MTSS Intervention Menu - Page 1) Tj"));
    assert!(text.contains("(Check-In/Check-Out:) Tj"));
}

#[test]
fn test_render_preview_to_html() {
    let dir = TempDir::new().unwrap();
    let theme = Theme::default();
    let input = dir.path().join("edited.html");
    let preview = render_html(MENU, &theme).replace("goal setting", "goal setting, edited");
    fs::write(&input, preview).unwrap();
    let out = dir.path().join("out");

    let written = render_command(
        input.to_str().unwrap(),
        RenderFormat::Html,
        ResourceType::InterventionMenu,
        &out,
        &Settings::default(),
        &uncompressed(),
    )
    .unwrap();

    let html = fs::read_to_string(&written[0]).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("goal setting, edited"));
    assert!(html.contains("<title>Nsightz MTSS Intervention Menu</title>"));
}

#[test]
fn test_render_glob_writes_one_file_per_input() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.md"), "# A\n\nFirst").unwrap();
    fs::write(dir.path().join("b.md"), "# B\n\nSecond").unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
    let out = dir.path().join("out");

    let pattern = dir.path().join("*.md");
    let mut written = render_command(
        pattern.to_str().unwrap(),
        RenderFormat::Html,
        ResourceType::StudentPlan,
        &out,
        &Settings::default(),
        &uncompressed(),
    )
    .unwrap();
    written.sort();

    assert_eq!(written, vec![out.join("a.html"), out.join("b.html")]);
}

#[test]
fn test_render_missing_input() {
    let dir = TempDir::new().unwrap();
    let pattern = dir.path().join("nothing-*.md");
    let err = render_command(
        pattern.to_str().unwrap(),
        RenderFormat::Pdf,
        ResourceType::InterventionMenu,
        dir.path(),
        &Settings::default(),
        &uncompressed(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("Input file not found"));
}

#[test]
fn test_normalize_command_writes_markdown() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("table.html");
    fs::write(
        &input,
        "<table><tr><th>A</th><th>B</th></tr><tr><td>1</td><td>2</td></tr></table>",
    )
    .unwrap();
    let output = dir.path().join("table.md");

    normalize_command(&input, Some(&output)).unwrap();

    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "| A | B |\n| --- | --- |\n| 1 | 2 |\n"
    );
}

#[test]
fn test_normalize_missing_input() {
    let dir = TempDir::new().unwrap();
    let err = normalize_command(&dir.path().join("gone.html"), None).unwrap_err();
    assert!(err.to_string().contains("Input file not found"));
}

#[test]
fn test_catalog_listing_filters() {
    let text = catalog_listing(Some(3), None, None, OutputFormat::Text).unwrap();
    assert!(!text.contains("- WOOP "));
    assert!(text.contains("intervention(s)"));

    let json = catalog_listing(None, Some("behavior"), Some("K"), OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(value.as_array().is_some_and(|a| !a.is_empty()));
}

#[test]
fn test_catalog_listing_full_json() {
    let json = catalog_listing(None, None, None, OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(value["interventions"].is_array());
}

#[test]
fn test_catalog_listing_rejects_bad_filters() {
    assert!(catalog_listing(Some(4), None, None, OutputFormat::Text).is_err());
    assert!(catalog_listing(None, Some("music"), None, OutputFormat::Text).is_err());
    assert!(catalog_listing(None, None, Some("13"), OutputFormat::Text).is_err());
}

struct CannedGenerator;

#[async_trait]
impl TextGenerator for CannedGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String, GenerationError> {
        Ok("# Draft\n\n## Tier 1\n\n- **WOOP**: goal setting".to_string())
    }

    fn name(&self) -> &str {
        "canned"
    }
}

#[tokio::test]
async fn test_generate_writes_all_formats() {
    let dir = TempDir::new().unwrap();
    let service = ChatService::new(Arc::new(CannedGenerator));
    let session = build_session(
        None,
        &["Create an intervention menu for behavior".to_string()],
        None,
        "Middle School",
    )
    .unwrap();

    let mut written = generate_command(
        &service,
        &Settings::default(),
        session,
        ExportFormat::All,
        dir.path(),
        &uncompressed(),
    )
    .await
    .unwrap();
    written.sort();

    assert_eq!(
        written,
        vec![
            dir.path().join("Nsightz_Intervention_Menu.html"),
            dir.path().join("Nsightz_Intervention_Menu.md"),
            dir.path().join("Nsightz_Intervention_Menu.pdf"),
        ]
    );
    let markdown = fs::read_to_string(dir.path().join("Nsightz_Intervention_Menu.md")).unwrap();
    assert_eq!(
        markdown,
        "# MTSS Intervention Menu\n\n**School Level:** Middle School\n\n\
## Tier 1\n\n- **WOOP**: goal setting\n"
    );
}

#[tokio::test]
async fn test_generate_from_saved_transcript() {
    let dir = TempDir::new().unwrap();
    let mut saved = mtss_core::Session::new("K-12").with_resource_type(ResourceType::StudentPlan);
    saved.push_user("Plan for a student struggling with reading");
    saved.push_assistant("What grade is the student in?");
    let path = dir.path().join("session.json");
    fs::write(&path, saved.to_json().unwrap()).unwrap();

    let session = build_session(Some(&path), &["Grade 3".to_string()], None, "ignored").unwrap();
    assert_eq!(session.id, saved.id);
    assert_eq!(session.resource_type, ResourceType::StudentPlan);
    assert_eq!(session.transcript().len(), 3);

    let service = ChatService::new(Arc::new(CannedGenerator));
    let written = generate_command(
        &service,
        &Settings::default(),
        session,
        ExportFormat::Pdf,
        dir.path(),
        &ExportOptions::default(),
    )
    .await
    .unwrap();
    assert_eq!(
        written,
        vec![dir.path().join("Nsightz_Student_Intervention_Plan.pdf")]
    );
}
