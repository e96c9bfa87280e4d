//! Pagination invariants and the end-to-end export path

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use mtss_core::config::BrandingSettings;
use mtss_core::{
    DocumentAssembler, GenerationError, GenerationRequest, ResourceType, Session, Settings,
    TextGenerator,
};
use mtss_html::{normalize, render_html, Theme};
use mtss_pdf::{
    export_pdf_with, DrawOp, ExportOptions, LayoutEngine, MonospaceMetrics, Page,
    PageDecoration, TextRun,
};

const COPYRIGHT: &str = "© 2025 Nsightz Inc. All Rights Reserved";

fn decoration(resource_type: ResourceType) -> PageDecoration {
    PageDecoration::from_branding(
        resource_type,
        &BrandingSettings::default(),
        NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
    )
    .unwrap()
}

fn header_title(page: &Page) -> String {
    page.header
        .iter()
        .filter_map(DrawOp::as_text)
        .next()
        .map(|run| run.text.clone())
        .unwrap()
}

fn footer_texts(page: &Page) -> Vec<String> {
    page.footer
        .iter()
        .filter_map(DrawOp::as_text)
        .map(|run| run.text.clone())
        .collect()
}

fn long_document() -> String {
    let mut md = String::from("# MTSS Intervention Menu\n\n");
    for tier in 1..=3 {
        md.push_str(&format!("## Tier {}\n\n", tier));
        for i in 0..12 {
            md.push_str(&format!(
                "- **Strategy {}**: a practice described at enough length that the \
                 item wraps onto a second line in the list column\n",
                i
            ));
        }
        md.push_str("\n| Intervention | Domain | Grades |\n| --- | --- | --- |\n");
        for i in 0..6 {
            md.push_str(&format!("| Strategy {} | Behavior | K-12 |\n", i));
        }
        md.push_str("\nProgress is reviewed every two weeks with the team.\n\n");
    }
    md
}

#[test]
fn test_no_line_below_bottom_margin() {
    let metrics = MonospaceMetrics::default();
    let engine = LayoutEngine::new(&metrics, decoration(ResourceType::InterventionMenu));
    let pages = engine.layout(&long_document());

    assert!(pages.len() > 1);
    let limit = engine.geometry().bottom_limit();
    let top = engine.geometry().margins.top;
    for page in &pages {
        for run in page.body_text() {
            assert!(run.y <= limit, "page {} has text at {}", page.number, run.y);
            assert!(run.y >= top);
        }
    }
}

#[test]
fn test_every_page_has_one_header_and_one_footer() {
    let metrics = MonospaceMetrics::default();
    let engine = LayoutEngine::new(&metrics, decoration(ResourceType::InterventionMenu));
    let mut pages = engine.layout(&long_document());
    engine.draw_footers(&mut pages);

    for (i, page) in pages.iter().enumerate() {
        assert_eq!(page.number, i + 1);
        let bands = page
            .header
            .iter()
            .filter(|op| matches!(op, DrawOp::Rect(_)))
            .count();
        assert_eq!(bands, 1);
        assert_eq!(
            header_title(page),
            format!("Nsightz MTSS Intervention Menu - Page {}", i + 1)
        );
        let footer = footer_texts(page);
        assert_eq!(footer.iter().filter(|t| t.as_str() == COPYRIGHT).count(), 1);
    }
}

#[test]
fn test_overflow_page_from_last_block_gets_footer() {
    let metrics = MonospaceMetrics::default();
    let engine = LayoutEngine::new(&metrics, decoration(ResourceType::StudentPlan));
    // One paragraph long enough to spill onto a new page by itself
    let paragraph = vec!["word"; 2500].join(" ");
    let pages = engine.layout(&paragraph);

    assert!(pages.len() >= 2);
    let last = pages.last().unwrap();
    assert!(last.body_text().count() > 0);
    assert!(footer_texts(last).contains(&COPYRIGHT.to_string()));
}

#[test]
fn test_heading_near_bottom_moves_to_next_page() {
    let metrics = MonospaceMetrics::default();
    let engine = LayoutEngine::new(&metrics, decoration(ResourceType::ProgressMonitoring));
    // 25 one-line paragraphs leave the cursor at 270, too low for a heading
    let mut md = String::new();
    for i in 0..25 {
        md.push_str(&format!("Line {}\n\n", i));
    }
    md.push_str("## Roles");
    let pages = engine.layout(&md);

    let heading: &TextRun = pages
        .iter()
        .flat_map(|p| p.body_text())
        .find(|r| r.text == "Roles")
        .unwrap();
    assert!(heading.y <= engine.geometry().bottom_limit());
    assert_eq!(heading.size, 14.0);
}

#[test]
fn test_preview_roundtrip_keeps_pdf_content() {
    let markdown = "# Student Intervention Plan\n\n\
                    **School Level:** Elementary\n\n\
                    - **Goal**: read 90 words per minute\n\n\
                    | Week | Score |\n| --- | --- |\n| 1 | 62 |";
    let normalized = normalize(&render_html(markdown, &Theme::default())).unwrap();

    let metrics = MonospaceMetrics::default();
    let engine = LayoutEngine::new(&metrics, decoration(ResourceType::StudentPlan));
    let direct: Vec<String> = engine.layout(markdown)[0]
        .body_text()
        .map(|r| r.text.clone())
        .collect();
    let via_preview: Vec<String> = engine.layout(&normalized)[0]
        .body_text()
        .map(|r| r.text.clone())
        .collect();
    assert_eq!(direct, via_preview);
    assert!(direct.contains(&"School Level:".to_string()));
    assert!(direct.contains(&"Goal:".to_string()));
}

/// Always returns the same body
struct FixedGenerator {
    body: String,
    calls: Mutex<usize>,
}

#[async_trait]
impl TextGenerator for FixedGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String, GenerationError> {
        *self.calls.lock().unwrap() += 1;
        Ok(self.body.clone())
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

#[tokio::test]
async fn test_intervention_menu_end_to_end() {
    let generator = std::sync::Arc::new(FixedGenerator {
        body: long_document(),
        calls: Mutex::new(0),
    });
    let assembler = DocumentAssembler::new(generator.clone());

    let mut session = Session::new("K-12").with_resource_type(ResourceType::InterventionMenu);
    session.push_user("I need an intervention menu");
    session.push_assistant("Which domains?");
    session.push_user("Behavior, all tiers");

    let doc = assembler.assemble(&session).await.unwrap();
    let first_line = doc.markdown.lines().next().unwrap();
    assert!(first_line.starts_with("# "));
    assert!(first_line.contains("Intervention Menu"));
    assert_eq!(*generator.calls.lock().unwrap(), 1);

    let options = ExportOptions {
        compress: false,
        generated_on: NaiveDate::from_ymd_opt(2025, 9, 1),
    };
    let artifact = export_pdf_with(&doc, &Settings::default(), &options).unwrap();
    assert_eq!(artifact.filename, "Nsightz_Intervention_Menu.pdf");

    let text = String::from_utf8_lossy(&artifact.bytes);
    let pages = text.matches("/Type /Page ").count();
    assert!(pages >= 1);
    for n in 1..=pages {
        assert!(text.contains(&format!("(Nsightz MTSS Intervention Menu - Page {}) Tj", n)));
    }
    assert!(text.contains("(Generated on: September 1, 2025) Tj"));
    // One copyright line per page
    assert_eq!(text.matches("2025 Nsightz Inc. All Rights Reserved) Tj").count(), pages);
}
