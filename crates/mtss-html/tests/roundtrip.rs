//! Render then normalize: the markdown must survive the trip

use mtss_core::{finalize, parse, ResourceType};
use mtss_html::{normalize, read_html, render_html, Theme};

fn roundtrip(markdown: &str) -> String {
    let html = render_html(markdown, &Theme::default());
    normalize(&html).unwrap()
}

#[test]
fn test_bare_table_from_preview() {
    let html = "<table><tr><th>A</th><th>B</th></tr><tr><td>1</td><td>2</td></tr></table>";
    assert_eq!(normalize(html).unwrap(), "| A | B |\n| --- | --- |\n| 1 | 2 |\n");
}

#[test]
fn test_hand_edited_entities_and_comparisons() {
    let html = "<p>caf&eacute; &copy; 2025 &mdash; x</p><p>5 < 6 and 7 > 3</p>";
    assert_eq!(
        normalize(html).unwrap(),
        "café © 2025 — x\n\n5 < 6 and 7 > 3\n"
    );
}

#[test]
fn test_escaped_pipe_survives_preview() {
    let markdown = "| Tool | Use |\n| --- | --- |\n| x \\| y | 2 |\n";
    assert_eq!(roundtrip(markdown), markdown);
}

#[test]
fn test_assembled_menu_roundtrip() {
    let body = "## Tier 1: Universal Supports\n\n\
                Evidence-based strategies for **all students**.\n\n\
                - **2X10 Relationship Building**: two minutes a day for ten days\n\
                - **WOOP**: *wish*, outcome, obstacle, plan\n\n\
                ## Tier 2\n\n\
                | Intervention | Domain | Grades |\n\
                | --- | --- | --- |\n\
                | CICO | Behavior | K-12 |\n\
                | Sight Word Practice | Academic | PK-3 |\n\n\
                #### Notes\n\n\
                Review data every *two* weeks.";
    let markdown = finalize(ResourceType::InterventionMenu, "K-12", body);

    let normalized = roundtrip(&markdown);

    assert_eq!(normalized, format!("{}\n", markdown.trim_end()));
    assert_eq!(parse(&normalized), parse(&markdown));
}

#[test]
fn test_roundtrip_is_stable() {
    let markdown = "# Student Intervention Plan\n\n- **Student Name:** [Student Name]\n- Goal\n";
    let once = roundtrip(markdown);
    let twice = roundtrip(&once);
    assert_eq!(once, twice);
}

#[test]
fn test_hand_edited_preview() {
    let html = "<H2 style=\"color: red\">Edited&nbsp;Heading</H2>\n\
                <P>First line<BR>second line</P>\n\
                <div>Typed straight into the preview</div>\n\
                <ul><li>Kept <I>item</I></li></ul>";
    let md = normalize(html).unwrap();
    assert_eq!(
        md,
        "## Edited Heading\n\n\
         First line second line\n\n\
         Typed straight into the preview\n\n\
         - Kept *item*\n"
    );
}

#[test]
fn test_header_row_is_kept_as_first_row() {
    let html = render_html("| Tier | Focus |\n| --- | --- |\n| 1 | All |", &Theme::default());
    let doc = read_html(&html).unwrap();
    match &doc.blocks[0] {
        mtss_ast::Block::Table(table) => {
            assert!(table.rows[0].is_header);
            assert_eq!(table.rows[1].cells[1].plain_text(), "All");
        }
        other => panic!("Expected table, got {:?}", other),
    }
}
