//! Markdown parser and generator tests
//!
//! Covers the block subset the assembler produces and the
//! parse-then-generate round trip the pagination engine relies on.

use mtss_ast::{Block, FormatType, Inline, ListType};
use mtss_core::{generate, parse};

#[test]
fn test_headings_set_levels_and_title() {
    let doc = parse("# Student Intervention Plan\n\n## Goals\n\n#### Notes");

    assert_eq!(
        doc.metadata.title,
        Some("Student Intervention Plan".to_string())
    );
    let levels: Vec<u8> = doc
        .blocks
        .iter()
        .map(|b| match b {
            Block::Heading(h) => h.level,
            other => panic!("Expected heading, got {:?}", other),
        })
        .collect();
    assert_eq!(levels, vec![1, 2, 4]);
}

#[test]
fn test_paragraph_lines_are_joined() {
    let doc = parse("First line\nsecond line\n\nNext paragraph");
    assert_eq!(doc.len(), 2);
    match &doc.blocks[0] {
        Block::Paragraph(p) => {
            assert_eq!(p.inlines, vec![Inline::text("First line second line")]);
        }
        other => panic!("Expected paragraph, got {:?}", other),
    }
}

#[test]
fn test_unordered_list_with_bold_labels() {
    let doc = parse("- **Frequency:** Daily\n- **Duration:** 10 minutes\n* Star marker");
    assert_eq!(doc.len(), 1);
    match &doc.blocks[0] {
        Block::List(list) => {
            assert_eq!(list.list_type, ListType::Unordered);
            assert_eq!(list.items.len(), 3);
            assert!(matches!(
                &list.items[0].inlines[0],
                Inline::Format(FormatType::Bold, _)
            ));
        }
        other => panic!("Expected list, got {:?}", other),
    }
}

#[test]
fn test_ordered_list_then_paragraph() {
    let doc = parse("1. Greet\n2. Check in\n\nAfter the list");
    match &doc.blocks[0] {
        Block::List(list) => assert_eq!(list.list_type, ListType::Ordered),
        other => panic!("Expected list, got {:?}", other),
    }
    assert!(matches!(doc.blocks[1], Block::Paragraph(_)));
}

#[test]
fn test_list_continuation_line() {
    let doc = parse("- Meet with the student\n  every morning\n- Review goals");
    match &doc.blocks[0] {
        Block::List(list) => {
            assert_eq!(
                list.items[0].inlines,
                vec![Inline::text("Meet with the student every morning")]
            );
        }
        other => panic!("Expected list, got {:?}", other),
    }
}

#[test]
fn test_table_with_header_separator() {
    let doc = parse("| Tier | Intervention |\n|------|:------------:|\n| 1 | WOOP |\n| 2 | CICO |");
    match &doc.blocks[0] {
        Block::Table(table) => {
            assert_eq!(table.rows.len(), 3);
            assert!(table.rows[0].is_header);
            assert!(!table.rows[1].is_header);
            assert_eq!(table.column_count(), 2);
            assert_eq!(table.body()[1].cells[1].plain_text(), "CICO");
        }
        other => panic!("Expected table, got {:?}", other),
    }
}

#[test]
fn test_table_without_separator_has_no_header() {
    let doc = parse("| a | b |\n| c | d |");
    match &doc.blocks[0] {
        Block::Table(table) => {
            assert!(table.header().is_none());
            assert_eq!(table.rows.len(), 2);
        }
        other => panic!("Expected table, got {:?}", other),
    }
}

#[test]
fn test_escaped_pipe_stays_inside_cell() {
    let markdown = "| x \\| y | 2 |";
    let doc = parse(markdown);
    match &doc.blocks[0] {
        Block::Table(table) => {
            assert_eq!(table.column_count(), 2);
            assert_eq!(table.rows[0].cells[0].plain_text(), "x | y");
            assert_eq!(table.rows[0].cells[1].plain_text(), "2");
        }
        other => panic!("Expected table, got {:?}", other),
    }
    assert_eq!(generate(&doc), format!("{}\n| --- | --- |", markdown));
}

#[test]
fn test_unknown_syntax_degrades_to_paragraph() {
    let doc = parse("> quoted text\n```\ncode\n```");
    assert_eq!(doc.len(), 1);
    assert!(matches!(doc.blocks[0], Block::Paragraph(_)));
}

#[test]
fn test_round_trip_of_assembled_document() {
    let markdown = "# MTSS Intervention Menu

**School Level:** K-12

## Tier 1: Universal Supports

Supports for *all* students.

- **BEHAVIOR-SPECIFIC PRAISE**: name the behavior
- **TWO WORD CHECK-IN**: daily

| Intervention | Tier | Grades |
| --- | --- | --- |
| WOOP | 1, 2 | K-12 |
| NUDGE LETTER | 2, 3 | PK-12 |";

    assert_eq!(generate(&parse(markdown)), markdown);
}

#[test]
fn test_crlf_input() {
    let doc = parse("# Title\r\n\r\nBody\r\n");
    assert_eq!(doc.len(), 2);
}
