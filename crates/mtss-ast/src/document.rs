//! Document root and metadata

use serde::{Deserialize, Serialize};

use crate::block::{Block, Heading};

/// A parsed markdown resource
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    pub metadata: DocumentMeta,
    pub blocks: Vec<Block>,
}

/// Document metadata
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DocumentMeta {
    /// Text of the first level-1 heading
    pub title: Option<String>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from blocks, taking the title from the first H1
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        let title = blocks.iter().find_map(|block| match block {
            Block::Heading(h) if h.level == 1 => Some(h.plain_text()),
            _ => None,
        });
        Self {
            metadata: DocumentMeta { title },
            blocks,
        }
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Headings in document order
    pub fn headings(&self) -> impl Iterator<Item = &Heading> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Heading(h) => Some(h),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Paragraph;
    use crate::inline::Inline;

    #[test]
    fn test_empty_document() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.metadata.title, None);
    }

    #[test]
    fn test_title_from_first_level_one_heading() {
        let doc = Document::from_blocks(vec![
            Block::Heading(Heading::new(2, "Overview")),
            Block::Heading(Heading {
                level: 1,
                text: vec![Inline::text("MTSS "), Inline::bold("Menu")],
            }),
            Block::Heading(Heading::new(1, "Second")),
        ]);
        assert_eq!(doc.metadata.title.as_deref(), Some("MTSS Menu"));
        assert_eq!(doc.headings().count(), 3);
    }

    #[test]
    fn test_document_push_block() {
        let mut doc = Document::new();
        doc.push(Block::Paragraph(Paragraph::new(vec![Inline::text("Hello")])));
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.headings().count(), 0);
    }

    #[test]
    fn test_document_serializes() {
        let doc = Document::from_blocks(vec![Block::Heading(Heading::new(1, "Plan"))]);
        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("\"title\":\"Plan\""));
    }
}
