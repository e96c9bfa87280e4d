//! Block-level elements for document structure
//!
//! A block is a markdown unit separated from its neighbours by a blank
//! line: a heading, a paragraph, a list or a table.

use serde::{Deserialize, Serialize};

use crate::inline::{plain_text, Inline};

/// Block-level content element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Block {
    /// A section heading
    Heading(Heading),
    /// A paragraph of text
    Paragraph(Paragraph),
    /// An ordered or unordered list
    List(List),
    /// A grid table with a header row
    Table(Table),
}

/// A section heading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    /// Heading level (1-6, where 1 is the highest)
    pub level: u8,
    /// Heading text content
    pub text: Vec<Inline>,
}

/// A paragraph block
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Paragraph {
    /// Inline content within the paragraph
    pub inlines: Vec<Inline>,
}

/// A list (ordered or unordered)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List {
    /// Type of list
    pub list_type: ListType,
    /// List items
    pub items: Vec<ListItem>,
}

/// List type variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListType {
    /// `- item`
    Unordered,
    /// `1. item`
    Ordered,
}

/// A single list item
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ListItem {
    /// Item content
    pub inlines: Vec<Inline>,
}

/// A table
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    /// Table rows; the first row is the header when `is_header` is set
    pub rows: Vec<TableRow>,
}

/// A table row
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableRow {
    /// Cells in this row
    pub cells: Vec<TableCell>,
    /// Whether this is a header row
    pub is_header: bool,
}

/// A table cell
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableCell {
    /// Cell content
    pub inlines: Vec<Inline>,
}

impl Default for Heading {
    fn default() -> Self {
        Self {
            level: 1,
            text: Vec::new(),
        }
    }
}

impl Heading {
    /// Create a heading with plain text
    pub fn new(level: u8, text: impl Into<String>) -> Self {
        Self {
            level,
            text: vec![Inline::Text(text.into())],
        }
    }

    /// Heading text with markup removed
    pub fn plain_text(&self) -> String {
        plain_text(&self.text)
    }
}

impl Paragraph {
    /// Create a paragraph from inline content
    pub fn new(inlines: Vec<Inline>) -> Self {
        Self { inlines }
    }
}

impl ListItem {
    /// Create a list item from inline content
    pub fn new(inlines: Vec<Inline>) -> Self {
        Self { inlines }
    }
}

impl Table {
    /// Number of columns, taken from the widest row
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0)
    }

    /// The header row, if the first row is flagged as one
    pub fn header(&self) -> Option<&TableRow> {
        self.rows.first().filter(|r| r.is_header)
    }

    /// Rows after the header
    pub fn body(&self) -> &[TableRow] {
        match self.header() {
            Some(_) => &self.rows[1..],
            None => &self.rows,
        }
    }
}

impl TableCell {
    /// Create a cell with plain text
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            inlines: vec![Inline::Text(text.into())],
        }
    }

    /// Cell text with markup removed
    pub fn plain_text(&self) -> String {
        plain_text(&self.inlines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_default() {
        let para = Paragraph::default();
        assert!(para.inlines.is_empty());
    }

    #[test]
    fn test_heading_levels() {
        let h2 = Heading::new(2, "Tier 1");
        assert_eq!(h2.level, 2);
        assert_eq!(h2.plain_text(), "Tier 1");
    }

    #[test]
    fn test_list_types() {
        let list = List {
            list_type: ListType::Ordered,
            items: vec![],
        };
        assert_eq!(list.list_type, ListType::Ordered);
    }

    #[test]
    fn test_table_structure() {
        let table = Table {
            rows: vec![
                TableRow {
                    cells: vec![TableCell::text("A"), TableCell::text("B")],
                    is_header: true,
                },
                TableRow {
                    cells: vec![TableCell::text("1")],
                    is_header: false,
                },
            ],
        };
        assert_eq!(table.column_count(), 2);
        assert!(table.header().is_some());
        assert_eq!(table.body().len(), 1);
        assert_eq!(table.body()[0].cells[0].plain_text(), "1");
    }

    #[test]
    fn test_headerless_table_body_is_all_rows() {
        let table = Table {
            rows: vec![TableRow::default(), TableRow::default()],
        };
        assert!(table.header().is_none());
        assert_eq!(table.body().len(), 2);
    }
}
