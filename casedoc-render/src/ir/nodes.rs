//! Core data structures for the Intermediate Representation (IR).

/// A block-level node.
#[derive(Debug, Clone, PartialEq)]
pub enum DocNode {
    Heading(Heading),
    Paragraph(Paragraph),
    List(List),
    Table(Table),
    Verbatim(Verbatim),
    Details(Details),
    ThematicBreak,
}

/// Represents the root of a document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub children: Vec<DocNode>,
}

/// Represents a heading with a specific level.
#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    pub level: usize,
    pub content: Vec<InlineContent>,
}

/// Represents a paragraph of text.
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub content: Vec<InlineContent>,
}

/// Represents a list of items.
#[derive(Debug, Clone, PartialEq)]
pub struct List {
    pub items: Vec<ListItem>,
    pub ordered: bool,
}

/// Represents an item in a list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    pub content: Vec<InlineContent>,
    pub children: Vec<DocNode>,
}

/// Represents a table. Every row has as many cells as the header.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub header: TableRow,
    pub rows: Vec<TableRow>,
}

/// Represents a table row.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

/// Represents a table cell.
#[derive(Debug, Clone, PartialEq)]
pub struct TableCell {
    pub content: Vec<InlineContent>,
}

/// Represents a block of verbatim text.
#[derive(Debug, Clone, PartialEq)]
pub struct Verbatim {
    pub language: Option<String>,
    pub content: String,
}

/// A collapsible block with a one-line summary.
#[derive(Debug, Clone, PartialEq)]
pub struct Details {
    pub summary: String,
    pub children: Vec<DocNode>,
}

/// Represents inline content, such as text, bold, italics, etc.
#[derive(Debug, Clone, PartialEq)]
pub enum InlineContent {
    Text(String),
    Bold(Vec<InlineContent>),
    Italic(Vec<InlineContent>),
    Code(String),
}

impl InlineContent {
    pub fn text(text: impl Into<String>) -> Self {
        InlineContent::Text(text.into())
    }

    /// The text with all markup removed.
    pub fn plain_text(&self) -> String {
        match self {
            InlineContent::Text(text) | InlineContent::Code(text) => text.clone(),
            InlineContent::Bold(children) | InlineContent::Italic(children) => {
                plain_text(children)
            }
        }
    }
}

/// Concatenated plain text of a run of inlines.
pub fn plain_text(content: &[InlineContent]) -> String {
    content.iter().map(InlineContent::plain_text).collect()
}

impl Heading {
    pub fn new(level: usize, text: impl Into<String>) -> Self {
        Heading {
            level,
            content: vec![InlineContent::text(text)],
        }
    }
}

impl Paragraph {
    pub fn text(text: impl Into<String>) -> Self {
        Paragraph {
            content: vec![InlineContent::text(text)],
        }
    }
}

impl ListItem {
    pub fn new(content: Vec<InlineContent>) -> Self {
        ListItem {
            content,
            children: vec![],
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(vec![InlineContent::text(text)])
    }

    pub fn with_children(content: Vec<InlineContent>, children: Vec<DocNode>) -> Self {
        ListItem { content, children }
    }
}

impl TableCell {
    pub fn text(text: impl Into<String>) -> Self {
        TableCell {
            content: vec![InlineContent::text(text)],
        }
    }
}

impl TableRow {
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TableRow {
            cells: texts.into_iter().map(TableCell::text).collect(),
        }
    }
}
