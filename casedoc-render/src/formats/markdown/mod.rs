//! Markdown format implementation
//!
//! The primary output of the renderer. The IR maps onto CommonMark with the
//! GFM table extension:
//!
//! | IR node        | Markdown                                   |
//! |----------------|--------------------------------------------|
//! | Heading        | ATX heading (`#` … `######`, capped at 6)  |
//! | Paragraph      | Paragraph                                  |
//! | List           | `-` bullets or `1.` items, nested by indent |
//! | Table          | GFM pipe table                             |
//! | Verbatim       | Fenced code block with info string         |
//! | Details        | Raw `<details>` / `<summary>` HTML         |
//! | ThematicBreak  | `-----`                                    |
//! | Bold / Italic  | `**bold**` / `*italic*`                    |
//!
//! Text from the input is escaped by comrak's writer, so a value like
//! `[...]` is written as `\[...\]` and reads back unchanged.

pub mod serializer;

use crate::error::RenderError;
use crate::format::Format;
use crate::render::RenderedDocument;

pub use serializer::serialize_to_markdown;

/// Format implementation for Markdown
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownFormat;

impl Format for MarkdownFormat {
    fn name(&self) -> &str {
        "markdown"
    }

    fn description(&self) -> &str {
        "CommonMark Markdown with GFM tables"
    }

    fn file_extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    fn serialize(&self, doc: &RenderedDocument) -> Result<String, RenderError> {
        serialize_to_markdown(&doc.to_document())
    }
}
