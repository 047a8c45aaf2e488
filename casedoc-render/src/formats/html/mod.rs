//! HTML format implementation
//!
//! Renders the same comrak AST the Markdown format writes, so both formats
//! always agree on structure. The result is an HTML fragment (no `<html>`
//! wrapper). Input text reaches comrak as Text nodes and is escaped; only the
//! renderer's own `<details>` wrapper is emitted as raw HTML.

use crate::error::RenderError;
use crate::format::Format;
use crate::formats::markdown::serializer::{build_comrak_ast, default_comrak_options};
use crate::ir::nodes::Document;
use crate::render::RenderedDocument;
use comrak::{format_html, Arena};

/// Format implementation for HTML
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlFormat;

impl Format for HtmlFormat {
    fn name(&self) -> &str {
        "html"
    }

    fn description(&self) -> &str {
        "HTML fragment rendered from the document tree"
    }

    fn file_extensions(&self) -> &[&str] {
        &["html", "htm"]
    }

    fn serialize(&self, doc: &RenderedDocument) -> Result<String, RenderError> {
        document_to_html(&doc.to_document())
    }
}

fn document_to_html(doc: &Document) -> Result<String, RenderError> {
    let arena = Arena::new();
    let options = default_comrak_options();
    let root = build_comrak_ast(&arena, doc);

    let mut output = Vec::new();
    format_html(root, &options, &mut output)
        .map_err(|e| RenderError::SerializationError(format!("HTML rendering failed: {e}")))?;
    String::from_utf8(output)
        .map_err(|e| RenderError::SerializationError(format!("UTF-8 conversion failed: {e}")))
}
