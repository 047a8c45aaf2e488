//! Format trait definition
//!
//! Every output format implements [`Format`]. The trait only covers the
//! outbound direction: a [`RenderedDocument`] goes in, text comes out.

use crate::error::RenderError;
use crate::render::RenderedDocument;

/// Trait for output formats
///
/// # Examples
///
/// ```ignore
/// struct PlainFormat;
///
/// impl Format for PlainFormat {
///     fn name(&self) -> &str {
///         "plain"
///     }
///
///     fn serialize(&self, doc: &RenderedDocument) -> Result<String, RenderError> {
///         Ok(format!("{} blocks", doc.blocks.len()))
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "markdown", "html")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// File extensions associated with this format, without the leading dot.
    ///
    /// Used for format detection from output filenames.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    /// Serialize a rendered document
    fn serialize(&self, doc: &RenderedDocument) -> Result<String, RenderError>;
}
