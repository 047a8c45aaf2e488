//! Format implementations
//!
//! Each format turns a [`crate::render::RenderedDocument`] into text.

pub mod html;
pub mod markdown;

pub use html::HtmlFormat;
pub use markdown::MarkdownFormat;
