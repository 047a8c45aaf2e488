//! Intermediate Representation (IR) for rendered case documents.
//!
//! The renderer never writes Markdown directly: it builds this block/inline
//! tree and hands it to a [`crate::format::Format`], which keeps the
//! heuristics independent from the output syntax.

pub mod nodes;
