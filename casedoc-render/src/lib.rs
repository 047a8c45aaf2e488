//! Readable documents from clinical case JSON
//!
//!     This crate turns an arbitrary, schema-less JSON value (typically a clinical case file:
//!     patient, presentation, vitals, lab results, diagnosis) into a Markdown document a
//!     trainee can read. It never fails: invalid JSON becomes an "Error" document carrying the
//!     parse failure and the raw input.
//!
//!     TLDR:
//!         - `casedoc_render::render(text)` is the whole contract for most callers.
//!         - `Renderer` carries `RenderOptions` (limits, mode, label table) and exposes the
//!           intermediate `RenderedDocument` for callers that want placements or another format.
//!         - Formats serialize a `RenderedDocument`; the registry picks one by name or extension.
//!
//! Architecture
//!
//!     Rendering is split in two so the heuristics are format agnostic:
//!
//!         JSON text → serde_json::Value → RenderedDocument (IR blocks + placements + footer)
//!                   → Format (markdown | html) → text
//!
//!     The IR (./ir/nodes.rs) is a small block/inline tree: headings, paragraphs, lists,
//!     tables, verbatim blocks, collapsible details. All decisions (which section a key goes
//!     to, when to truncate, when a table beats a list) are taken while building the IR; the
//!     serializers only lay it out.
//!
//!     This is a pure lib, it powers casedoc-cli but is shell agnostic: no printing, no env
//!     vars, no file access. Logging goes through `tracing` and is silent unless the host
//!     installs a subscriber.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── labels.rs               # key → label table and normalization
//!     ├── options.rs              # RenderOptions, Mode, DateStyle
//!     ├── render
//!     │   ├── mod.rs              # Renderer, RenderedDocument, top-level layout
//!     │   ├── context.rs          # per-call state, generic object/array rules
//!     │   ├── sections.rs         # heuristic section table
//!     │   ├── clinical.rs         # {value, unit, reference, status} objects
//!     │   └── scalar.rs           # numbers, booleans, null, dates
//!     ├── formats
//!     │   ├── markdown
//!     │   └── html
//!     └── ir                      # Intermediate Representation
//!
//! Testing
//!     tests
//!     ├── lib.rs                  # includes the per-concern modules
//!     ├── common/mod.rs           # fixture loading, comrak helpers
//!     ├── <concern>.rs
//!     └── fixtures/*.json
//!
//!     Rust does not discover tests in subdirectories by default, so tests/lib.rs includes
//!     them.
//!
//! Core Algorithm
//!
//!     A JSON object renders as: title heading, then the heuristic sections (Patient,
//!     Presentation / History, Diagnosis, Treatment / Management, Results / Labs, Vital signs,
//!     Notes / Description) in that fixed order, each claimed by its trigger keys, then
//!     every unclaimed key under "Остальные поля". Every top-level key lands in exactly one
//!     place. Nested values are depth bounded: containers deeper than `max_depth` are
//!     replaced by a `[...]` excerpt and copied into a trailing Raw JSON block; long arrays
//!     of primitives show a preview and a `... (+N more)` marker.
//!
//!     A top-level array of objects renders each element as its own item section. Any other
//!     value renders generically under a "JSON Document: root" heading.
//!
//!     The document ends with a footer listing the source keys and the conversion time.
//!
pub mod error;
pub mod format;
pub mod formats;
pub mod ir;
pub mod labels;
pub mod options;
pub mod registry;
pub mod render;

pub use error::RenderError;
pub use format::Format;
pub use labels::{KeyLabels, LabelOverrides};
pub use options::{DateStyle, Mode, RenderOptions};
pub use registry::FormatRegistry;
pub use render::{Footer, KeyPlacement, RenderedDocument, Renderer, SectionKind};

/// Render JSON text to Markdown with the default options.
///
/// Never fails; see the crate docs for the layout.
pub fn render(input: &str) -> String {
    Renderer::default().render(input)
}
