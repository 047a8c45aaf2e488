//! Rendering knobs
//!
//! [`RenderOptions`] holds every limit the renderer applies. The defaults are
//! the documented ones (depth 3, inline array cap 20, compact cap 5, table
//! threshold 6); `casedoc-config` builds options from TOML.

use crate::labels::KeyLabels;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Output density.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Tables allowed, arrays listed up to the inline cap
    #[default]
    Verbose,
    /// No tables, arrays capped at the compact cap
    Compact,
}

impl Mode {
    pub fn from_name(name: &str) -> Option<Mode> {
        match name {
            "verbose" => Some(Mode::Verbose),
            "compact" => Some(Mode::Compact),
            _ => None,
        }
    }
}

/// How ISO-8601 dates found in string values are displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateStyle {
    /// `2026-10-16`
    #[default]
    Iso,
    /// `16 октября 2026`, with `, 14:30` when the value carries a time
    Long,
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Mode used when the document has no `mode` field of its own
    pub mode: Mode,
    /// Containers nested deeper than this are replaced by an excerpt
    pub max_depth: usize,
    /// Arrays of primitives longer than this are truncated (verbose mode)
    pub inline_array_cap: usize,
    /// Same as `inline_array_cap`, for compact mode
    pub compact_array_cap: usize,
    /// Items kept when an array is truncated
    pub truncated_preview: usize,
    /// Objects with more simple fields than this become a table
    pub table_threshold: usize,
    /// Keys listed in the excerpt of a truncated object
    pub excerpt_keys: usize,
    /// Master switch for table output
    pub tables: bool,
    pub date_style: DateStyle,
    pub labels: Arc<KeyLabels>,
}

impl RenderOptions {
    pub fn array_cap(&self, mode: Mode) -> usize {
        match mode {
            Mode::Verbose => self.inline_array_cap,
            Mode::Compact => self.compact_array_cap,
        }
    }

    pub fn tables_enabled(&self, mode: Mode) -> bool {
        self.tables && mode == Mode::Verbose
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            mode: Mode::Verbose,
            max_depth: 3,
            inline_array_cap: 20,
            compact_array_cap: 5,
            truncated_preview: 5,
            table_threshold: 6,
            excerpt_keys: 3,
            tables: true,
            date_style: DateStyle::Iso,
            labels: KeyLabels::defaults(),
        }
    }
}
