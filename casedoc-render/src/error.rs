//! Error types for rendering and format operations

use std::fmt;

/// Errors that can occur while rendering or serializing a case document
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// Input text is not valid JSON
    ParseError {
        message: String,
        line: usize,
        column: usize,
    },
    /// Format not found in registry
    FormatNotFound(String),
    /// Error during serialization
    SerializationError(String),
}

impl RenderError {
    pub(crate) fn from_json(err: &serde_json::Error) -> Self {
        // serde_json appends " at line X column Y" to its Display output
        let full = err.to_string();
        let suffix = format!(" at line {} column {}", err.line(), err.column());
        let message = full.strip_suffix(&suffix).unwrap_or(&full).to_string();
        RenderError::ParseError {
            message,
            line: err.line(),
            column: err.column(),
        }
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::ParseError {
                message,
                line,
                column,
            } => write!(f, "Parse error: {message} (line {line}, column {column})"),
            RenderError::FormatNotFound(name) => write!(f, "Format '{name}' not found"),
            RenderError::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for RenderError {}
