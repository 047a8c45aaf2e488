//! Clinical value objects
//!
//! An object carrying `value`, `unit`, `reference` and `status` is a single
//! measurement and collapses into one bullet:
//!
//! ```text
//! - Лейкоциты: **15.2 ×10⁹/л** (норма: 4.0-9.0) — ↑
//! ```

use super::scalar::scalar_text;
use crate::ir::nodes::InlineContent;
use crate::options::DateStyle;
use serde_json::{Map, Value};

/// Fields an object may hold and still fit in a single table row.
const MEASUREMENT_FIELDS: &[&str] = &["value", "unit", "reference", "status", "note", "name"];

/// Borrowed view of a clinical value object.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ClinicalValue<'a> {
    pub name: Option<&'a str>,
    pub value: &'a Value,
    pub unit: &'a Value,
    pub reference: &'a Value,
    pub status: &'a Value,
}

impl<'a> ClinicalValue<'a> {
    pub fn from_value(value: &'a Value) -> Option<Self> {
        match value {
            Value::Object(map) => Self::from_map(map),
            _ => None,
        }
    }

    pub fn from_map(map: &'a Map<String, Value>) -> Option<Self> {
        Some(ClinicalValue {
            name: map.get("name").and_then(Value::as_str),
            value: map.get("value")?,
            unit: map.get("unit")?,
            reference: map.get("reference")?,
            status: map.get("status")?,
        })
    }

    /// `<name>: **<value> <unit>** (норма: <reference>) — <symbol>`
    pub fn inlines(&self, fallback_name: &str, date_style: DateStyle) -> Vec<InlineContent> {
        let name = self.name.unwrap_or(fallback_name);
        let value = scalar_text(None, self.value, date_style);
        let unit = scalar_text(None, self.unit, date_style);
        let measured = if unit.is_empty() || self.unit.is_null() {
            value
        } else {
            format!("{value} {unit}")
        };
        let reference = scalar_text(None, self.reference, date_style);
        let status = scalar_text(None, self.status, date_style);
        vec![
            InlineContent::Text(format!("{name}: ")),
            InlineContent::Bold(vec![InlineContent::Text(measured)]),
            InlineContent::Text(format!(
                " (норма: {reference}) — {}",
                status_symbol(&status)
            )),
        ]
    }
}

/// `↑` for "high", `↓` for "low" (case-insensitive), the status text otherwise.
pub(crate) fn status_symbol(status: &str) -> &str {
    let lower = status.to_lowercase();
    if lower.contains("high") {
        "↑"
    } else if lower.contains("low") {
        "↓"
    } else {
        status
    }
}

/// Whether `value` fits in one row of a `Field | Value | Unit | Reference | Note` table.
pub(crate) fn is_measurement(value: &Value) -> bool {
    match value {
        Value::Object(map) => {
            map.contains_key("value")
                && map.iter().all(|(key, field)| {
                    MEASUREMENT_FIELDS.contains(&key.as_str()) && super::scalar::is_scalar(field)
                })
        }
        _ => false,
    }
}
