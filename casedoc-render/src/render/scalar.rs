//! Scalar formatting
//!
//! Numbers print verbatim (with `°C` for temperature keys), booleans as
//! `Да`/`Нет`, null as `—` with an inline `null` note, ISO-8601 dates in the
//! configured [`DateStyle`].

use crate::ir::nodes::InlineContent;
use crate::options::DateStyle;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde_json::Value;

const MONTHS_GENITIVE: [&str; 12] = [
    "января",
    "февраля",
    "марта",
    "апреля",
    "мая",
    "июня",
    "июля",
    "августа",
    "сентября",
    "октября",
    "ноября",
    "декабря",
];

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

pub(crate) fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Object(_) | Value::Array(_))
}

/// Whether a key names a temperature reading.
pub(crate) fn is_temperature_key(key: &str) -> bool {
    key.to_lowercase().contains("temp")
}

/// Inline rendering of a scalar found under `key`.
pub(crate) fn scalar_inlines(
    key: Option<&str>,
    value: &Value,
    date_style: DateStyle,
) -> Vec<InlineContent> {
    match value {
        Value::Null => vec![
            InlineContent::text("— "),
            InlineContent::Italic(vec![InlineContent::text("null")]),
        ],
        _ => vec![InlineContent::Text(scalar_text(key, value, date_style))],
    }
}

/// Plain-text rendering of a scalar found under `key`.
///
/// Containers fall back to compact JSON.
pub(crate) fn scalar_text(key: Option<&str>, value: &Value, date_style: DateStyle) -> String {
    match value {
        Value::Null => "—".to_string(),
        Value::Bool(true) => "Да".to_string(),
        Value::Bool(false) => "Нет".to_string(),
        Value::Number(number) => {
            if key.is_some_and(is_temperature_key) {
                format!("{number}°C")
            } else {
                number.to_string()
            }
        }
        Value::String(text) => format_date(text, date_style).unwrap_or_else(|| text.clone()),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Reformat an ISO-8601 date or datetime; `None` when `text` is not one.
pub(crate) fn format_date(text: &str, style: DateStyle) -> Option<String> {
    let text = text.trim();
    // cheap rejection before trying the parsers
    if text.len() < 10 || !text.as_bytes()[..4].iter().all(u8::is_ascii_digit) {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(format_naive(date, None, style));
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        let local = datetime.naive_local();
        return Some(format_naive(local.date(), Some(local), style));
    }
    NAIVE_DATETIME_FORMATS.iter().find_map(|format| {
        NaiveDateTime::parse_from_str(text, format)
            .ok()
            .map(|datetime| format_naive(datetime.date(), Some(datetime), style))
    })
}

fn format_naive(date: NaiveDate, time: Option<NaiveDateTime>, style: DateStyle) -> String {
    match style {
        DateStyle::Iso => date.format("%Y-%m-%d").to_string(),
        DateStyle::Long => {
            let month = MONTHS_GENITIVE[date.month0() as usize];
            let day = format!("{} {month} {}", date.day(), date.year());
            match time {
                Some(t) => format!("{day}, {:02}:{:02}", t.hour(), t.minute()),
                None => day,
            }
        }
    }
}
