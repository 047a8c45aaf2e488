//! Compact mode: no tables, lower array cap.

use crate::common::*;
use casedoc_render::{Mode, RenderOptions};
use serde_json::Value;

fn full_vitals_with_mode(mode: &str) -> String {
    let mut value: Value = serde_json::from_str(&fixture("full_vitals.json")).unwrap();
    value
        .as_object_mut()
        .unwrap()
        .insert("mode".to_string(), Value::from(mode));
    value.to_string()
}

#[test]
fn test_compact_field_disables_tables() {
    let md = render(&full_vitals_with_mode("compact"));
    assert!(table_rows(&md).is_empty());

    let items = item_texts(&md);
    assert!(items.contains(&"Температура: 38.5°C".to_string()));
    assert!(items.contains(&"Систолическое АД: 135 мм рт. ст. (норма: 110-130) — ↑".to_string()));
    assert!(items.contains(&"Pain: — null".to_string()));
    assert_eq!(
        nested_item_texts(&md, "SpO2:"),
        vec!["Значение: 97", "Единицы: %", "Примечание: на воздухе"]
    );
    // the mode key itself is reported like any other field
    assert!(items.contains(&"Режим: compact".to_string()));
}

#[test]
fn test_document_mode_overrides_options() {
    let options = RenderOptions {
        mode: Mode::Compact,
        ..RenderOptions::default()
    };
    let md = render_with(options.clone(), &full_vitals_with_mode("verbose"));
    assert_eq!(table_rows(&md).len(), 8);

    let md = render_with(options, &fixture("full_vitals.json"));
    assert!(table_rows(&md).is_empty());
}

#[test]
fn test_compact_array_cap() {
    let md = render(r#"{"mode": "compact", "readings": [1, 2, 3, 4, 5, 6, 7, 8]}"#);
    assert_eq!(
        nested_item_texts(&md, "Readings:"),
        vec!["1", "2", "3", "4", "5", "... (+3 more)"]
    );
    assert!(heading_texts(&md).contains(&"Raw JSON".to_string()));
}

#[test]
fn test_compact_keeps_short_arrays() {
    let md = render(r#"{"mode": "compact", "readings": [1, 2, 3, 4, 5]}"#);
    assert_eq!(
        nested_item_texts(&md, "Readings:"),
        vec!["1", "2", "3", "4", "5"]
    );
}

#[test]
fn test_tables_switch_off_in_verbose_mode() {
    let options = RenderOptions {
        tables: false,
        ..RenderOptions::default()
    };
    let md = render_with(options, &fixture("full_vitals.json"));
    assert!(table_rows(&md).is_empty());
    assert!(item_texts(&md).contains(&"ЧСС: 96".to_string()));
}
