//! Clinical value objects, lab grouping and field tables.

use crate::common::*;

#[test]
fn test_lab_results_collapse_to_one_line() {
    let md = render(&fixture("appendicitis.json"));
    assert!(md.contains("- Лейкоциты: **15.2 ×10⁹/л** (норма: 4.0-9.0) — ↑\n"));

    let items = item_texts(&md);
    for expected in [
        "Лейкоциты: 15.2 ×10⁹/л (норма: 4.0-9.0) — ↑",
        "Нейтрофилы: 82 % (норма: 47-72) — ↑",
        "Гемоглобин: 142 г/л (норма: 130-160) — normal",
        "Белок: 0 г/л (норма: 0-0.033) — normal",
    ] {
        assert!(items.iter().any(|i| i == expected), "missing {expected:?}");
    }
}

#[test]
fn test_low_status_uses_down_arrow() {
    let md = render(
        r#"{"labs": {"hgb": {"value": 98, "unit": "г/л", "reference": "130-160", "status": "Low"}}}"#,
    );
    assert_eq!(
        heading_texts(&md),
        vec!["JSON Document: root", "Results / Labs", "Лабораторные данные"]
    );
    assert_eq!(
        item_texts(&md),
        vec!["Гемоглобин: 98 г/л (норма: 130-160) — ↓"]
    );
}

#[test]
fn test_unknown_status_is_kept_verbatim() {
    let md = render(
        r#"{"results": {"crp": {"value": 250, "unit": "мг/л", "reference": "0-5", "status": "критично"}}}"#,
    );
    assert!(md.contains("(норма: 0-5) — критично"));
}

#[test]
fn test_lab_values_are_grouped_after_other_fields() {
    let md = render(
        r#"{
            "wbc": {"value": 11.0, "unit": "×10⁹/л", "reference": "4.0-9.0", "status": "high"},
            "comment_text": "взят натощак",
            "glucose": {"value": 5.1, "unit": "ммоль/л", "reference": "3.9-6.1", "status": "normal"}
        }"#,
    );
    assert_eq!(
        headings(&md),
        vec![
            (1, "JSON Document: root".to_string()),
            (2, "Остальные поля".to_string()),
            (3, "Лабораторные данные".to_string()),
        ]
    );
    assert_eq!(
        item_texts(&md),
        vec![
            "Comment text: взят натощак",
            "Лейкоциты: 11.0 ×10⁹/л (норма: 4.0-9.0) — ↑",
            "Глюкоза: 5.1 ммоль/л (норма: 3.9-6.1) — normal",
        ]
    );
}

#[test]
fn test_incomplete_measurements_stay_nested() {
    let md = render(r#"{"vitals": {"spo2": {"value": 97, "unit": "%"}}}"#);
    assert_eq!(
        nested_item_texts(&md, "SpO2:"),
        vec!["Значение: 97", "Единицы: %"]
    );
}

#[test]
fn test_many_simple_fields_become_a_field_table() {
    let md = render(&fixture("full_vitals.json"));
    assert_eq!(
        table_rows(&md),
        vec![
            vec!["Field", "Value", "Unit", "Reference", "Note"],
            vec!["Температура", "38.5°C", "", "", ""],
            vec!["ЧСС", "96", "", "", ""],
            vec!["ЧДД", "20", "", "", ""],
            vec!["Систолическое АД", "135", "мм рт. ст.", "110-130", "↑"],
            vec!["Диастолическое АД", "85", "", "", ""],
            vec!["SpO2", "97", "%", "", "на воздухе"],
            vec!["Pain", "—", "", "", "null"],
        ]
    );
}

#[test]
fn test_six_fields_stay_a_list() {
    let md = render(r#"{"vitals": {"a": 1, "b": 2, "c": 3, "d": 4, "e": 5, "f": 6}}"#);
    assert!(table_rows(&md).is_empty());
    assert_eq!(item_texts(&md).len(), 6);
}

#[test]
fn test_nested_fields_prevent_a_table() {
    let md = render(
        r#"{"vitals": {"a": 1, "b": 2, "c": 3, "d": 4, "e": 5, "f": 6, "g": {"x": 1}}}"#,
    );
    assert!(table_rows(&md).is_empty());
    assert_eq!(nested_item_texts(&md, "G:"), vec!["X: 1"]);
}
