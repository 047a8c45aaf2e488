//! Non-object roots: arrays of objects, other arrays, scalars.

use crate::common::*;
use casedoc_render::{Renderer, SectionKind};
use insta::assert_snapshot;

#[test]
fn test_array_of_primitives() {
    let md = render("[1, 2, 3]");
    assert_snapshot!(md, @r#"
    # JSON Document: root

    - 1
    - 2
    - 3

    -----

    **Source keys:** —

    **Converted at:** 2026-10-16T09:30:00Z
    "#);
}

#[test]
fn test_array_of_objects_renders_items() {
    let md = render(
        r#"[
            {"title": "Первый", "patient": {"age": 20}},
            {"diagnosis": "ОРВИ", "extra": 1}
        ]"#,
    );
    assert_eq!(
        headings(&md),
        vec![
            (1, "JSON Document: root".to_string()),
            (2, "Item 1: Первый".to_string()),
            (3, "Patient".to_string()),
            (2, "Item 2".to_string()),
            (3, "Diagnosis".to_string()),
            (3, "Остальные поля".to_string()),
        ]
    );
    assert!(paragraph_texts(&md).contains(&"Source keys: title, patient, diagnosis, extra".to_string()));
}

#[test]
fn test_item_placements_are_per_element() {
    let doc = Renderer::default().build(
        r#"[{"notes": "a"}, {"notes": "b", "x": 1}]"#,
        fixed_time(),
    );
    let notes = doc.placements_of("notes");
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].item, Some(0));
    assert_eq!(notes[1].item, Some(1));
    assert!(notes.iter().all(|p| p.section == SectionKind::Notes));
    assert_eq!(doc.placements_of("x")[0].section, SectionKind::Leftovers);
}

#[test]
fn test_mixed_array_uses_numbered_items() {
    let md = render(r#"[1, {"a": 1}]"#);
    assert_eq!(item_texts(&md), vec!["1", "Элемент 2", "A: 1"]);
    assert_eq!(nested_item_texts(&md, "Элемент 2"), vec!["A: 1"]);
}

#[test]
fn test_scalar_root() {
    let md = render(r#""2026-10-16""#);
    assert_eq!(heading_texts(&md), vec!["JSON Document: root"]);
    assert!(md.starts_with("# JSON Document: root\n\n2026-10-16\n\n-----\n"));
}

#[test]
fn test_empty_object_still_has_a_footer() {
    let md = render("{}");
    assert_eq!(heading_texts(&md), vec!["JSON Document: root"]);
    assert!(md.contains("**Source keys:** —\n"));
}
