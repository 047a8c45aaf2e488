//! Heuristic sections, titles, leftovers and the footer.

use crate::common::*;
use casedoc_render::{Renderer, SectionKind};
use insta::assert_snapshot;

#[test]
fn test_case_1_example() {
    let md = render(
        r#"{"title": "Case 1", "patient": {"name": "Иванов", "age": 34}, "vitals": {"temp": 38.5}}"#,
    );
    assert_snapshot!(md, @r#"
    # Case 1

    ## Patient

    - Имя: Иванов
    - Возраст (age): 34

    ## Vital signs

    - Температура: 38.5°C

    -----

    **Source keys:** title, patient, vitals

    **Converted at:** 2026-10-16T09:30:00Z
    "#);
}

#[test]
fn test_sections_follow_fixed_order() {
    let md = render(&fixture("appendicitis.json"));
    assert_eq!(
        headings(&md),
        vec![
            (1, "Острый аппендицит".to_string()),
            (2, "Patient".to_string()),
            (2, "Presentation / History".to_string()),
            (2, "Diagnosis".to_string()),
            (3, "Диагноз".to_string()),
            (3, "Правильные ответы".to_string()),
            (2, "Treatment / Management".to_string()),
            (2, "Results / Labs".to_string()),
            (3, "CBC".to_string()),
            (4, "Лабораторные данные".to_string()),
            (3, "Общий анализ мочи".to_string()),
            (4, "Лабораторные данные".to_string()),
            (2, "Vital signs".to_string()),
            (2, "Notes / Description".to_string()),
            (2, "Остальные поля".to_string()),
        ]
    );
}

#[test]
fn test_section_fields_are_normalized() {
    let md = render(&fixture("appendicitis.json"));
    let items = item_texts(&md);

    for expected in [
        "Имя: Иванов Иван",
        "Возраст (age): 34",
        "Главная жалоба: боль в животе",
        "Начало: 2026-10-15",
        "Локализация боли: правая подвздошная область",
        "Основной диагноз: Острый флегмонозный аппендицит",
        "Код МКБ-10: K35.8",
        "Лечение: Аппендэктомия",
        "Температура: 37.8°C",
        "ЧСС: 98",
        "Артериальное давление: 130/85",
        "Заметки: Симптом Щеткина-Блюмберга положительный",
    ] {
        assert!(
            items.iter().any(|item| item == expected),
            "missing item {expected:?} in {items:#?}"
        );
    }

    assert_eq!(
        nested_item_texts(&md, "Симптомы:"),
        vec!["тошнота", "субфебрилитет", "потеря аппетита"]
    );
}

#[test]
fn test_unclaimed_keys_go_to_leftovers() {
    let md = render(&fixture("appendicitis.json"));
    let leftovers = md
        .split("## Остальные поля")
        .nth(1)
        .expect("leftover section present");
    let items = item_texts(leftovers);
    assert!(items.contains(&"ID случая: appendicitis_01".to_string()));
    assert!(items.contains(&"Категория: Хирургия".to_string()));
    assert!(items.contains(&"Режим: verbose".to_string()));
    assert!(!leftovers.contains("Иванов"));
}

#[test]
fn test_every_key_is_placed_exactly_once() {
    let input = fixture("appendicitis.json");
    let doc = Renderer::default().build(&input, fixed_time());

    let expected = [
        ("case_id", SectionKind::Leftovers),
        ("title", SectionKind::Title),
        ("category", SectionKind::Leftovers),
        ("patient", SectionKind::Patient),
        ("presentation", SectionKind::Presentation),
        ("vital_signs", SectionKind::Vitals),
        ("real_test_results", SectionKind::Results),
        ("diagnosis", SectionKind::Diagnosis),
        ("correct_answers", SectionKind::Diagnosis),
        ("treatment", SectionKind::Treatment),
        ("notes", SectionKind::Notes),
        ("mode", SectionKind::Leftovers),
    ];
    assert_eq!(doc.placements.len(), expected.len());
    for (key, section) in expected {
        let placed = doc.placements_of(key);
        assert_eq!(placed.len(), 1, "{key}");
        assert_eq!(placed[0].section, section, "{key}");
    }
}

#[test]
fn test_footer_lists_source_keys_in_input_order() {
    let md = render(&fixture("appendicitis.json"));
    assert!(paragraph_texts(&md).contains(
        &"Source keys: case_id, title, category, patient, presentation, vital_signs, \
          real_test_results, diagnosis, correct_answers, treatment, notes, mode"
            .to_string()
    ));
    assert!(md.ends_with("**Converted at:** 2026-10-16T09:30:00Z\n"));
}

#[test]
fn test_case_id_titles_documents_without_title() {
    let md = render(r#"{"case_id": "pneumonia_02", "diagnosis": "Пневмония"}"#);
    assert_eq!(
        headings(&md),
        vec![
            (1, "JSON Document: pneumonia_02".to_string()),
            (2, "Diagnosis".to_string()),
        ]
    );
    assert!(md.contains("- Диагноз: Пневмония"));
}

#[test]
fn test_documents_without_known_keys() {
    let md = render(r#"{"foo": 1, "barBaz": "x", "flag": false}"#);
    assert_eq!(
        heading_texts(&md),
        vec!["JSON Document: root", "Остальные поля"]
    );
    assert_eq!(item_texts(&md), vec!["Foo: 1", "Bar baz: x", "Flag: Нет"]);
}

#[test]
fn test_null_values_are_marked() {
    let md = render(r#"{"patient": {"name": "Петров", "occupation": null}}"#);
    assert!(md.contains("- Профессия: — *null*"));
    assert!(item_texts(&md).contains(&"Профессия: — null".to_string()));
}

#[test]
fn test_colliding_labels_keep_their_keys() {
    let md = render(r#"{"vitals": {"temp": 38.5, "temperature": 38.7}}"#);
    let items = item_texts(&md);
    assert_eq!(
        items,
        vec![
            "Температура (temp): 38.5°C",
            "Температура (temperature): 38.7°C"
        ]
    );
}

#[test]
fn test_uniform_records_render_as_a_table() {
    let md = render(
        r#"{"medications": [
            {"name": "Цефтриаксон", "dose": "1 г", "route": "в/в"},
            {"name": "Метронидазол", "dose": "500 мг", "route": "в/в"}
        ]}"#,
    );
    assert_eq!(
        table_rows(&md),
        vec![
            vec!["Имя", "Доза", "Путь введения"],
            vec!["Цефтриаксон", "1 г", "в/в"],
            vec!["Метронидазол", "500 мг", "в/в"],
        ]
    );
}

#[test]
fn test_irregular_records_render_as_numbered_items() {
    let md = render(
        r#"{"procedures": [
            {"title": "Лапароскопия", "date": "2026-10-16"},
            {"duration": "40 мин"}
        ]}"#,
    );
    assert_eq!(nested_item_texts(&md, "Лапароскопия"), vec!["Дата: 2026-10-16"]);
    assert_eq!(nested_item_texts(&md, "Элемент 2"), vec!["Длительность: 40 мин"]);
    assert_eq!(ordered_list_count(&md), 1);
}
