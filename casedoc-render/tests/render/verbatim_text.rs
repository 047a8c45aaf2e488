//! Text and numbers from the input come out exactly as written: markup
//! characters are escaped, never interpreted, and the footer always survives.

use crate::common::*;
use casedoc_render::{FormatRegistry, Renderer};

/// Every readable text of the parsed output: headings, paragraphs, items, cells.
fn texts(md: &str) -> Vec<String> {
    let mut all = heading_texts(md);
    all.extend(paragraph_texts(md));
    all.extend(item_texts(md));
    all.extend(table_rows(md).into_iter().flatten());
    all
}

fn assert_footer_intact(md: &str) {
    let kinds = block_kinds(md);
    assert_eq!(
        kinds[kinds.len() - 3..],
        ["break", "paragraph", "paragraph"],
        "footer lost in:\n{md}"
    );
    assert_eq!(
        paragraph_texts(md).last().map(String::as_str),
        Some("Converted at: 2026-10-16T09:30:00Z")
    );
}

#[test]
fn test_root_scalar_with_a_fence_does_not_swallow_the_footer() {
    for (input, expected) in [
        (r#""```\nnote""#, "``` note"),
        (r#""~~~\nnote""#, "~~~ note"),
        (r#""<!-- note""#, "<!-- note"),
        (r#""*не* указано""#, "*не* указано"),
    ] {
        let md = render(input);
        assert_eq!(
            block_kinds(&md),
            vec!["heading", "paragraph", "break", "paragraph", "paragraph"],
            "{input}"
        );
        assert_eq!(paragraph_texts(&md)[0], expected);
        assert!(code_blocks(&md).is_empty());
        assert_footer_intact(&md);
    }
}

#[test]
fn test_markup_in_values_reads_back_literally() {
    let md = render(
        r#"{"patient": {"name": "*не* указано", "comment": "_x_ [a](b) <i>y</i> ```w```"},
            "notes": "<!-- скрыто"}"#,
    );
    let all = texts(&md);
    assert!(all.iter().any(|t| t.ends_with(": *не* указано")), "{all:?}");
    assert!(
        all.iter().any(|t| t.ends_with(": _x_ [a](b) <i>y</i> ```w```")),
        "{all:?}"
    );
    assert!(all.iter().any(|t| t.ends_with("<!-- скрыто")), "{all:?}");
    assert!(!block_kinds(&md).contains(&"html"));
    assert_footer_intact(&md);
}

#[test]
fn test_markup_in_keys_reads_back_literally() {
    let md = render(r#"{"*важно*": 1, "[ref]": 2, "<tag>": 3, "`code`": 4, "~~~": 5}"#);
    assert_eq!(
        item_texts(&md),
        vec!["*важно*: 1", "[ref]: 2", "<tag>: 3", "`code`: 4", "~~~: 5"]
    );
    assert!(code_blocks(&md).is_empty());
    assert_footer_intact(&md);
}

#[test]
fn test_markup_in_titles_reads_back_literally() {
    let md = render(r#"{"title": "*Case* _1_ [x] <b>", "diagnosis": "ОРВИ"}"#);
    assert_eq!(heading_texts(&md)[0], "*Case* _1_ [x] <b>");
    assert_footer_intact(&md);
}

#[test]
fn test_markup_in_table_cells_reads_back_literally() {
    let md = render(
        r#"{"medications": [
            {"name": "*A*", "dose": "[1 г]"},
            {"name": "<B>", "dose": "_2_"}
        ]}"#,
    );
    let rows = table_rows(&md);
    assert_eq!(rows[1], vec!["*A*", "[1 г]"]);
    assert_eq!(rows[2], vec!["<B>", "_2_"]);
}

#[test]
fn test_script_in_values_is_escaped_in_html() {
    let doc = Renderer::default().build(
        r#"{"notes": "<script>alert(1)</script>"}"#,
        fixed_time(),
    );
    let html = FormatRegistry::default().serialize(&doc, "html").unwrap();
    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
}

#[test]
fn test_numbers_keep_their_written_form() {
    let md = render(r#"{"x": 38.50, "big": 12345678901234567890123, "exp": 1e3}"#);
    assert_eq!(
        item_texts(&md),
        vec!["X: 38.50", "Big: 12345678901234567890123", "Exp: 1e3"]
    );
}
