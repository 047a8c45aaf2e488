//! Invalid JSON never fails: it renders an error document.

use crate::common::*;
use casedoc_render::{FormatRegistry, RenderError, Renderer};

#[test]
fn test_bad_json_renders_error_block() {
    let md = render("{bad json");
    assert_eq!(heading_texts(&md), vec!["Error"]);
    assert!(md.starts_with("# Error\n\n**JSON parsing failed:** "));
    assert!(md.contains("(line 1, column 2)"));
    assert_eq!(
        code_blocks(&md),
        vec![("text".to_string(), "{bad json\n".to_string())]
    );
    assert!(!md.contains("Source keys"));
}

#[test]
fn test_error_document_carries_position() {
    let doc = Renderer::default().build("{\n  \"a\": 1,\n  oops\n}", fixed_time());
    assert!(doc.is_error());
    match doc.error {
        Some(RenderError::ParseError { line, .. }) => assert_eq!(line, 3),
        other => panic!("Expected ParseError, got {other:?}"),
    }
    assert!(doc.placements.is_empty());
}

#[test]
fn test_empty_input_is_an_error() {
    let md = render("");
    assert!(md.starts_with("# Error\n"));
    assert!(md.contains("EOF while parsing"));
}

#[test]
fn test_backticks_in_raw_input_do_not_break_the_fence() {
    let md = render("```not json");
    assert!(md.contains("\n````text\n```not json\n````\n"));
    assert_eq!(code_blocks(&md)[0].1, "```not json\n");
}

#[test]
fn test_error_document_as_html() {
    let doc = Renderer::default().build("[1, 2", fixed_time());
    let html = FormatRegistry::default().serialize(&doc, "html").unwrap();
    assert!(html.contains("<h1>Error</h1>"));
    assert!(html.contains("<strong>JSON parsing failed:</strong>"));
    assert!(html.contains("[1, 2"));
}
