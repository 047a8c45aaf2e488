//! Shared helpers: fixed-time rendering, fixtures and comrak-based inspection
//! of the produced Markdown.

#![allow(dead_code)]

use casedoc_render::{RenderOptions, Renderer};
use chrono::{DateTime, TimeZone, Utc};
use comrak::nodes::{AstNode, ListType, NodeValue};
use comrak::{parse_document, Arena, ComrakOptions};
use std::path::PathBuf;

pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap()
}

pub fn render(input: &str) -> String {
    Renderer::default().render_at(input, fixed_time())
}

pub fn render_with(options: RenderOptions, input: &str) -> String {
    Renderer::new(options).render_at(input, fixed_time())
}

pub fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("cannot read fixture {}: {e}", path.display()))
}

fn comrak_options() -> ComrakOptions<'static> {
    let mut options = ComrakOptions::default();
    options.extension.table = true;
    options
}

/// Concatenated text of a node and its descendants.
fn text_of<'a>(node: &'a AstNode<'a>) -> String {
    let mut out = String::new();
    for descendant in node.descendants() {
        match &descendant.data.borrow().value {
            NodeValue::Text(text) => out.push_str(text),
            NodeValue::Code(code) => out.push_str(&code.literal),
            NodeValue::SoftBreak | NodeValue::LineBreak => out.push(' '),
            _ => {}
        }
    }
    out
}

/// Text of the first paragraph of a list item.
fn item_label<'a>(item: &'a AstNode<'a>) -> String {
    item.children()
        .find(|child| matches!(child.data.borrow().value, NodeValue::Paragraph))
        .map(text_of)
        .unwrap_or_default()
}

fn is_item<'a>(node: &'a AstNode<'a>) -> bool {
    matches!(node.data.borrow().value, NodeValue::Item(_))
}

/// `(level, text)` of every heading, in document order.
pub fn headings(md: &str) -> Vec<(u8, String)> {
    let arena = Arena::new();
    let root = parse_document(&arena, md, &comrak_options());
    root.descendants()
        .filter_map(|node| {
            let level = match &node.data.borrow().value {
                NodeValue::Heading(heading) => heading.level,
                _ => return None,
            };
            Some((level, text_of(node)))
        })
        .collect()
}

/// Heading texts only.
pub fn heading_texts(md: &str) -> Vec<String> {
    headings(md).into_iter().map(|(_, text)| text).collect()
}

/// First-line text of every list item, nested ones included, in document order.
pub fn item_texts(md: &str) -> Vec<String> {
    let arena = Arena::new();
    let root = parse_document(&arena, md, &comrak_options());
    root.descendants()
        .filter(|node| is_item(node))
        .map(item_label)
        .collect()
}

/// Texts of the items nested directly under the first item labelled `parent`.
pub fn nested_item_texts(md: &str, parent: &str) -> Vec<String> {
    let arena = Arena::new();
    let root = parse_document(&arena, md, &comrak_options());
    let Some(item) = root
        .descendants()
        .find(|node| is_item(node) && item_label(node) == parent)
    else {
        return vec![];
    };
    item.children()
        .filter(|child| matches!(child.data.borrow().value, NodeValue::List(_)))
        .flat_map(|list| list.children())
        .map(item_label)
        .collect()
}

/// Cell texts of every table row (header rows included), across all tables.
pub fn table_rows(md: &str) -> Vec<Vec<String>> {
    let arena = Arena::new();
    let root = parse_document(&arena, md, &comrak_options());
    root.descendants()
        .filter(|node| matches!(node.data.borrow().value, NodeValue::TableRow(_)))
        .map(|row| row.children().map(text_of).collect())
        .collect()
}

/// `(info, literal)` of every fenced code block.
pub fn code_blocks(md: &str) -> Vec<(String, String)> {
    let arena = Arena::new();
    let root = parse_document(&arena, md, &comrak_options());
    root.descendants()
        .filter_map(|node| match &node.data.borrow().value {
            NodeValue::CodeBlock(block) => Some((block.info.clone(), block.literal.clone())),
            _ => None,
        })
        .collect()
}

/// Text of every top-level paragraph, in document order.
pub fn paragraph_texts(md: &str) -> Vec<String> {
    let arena = Arena::new();
    let root = parse_document(&arena, md, &comrak_options());
    root.children()
        .filter(|node| matches!(node.data.borrow().value, NodeValue::Paragraph))
        .map(text_of)
        .collect()
}

/// Number of ordered lists, nested ones included.
pub fn ordered_list_count(md: &str) -> usize {
    let arena = Arena::new();
    let root = parse_document(&arena, md, &comrak_options());
    root.descendants()
        .filter(|node| {
            matches!(&node.data.borrow().value,
                NodeValue::List(list) if list.list_type == ListType::Ordered)
        })
        .count()
}

/// Kind of every top-level block, in document order.
pub fn block_kinds(md: &str) -> Vec<&'static str> {
    let arena = Arena::new();
    let root = parse_document(&arena, md, &comrak_options());
    root.children()
        .map(|node| match &node.data.borrow().value {
            NodeValue::Heading(_) => "heading",
            NodeValue::Paragraph => "paragraph",
            NodeValue::List(_) => "list",
            NodeValue::Table(_) => "table",
            NodeValue::HtmlBlock(_) => "html",
            NodeValue::CodeBlock(_) => "code",
            NodeValue::ThematicBreak => "break",
            _ => "other",
        })
        .collect()
}
