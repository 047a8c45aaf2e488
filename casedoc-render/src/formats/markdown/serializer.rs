//! Markdown serialization (IR → CommonMark text)
//!
//! Pipeline: IR → Comrak AST → Markdown string. Comrak's CommonMark writer
//! handles escaping of text taken from the input and sizes code fences, so
//! values such as `*не* указано` or a stray ```` ``` ```` come out literally.
//! The `<details>` wrapper around truncated JSON is the only raw HTML in the
//! tree.

use crate::error::RenderError;
use crate::ir::nodes::{
    Details, DocNode, Document, InlineContent, List, ListItem, Table, TableRow, Verbatim,
};
use comrak::nodes::{Ast, AstNode, ListDelimType, ListType, NodeTable, NodeValue, TableAlignment};
use comrak::{format_commonmark, Arena, ComrakOptions};
use std::cell::RefCell;

/// Serialize an IR document to Markdown.
pub fn serialize_to_markdown(doc: &Document) -> Result<String, RenderError> {
    let arena = Arena::new();
    let root = build_comrak_ast(&arena, doc);

    let mut output = Vec::new();
    let options = default_comrak_options();
    format_commonmark(root, &options, &mut output).map_err(|e| {
        RenderError::SerializationError(format!("Comrak serialization failed: {e}"))
    })?;

    let markdown = String::from_utf8(output)
        .map_err(|e| RenderError::SerializationError(format!("UTF-8 conversion failed: {e}")))?;

    // Remove Comrak's "end list" HTML comments which appear between consecutive lists
    Ok(markdown.replace("<!-- end list -->\n\n", ""))
}

pub(crate) fn default_comrak_options() -> ComrakOptions<'static> {
    let mut options = ComrakOptions::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    // Only the generated <details> blocks are HtmlBlock nodes; input text is
    // always a Text node and gets escaped by both writers.
    options.render.unsafe_ = true;
    options
}

/// Build a Comrak AST from an IR document.
pub(crate) fn build_comrak_ast<'a>(
    arena: &'a Arena<AstNode<'a>>,
    doc: &Document,
) -> &'a AstNode<'a> {
    let root = new_node(arena, NodeValue::Document);
    for child in &doc.children {
        add_block(arena, root, child);
    }
    root
}

fn new_node<'a>(arena: &'a Arena<AstNode<'a>>, value: NodeValue) -> &'a AstNode<'a> {
    arena.alloc(AstNode::new(RefCell::new(Ast::new(value, (0, 0).into()))))
}

fn add_block<'a>(arena: &'a Arena<AstNode<'a>>, parent: &'a AstNode<'a>, block: &DocNode) {
    match block {
        DocNode::Heading(heading) => {
            let node = new_node(
                arena,
                NodeValue::Heading(comrak::nodes::NodeHeading {
                    level: heading.level.clamp(1, 6) as u8,
                    setext: false,
                }),
            );
            parent.append(node);
            add_inlines(arena, node, &heading.content);
        }
        DocNode::Paragraph(paragraph) => {
            add_paragraph(arena, parent, &paragraph.content);
        }
        DocNode::List(list) => add_list(arena, parent, list),
        DocNode::Table(table) => add_table(arena, parent, table),
        DocNode::Verbatim(verbatim) => add_code_block(arena, parent, verbatim),
        DocNode::Details(details) => add_details(arena, parent, details),
        DocNode::ThematicBreak => parent.append(new_node(arena, NodeValue::ThematicBreak)),
    }
}

fn list_attributes(ordered: bool) -> comrak::nodes::NodeList {
    comrak::nodes::NodeList {
        list_type: if ordered {
            ListType::Ordered
        } else {
            ListType::Bullet
        },
        marker_offset: 0,
        padding: 0,
        start: 1,
        delimiter: ListDelimType::Period,
        bullet_char: b'-',
        tight: true,
    }
}

fn add_list<'a>(arena: &'a Arena<AstNode<'a>>, parent: &'a AstNode<'a>, list: &List) {
    let list_node = new_node(arena, NodeValue::List(list_attributes(list.ordered)));
    parent.append(list_node);
    for item in &list.items {
        add_item(arena, list_node, item, list.ordered);
    }
}

fn add_item<'a>(
    arena: &'a Arena<AstNode<'a>>,
    list_node: &'a AstNode<'a>,
    item: &ListItem,
    ordered: bool,
) {
    let item_node = new_node(arena, NodeValue::Item(list_attributes(ordered)));
    list_node.append(item_node);
    add_paragraph(arena, item_node, &item.content);
    for child in &item.children {
        add_block(arena, item_node, child);
    }
}

fn add_paragraph<'a>(
    arena: &'a Arena<AstNode<'a>>,
    parent: &'a AstNode<'a>,
    content: &[InlineContent],
) {
    let paragraph = new_node(arena, NodeValue::Paragraph);
    parent.append(paragraph);

    let rest = match content.split_first() {
        Some((InlineContent::Text(first), rest)) => {
            add_leading_text(arena, paragraph, first);
            rest
        }
        _ => content,
    };
    add_inlines(arena, paragraph, rest);
}

/// Text opening a paragraph. Leading blanks would turn into an indented code
/// block, and a run of `~` into a fence, once the output is parsed again.
fn add_leading_text<'a>(arena: &'a Arena<AstNode<'a>>, parent: &'a AstNode<'a>, text: &str) {
    let text = text.trim_start();
    match text.strip_prefix('~') {
        Some(rest) if rest.starts_with("~~") => {
            parent.append(new_node(arena, NodeValue::HtmlInline("&#126;".to_string())));
            add_inline(arena, parent, &InlineContent::text(rest));
        }
        _ => add_inline(arena, parent, &InlineContent::text(text)),
    }
}

fn add_table<'a>(arena: &'a Arena<AstNode<'a>>, parent: &'a AstNode<'a>, table: &Table) {
    let columns = table.header.cells.len();
    let rows = table.rows.len() + 1;
    let nonempty = std::iter::once(&table.header)
        .chain(&table.rows)
        .flat_map(|row| &row.cells)
        .filter(|cell| !cell.content.is_empty())
        .count();
    let table_node = new_node(
        arena,
        NodeValue::Table(NodeTable {
            alignments: vec![TableAlignment::None; columns],
            num_columns: columns,
            num_rows: rows,
            num_nonempty_cells: nonempty,
        }),
    );
    parent.append(table_node);

    add_table_row(arena, table_node, &table.header, true);
    for row in &table.rows {
        add_table_row(arena, table_node, row, false);
    }
}

fn add_table_row<'a>(
    arena: &'a Arena<AstNode<'a>>,
    table_node: &'a AstNode<'a>,
    row: &TableRow,
    header: bool,
) {
    let row_node = new_node(arena, NodeValue::TableRow(header));
    table_node.append(row_node);
    for cell in &row.cells {
        let cell_node = new_node(arena, NodeValue::TableCell);
        row_node.append(cell_node);
        add_inlines(arena, cell_node, &cell.content);
    }
}

fn add_code_block<'a>(arena: &'a Arena<AstNode<'a>>, parent: &'a AstNode<'a>, verbatim: &Verbatim) {
    let mut literal = verbatim.content.clone();
    if !literal.ends_with('\n') {
        literal.push('\n');
    }
    // An empty info string lets comrak fall back to an indented block
    let info = verbatim
        .language
        .clone()
        .unwrap_or_else(|| "text".to_string());
    parent.append(new_node(
        arena,
        NodeValue::CodeBlock(comrak::nodes::NodeCodeBlock {
            fenced: true,
            fence_char: b'`',
            fence_length: 3,
            fence_offset: 0,
            info,
            literal,
        }),
    ));
}

fn add_details<'a>(arena: &'a Arena<AstNode<'a>>, parent: &'a AstNode<'a>, details: &Details) {
    parent.append(html_block(
        arena,
        format!(
            "<details>\n<summary>{}</summary>\n",
            escape_html(&details.summary)
        ),
    ));
    for child in &details.children {
        add_block(arena, parent, child);
    }
    parent.append(html_block(arena, "</details>\n".to_string()));
}

fn html_block<'a>(arena: &'a Arena<AstNode<'a>>, literal: String) -> &'a AstNode<'a> {
    new_node(
        arena,
        NodeValue::HtmlBlock(comrak::nodes::NodeHtmlBlock {
            block_type: 6,
            literal,
        }),
    )
}

fn add_inlines<'a>(
    arena: &'a Arena<AstNode<'a>>,
    parent: &'a AstNode<'a>,
    content: &[InlineContent],
) {
    for inline in content {
        add_inline(arena, parent, inline);
    }
}

/// Add inline content to a comrak node
fn add_inline<'a>(arena: &'a Arena<AstNode<'a>>, parent: &'a AstNode<'a>, inline: &InlineContent) {
    match inline {
        InlineContent::Text(text) => {
            let sanitized = text.replace("\r\n", " ").replace(['\n', '\r'], " ");
            parent.append(new_node(arena, NodeValue::Text(sanitized)));
        }
        InlineContent::Bold(children) => {
            let strong = new_node(arena, NodeValue::Strong);
            parent.append(strong);
            add_inlines(arena, strong, children);
        }
        InlineContent::Italic(children) => {
            let emph = new_node(arena, NodeValue::Emph);
            parent.append(emph);
            add_inlines(arena, emph, children);
        }
        InlineContent::Code(code) => {
            parent.append(new_node(
                arena,
                NodeValue::Code(comrak::nodes::NodeCode {
                    num_backticks: 1,
                    literal: code.replace('\n', " "),
                }),
            ));
        }
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
