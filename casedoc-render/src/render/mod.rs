//! JSON → document IR
//!
//! [`Renderer`] turns one JSON text into a [`RenderedDocument`]: the block
//! list, where every top-level key went, the subtrees queued for the Raw JSON
//! appendix and the footer. Formats in [`crate::formats`] serialize it.
//!
//! Layout of a rendered object:
//!
//! ```text
//! # <title>                      (title, else "JSON Document: <case_id>")
//! ## Patient                     (heuristic sections, fixed order)
//! ## Presentation / History
//! ...
//! ## Остальные поля              (keys no section claimed)
//! ### Raw JSON                   (only when something was truncated)
//! -----
//! **Source keys:** ...
//! **Converted at:** ...
//! ```
//!
//! A top-level array of objects renders each element the same way under
//! `## Item n` headings. Invalid JSON renders an error document instead and
//! never fails.

mod clinical;
mod context;
mod scalar;
pub mod sections;

pub use sections::SectionKind;

use crate::error::RenderError;
use crate::formats::markdown::serialize_to_markdown;
use crate::ir::nodes::{
    Details, DocNode, Document, Heading, InlineContent, List, ListItem, Paragraph, Verbatim,
};
use crate::options::{Mode, RenderOptions};
use chrono::{DateTime, SecondsFormat, Utc};
use clinical::ClinicalValue;
use context::RenderContext;
use scalar::{is_scalar, scalar_text};
use sections::{HEURISTIC_SECTIONS, LEFTOVERS_HEADING, RAW_JSON_HEADING};
use serde_json::{Map, Value};
use tracing::{debug, warn};

const ROOT_TITLE: &str = "JSON Document: root";

/// Where one top-level key of the input ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPlacement {
    /// Element index when the input is a top-level array of objects
    pub item: Option<usize>,
    pub key: String,
    pub section: SectionKind,
}

/// Trailing metadata block.
#[derive(Debug, Clone, PartialEq)]
pub struct Footer {
    pub source_keys: Vec<String>,
    pub converted_at: DateTime<Utc>,
}

impl Footer {
    fn blocks(&self) -> Vec<DocNode> {
        let keys = if self.source_keys.is_empty() {
            "—".to_string()
        } else {
            self.source_keys.join(", ")
        };
        vec![
            DocNode::ThematicBreak,
            labelled_paragraph("Source keys:", keys),
            labelled_paragraph(
                "Converted at:",
                self.converted_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            ),
        ]
    }
}

/// Result of one conversion, before serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub blocks: Vec<DocNode>,
    pub placements: Vec<KeyPlacement>,
    /// Truncated subtrees by dotted path
    pub raw_json: Map<String, Value>,
    pub footer: Option<Footer>,
    /// Set when the input was not valid JSON
    pub error: Option<RenderError>,
}

impl RenderedDocument {
    fn parse_failure(error: RenderError, input: &str) -> Self {
        let detail = match &error {
            RenderError::ParseError {
                message,
                line,
                column,
            } => format!(" {message} (line {line}, column {column})"),
            other => format!(" {other}"),
        };
        RenderedDocument {
            blocks: vec![
                DocNode::Heading(Heading::new(1, "Error")),
                DocNode::Paragraph(Paragraph {
                    content: vec![
                        InlineContent::Bold(vec![InlineContent::text("JSON parsing failed:")]),
                        InlineContent::Text(detail),
                    ],
                }),
                DocNode::Verbatim(Verbatim {
                    language: Some("text".to_string()),
                    content: input.to_string(),
                }),
            ],
            placements: vec![],
            raw_json: Map::new(),
            footer: None,
            error: Some(error),
        }
    }

    /// Body and footer as one IR document.
    pub fn to_document(&self) -> Document {
        let mut children = self.blocks.clone();
        if let Some(footer) = &self.footer {
            children.extend(footer.blocks());
        }
        Document { children }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Placements of `key` across the document (one per array item in items mode).
    pub fn placements_of(&self, key: &str) -> Vec<&KeyPlacement> {
        self.placements.iter().filter(|p| p.key == key).collect()
    }
}

/// Converts JSON text into documents. Cheap to build; holds no per-call state.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Self {
        Renderer { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render `input` to Markdown, stamped with the current time.
    pub fn render(&self, input: &str) -> String {
        self.render_at(input, Utc::now())
    }

    /// Render `input` to Markdown with a fixed conversion timestamp.
    pub fn render_at(&self, input: &str, converted_at: DateTime<Utc>) -> String {
        serialize_to_markdown(&self.build(input, converted_at).to_document()).unwrap_or_else(
            |error| {
                warn!(%error, "markdown serialization failed");
                error.to_string()
            },
        )
    }

    pub fn build(&self, input: &str, converted_at: DateTime<Utc>) -> RenderedDocument {
        match serde_json::from_str::<Value>(input) {
            Ok(value) => self.build_value(&value, converted_at),
            Err(err) => {
                let error = RenderError::from_json(&err);
                warn!(%error, "input is not valid JSON");
                RenderedDocument::parse_failure(error, input)
            }
        }
    }

    pub fn build_value(&self, value: &Value, converted_at: DateTime<Utc>) -> RenderedDocument {
        let mut builder = Builder {
            ctx: RenderContext::new(&self.options),
            blocks: Vec::new(),
            placements: Vec::new(),
            source_keys: Vec::new(),
        };

        match value {
            Value::Object(map) => builder.object(map, 1, None),
            Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_object) => {
                debug!(count = items.len(), "rendering top-level array as items");
                builder.push(DocNode::Heading(Heading::new(1, ROOT_TITLE)));
                for (index, item) in items.iter().enumerate() {
                    if let Value::Object(map) = item {
                        builder.ctx.begin_item(index);
                        builder.object(map, 2, Some(index));
                    }
                }
                builder.ctx.end_item();
            }
            other => {
                builder.push(DocNode::Heading(Heading::new(1, ROOT_TITLE)));
                let blocks = builder.ctx.value_blocks(None, other, 2);
                builder.blocks.extend(blocks);
            }
        }

        builder.finish(converted_at)
    }
}

struct Builder<'a> {
    ctx: RenderContext<'a>,
    blocks: Vec<DocNode>,
    placements: Vec<KeyPlacement>,
    source_keys: Vec<String>,
}

impl<'a> Builder<'a> {
    fn push(&mut self, block: DocNode) {
        self.blocks.push(block);
    }

    fn place(&mut self, key: &str, section: SectionKind, item: Option<usize>) {
        if self.ctx.consume(key) {
            self.placements.push(KeyPlacement {
                item,
                key: key.to_string(),
                section,
            });
        }
    }

    /// One object rendered as a document whose heading sits at `level`.
    fn object(&mut self, map: &Map<String, Value>, level: usize, item: Option<usize>) {
        let mode = map
            .get("mode")
            .and_then(Value::as_str)
            .and_then(Mode::from_name)
            .unwrap_or(self.ctx.options().mode);
        self.ctx.set_mode(mode);

        for key in map.keys() {
            if !self.source_keys.contains(key) {
                self.source_keys.push(key.clone());
            }
        }

        let heading = self.heading(map, item);
        self.push(DocNode::Heading(Heading::new(level, heading)));
        self.sections(map, level + 1, item);
        self.leftovers(map, level + 1, item);
    }

    fn heading(&mut self, map: &Map<String, Value>, item: Option<usize>) -> String {
        let date_style = self.ctx.options().date_style;
        let usable = |key: &str| map.get(key).filter(|v| is_scalar(v) && !v.is_null());

        if let Some(title) = usable("title") {
            let title = scalar_text(Some("title"), title, date_style);
            self.place("title", SectionKind::Title, item);
            return match item {
                Some(index) => format!("Item {}: {title}", index + 1),
                None => title,
            };
        }
        match item {
            Some(index) => format!("Item {}", index + 1),
            None => match usable("case_id") {
                Some(case_id) => {
                    let case_id = scalar_text(None, case_id, date_style);
                    self.place("case_id", SectionKind::Title, item);
                    format!("JSON Document: {case_id}")
                }
                None => ROOT_TITLE.to_string(),
            },
        }
    }

    fn sections(&mut self, map: &Map<String, Value>, level: usize, item: Option<usize>) {
        for spec in HEURISTIC_SECTIONS {
            let matched: Vec<(&str, &Value)> = spec
                .triggers
                .iter()
                .filter_map(|trigger| map.get_key_value(*trigger))
                .filter(|(key, _)| !self.ctx.is_consumed(key))
                .map(|(key, value)| (key.as_str(), value))
                .collect();
            if matched.is_empty() {
                continue;
            }

            let keys: Vec<&str> = matched.iter().map(|(key, _)| *key).collect();
            debug!(section = spec.heading, ?keys, "section matched");

            self.push(DocNode::Heading(Heading::new(level, spec.heading)));
            self.ctx.section = Some(spec.kind);
            let body = if spec.kind == SectionKind::Results {
                self.results_body(&matched, level)
            } else {
                self.section_body(&matched, level)
            };
            self.blocks.extend(body);
            for key in keys {
                self.place(key, spec.kind, item);
            }
        }
        self.ctx.section = None;
    }

    /// Scalars as `- Label: value` bullets; containers as blocks, under their
    /// own sub-heading when the section matched more than one key.
    fn section_body(&mut self, matched: &[(&str, &Value)], level: usize) -> Vec<DocNode> {
        let titled = matched.len() > 1;
        let mut blocks = Vec::new();
        let mut pending = Vec::new();

        for (key, value) in matched {
            self.ctx.enter_key(key);
            if RenderContext::is_inline(value) {
                let label = self.ctx.label(key);
                pending.push(self.ctx.field_item(key, value, &label));
            } else {
                flush(&mut blocks, &mut pending);
                blocks.extend(self.container_blocks(key, value, level, titled));
            }
            self.ctx.leave();
        }
        flush(&mut blocks, &mut pending);
        blocks
    }

    fn container_blocks(
        &mut self,
        key: &str,
        value: &Value,
        level: usize,
        titled: bool,
    ) -> Vec<DocNode> {
        if titled {
            let mut blocks = vec![DocNode::Heading(Heading::new(
                level + 1,
                self.ctx.label(key),
            ))];
            blocks.extend(self.ctx.value_blocks(Some(key), value, level + 2));
            blocks
        } else {
            self.ctx.value_blocks(Some(key), value, level + 1)
        }
    }

    /// Like [`Self::section_body`], but test groups (cbc, urinalysis, …) get
    /// their own headings and a group's `results` object is listed directly.
    fn results_body(&mut self, matched: &[(&str, &Value)], level: usize) -> Vec<DocNode> {
        let labels = &self.ctx.options().labels;
        let titled = matched.len() > 1;
        let mut blocks = Vec::new();
        let mut pending = Vec::new();

        for (key, value) in matched {
            self.ctx.enter_key(key);
            if RenderContext::is_inline(value) {
                let label = self.ctx.label(key);
                pending.push(self.ctx.field_item(key, value, &label));
                self.ctx.leave();
                continue;
            }
            flush(&mut blocks, &mut pending);

            match value {
                Value::Object(_) if labels.is_test_group(key) => {
                    blocks.push(DocNode::Heading(Heading::new(
                        level + 1,
                        labels.group_label(key),
                    )));
                    blocks.extend(self.group_body(value, level + 2));
                }
                Value::Object(map) if map.values().any(is_group) => {
                    let (groups, rest): (Vec<_>, Vec<_>) = map
                        .iter()
                        .map(|(k, v)| (k.as_str(), v))
                        .partition(|(_, v)| is_group(v));
                    if !rest.is_empty() {
                        let mut heading_level = level + 1;
                        if titled {
                            blocks.push(DocNode::Heading(Heading::new(
                                level + 1,
                                self.ctx.label(key),
                            )));
                            heading_level += 1;
                        }
                        blocks.extend(self.ctx.entries_blocks(&rest, heading_level));
                    }
                    for (group_key, group) in groups {
                        self.ctx.enter_key(group_key);
                        blocks.push(DocNode::Heading(Heading::new(
                            level + 1,
                            labels.group_label(group_key),
                        )));
                        blocks.extend(self.group_body(group, level + 2));
                        self.ctx.leave();
                    }
                }
                _ => blocks.extend(self.container_blocks(key, value, level, titled)),
            }
            self.ctx.leave();
        }
        flush(&mut blocks, &mut pending);
        blocks
    }

    fn group_body(&mut self, group: &Value, heading_level: usize) -> Vec<DocNode> {
        if let Some(excerpt) = self.ctx.truncate_if_deep(group) {
            return vec![DocNode::Paragraph(Paragraph { content: excerpt })];
        }
        let Value::Object(map) = group else {
            return self.ctx.value_blocks(None, group, heading_level);
        };

        let results = match map.get("results") {
            Some(Value::Object(results)) => Some(results),
            _ => None,
        };
        let entries: Vec<(&str, &Value)> = map
            .iter()
            .filter(|(key, _)| results.is_none() || key.as_str() != "results")
            .map(|(key, value)| (key.as_str(), value))
            .collect();

        let mut blocks = Vec::new();
        if !entries.is_empty() {
            blocks.extend(self.ctx.entries_blocks(&entries, heading_level));
        }
        if let Some(results) = results {
            let entries: Vec<(&str, &Value)> =
                results.iter().map(|(k, v)| (k.as_str(), v)).collect();
            self.ctx.enter_key("results");
            blocks.extend(self.ctx.entries_blocks(&entries, heading_level));
            self.ctx.leave();
        }
        blocks
    }

    fn leftovers(&mut self, map: &Map<String, Value>, level: usize, item: Option<usize>) {
        let rest: Vec<(&str, &Value)> = map
            .iter()
            .filter(|(key, _)| !self.ctx.is_consumed(key))
            .map(|(key, value)| (key.as_str(), value))
            .collect();
        if rest.is_empty() {
            return;
        }
        debug!(count = rest.len(), "rendering leftover keys");

        self.push(DocNode::Heading(Heading::new(level, LEFTOVERS_HEADING)));
        self.ctx.section = Some(SectionKind::Leftovers);
        let body = self.ctx.entries_blocks(&rest, level + 1);
        self.blocks.extend(body);
        for (key, _) in rest {
            self.place(key, SectionKind::Leftovers, item);
        }
        self.ctx.section = None;
    }

    fn finish(self, converted_at: DateTime<Utc>) -> RenderedDocument {
        let Builder {
            ctx,
            mut blocks,
            placements,
            source_keys,
        } = self;
        let raw_json = ctx.into_raw_json();

        if !raw_json.is_empty() {
            debug!(count = raw_json.len(), "appending raw JSON for truncated values");
            match serde_json::to_string_pretty(&raw_json) {
                Ok(pretty) => {
                    blocks.push(DocNode::Heading(Heading::new(3, RAW_JSON_HEADING)));
                    blocks.push(DocNode::Details(Details {
                        summary: "Показать JSON".to_string(),
                        children: vec![DocNode::Verbatim(Verbatim {
                            language: Some("json".to_string()),
                            content: pretty,
                        })],
                    }));
                }
                Err(error) => warn!(%error, "raw JSON appendix dropped"),
            }
        }

        RenderedDocument {
            blocks,
            placements,
            raw_json,
            footer: Some(Footer {
                source_keys,
                converted_at,
            }),
            error: None,
        }
    }
}

/// A non-empty object under a results key that is not itself a measurement.
fn is_group(value: &Value) -> bool {
    matches!(value, Value::Object(map) if !map.is_empty() && ClinicalValue::from_map(map).is_none())
}

fn flush(blocks: &mut Vec<DocNode>, pending: &mut Vec<ListItem>) {
    if !pending.is_empty() {
        blocks.push(DocNode::List(List {
            items: std::mem::take(pending),
            ordered: false,
        }));
    }
}

fn labelled_paragraph(label: &str, text: String) -> DocNode {
    DocNode::Paragraph(Paragraph {
        content: vec![
            InlineContent::Bold(vec![InlineContent::text(label)]),
            InlineContent::Text(format!(" {text}")),
        ],
    })
}
