//! Per-call rendering state and the generic object/array rules.
//!
//! A [`RenderContext`] lives for exactly one conversion. It tracks the path
//! of the value being rendered (its length is the nesting depth), the active
//! section, which top-level keys are already consumed and the subtrees
//! queued for the Raw JSON appendix.
//!
//! Methods that take a value render the value at the *current* path; callers
//! enter the key or index first and leave it afterwards.

use super::clinical::{is_measurement, status_symbol, ClinicalValue};
use super::scalar::{is_scalar, scalar_inlines, scalar_text};
use super::sections::{SectionKind, LAB_GROUP_HEADING};
use crate::ir::nodes::{
    DocNode, Heading, InlineContent, List, ListItem, Paragraph, Table, TableCell, TableRow,
};
use crate::options::{Mode, RenderOptions};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use tracing::debug;

const TABLE_COLUMNS: [&str; 5] = ["Field", "Value", "Unit", "Reference", "Note"];
const CAPTION_KEYS: [&str; 3] = ["name", "title", "id"];

type Entry<'v> = (&'v str, &'v Value);

#[derive(Debug, Clone)]
enum PathSegment {
    Key(String),
    Index(usize),
}

pub(crate) struct RenderContext<'a> {
    options: &'a RenderOptions,
    mode: Mode,
    path: Vec<PathSegment>,
    /// Path length that counts as depth 0 (1 inside a top-level array item)
    base: usize,
    pub section: Option<SectionKind>,
    consumed: HashSet<String>,
    raw_json: Map<String, Value>,
}

impl<'a> RenderContext<'a> {
    pub fn new(options: &'a RenderOptions) -> Self {
        RenderContext {
            options,
            mode: options.mode,
            path: Vec::new(),
            base: 0,
            section: None,
            consumed: HashSet::new(),
            raw_json: Map::new(),
        }
    }

    pub fn options(&self) -> &'a RenderOptions {
        self.options
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn depth(&self) -> usize {
        self.path.len() - self.base
    }

    pub fn enter_key(&mut self, key: &str) {
        self.path.push(PathSegment::Key(key.to_string()));
    }

    pub fn enter_index(&mut self, index: usize) {
        self.path.push(PathSegment::Index(index));
    }

    pub fn leave(&mut self) {
        self.path.pop();
    }

    /// Start rendering element `index` of a top-level array as its own document.
    pub fn begin_item(&mut self, index: usize) {
        self.path.clear();
        self.path.push(PathSegment::Index(index));
        self.base = 1;
        self.consumed.clear();
        self.section = None;
    }

    pub fn end_item(&mut self) {
        self.path.clear();
        self.base = 0;
    }

    /// Mark a top-level key as rendered. Returns false if it already was.
    pub fn consume(&mut self, key: &str) -> bool {
        self.consumed.insert(key.to_string())
    }

    pub fn is_consumed(&self, key: &str) -> bool {
        self.consumed.contains(key)
    }

    pub fn into_raw_json(self) -> Map<String, Value> {
        self.raw_json
    }

    /// Dotted path of the current value: `deep.l2[3].name`.
    pub fn path_string(&self) -> String {
        let mut out = String::new();
        for segment in &self.path {
            match segment {
                PathSegment::Key(key) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(key);
                }
                PathSegment::Index(index) => out.push_str(&format!("[{index}]")),
            }
        }
        out
    }

    pub fn label(&self, key: &str) -> String {
        self.options.labels.normalize(key)
    }

    /// Labels for keys of one object; colliding labels keep their key.
    pub fn sibling_labels(&self, keys: &[&str]) -> Vec<String> {
        let labels: Vec<String> = keys.iter().map(|key| self.label(key)).collect();
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for label in &labels {
            *counts.entry(label.as_str()).or_default() += 1;
        }
        labels
            .iter()
            .zip(keys)
            .map(|(label, key)| {
                let suffix = format!("({key})");
                if counts[label.as_str()] > 1 && !label.ends_with(&suffix) {
                    format!("{label} {suffix}")
                } else {
                    label.clone()
                }
            })
            .collect()
    }

    /// Values that render on a single line: scalars, clinical values, empty containers.
    pub fn is_inline(value: &Value) -> bool {
        match value {
            Value::Object(map) => map.is_empty() || ClinicalValue::from_map(map).is_some(),
            Value::Array(items) => items.is_empty(),
            _ => true,
        }
    }

    /// If the current value is a container nested beyond `max_depth`, queue it
    /// for the Raw JSON block and return its `[...]` excerpt.
    pub fn truncate_if_deep(&mut self, value: &Value) -> Option<Vec<InlineContent>> {
        if Self::is_inline(value) || self.depth() <= self.options.max_depth {
            return None;
        }
        let excerpt = match value {
            Value::Object(map) => {
                let shown = self.options.excerpt_keys;
                let keys: Vec<&str> = map.keys().take(shown).map(String::as_str).collect();
                let more = if map.len() > shown { ", …" } else { "" };
                format!("[...] (keys: {}{more})", keys.join(", "))
            }
            Value::Array(items) => format!("[...] ({} items)", items.len()),
            _ => return None,
        };
        debug!(path = %self.path_string(), depth = self.depth(), "value truncated");
        self.queue_raw(value.clone());
        Some(vec![InlineContent::Text(excerpt)])
    }

    fn queue_raw(&mut self, value: Value) {
        let path = self.path_string();
        self.raw_json.insert(path, value);
    }

    /// Block-level rendering of the current value.
    pub fn value_blocks(
        &mut self,
        key: Option<&str>,
        value: &Value,
        heading_level: usize,
    ) -> Vec<DocNode> {
        if let Some(excerpt) = self.truncate_if_deep(value) {
            return vec![DocNode::Paragraph(Paragraph { content: excerpt })];
        }
        let date_style = self.options.date_style;
        match value {
            Value::Object(map) if map.is_empty() => vec![DocNode::Paragraph(Paragraph::text("—"))],
            Value::Array(items) if items.is_empty() => {
                vec![DocNode::Paragraph(Paragraph::text("—"))]
            }
            Value::Object(map) => {
                if let Some(clinical) = ClinicalValue::from_map(map) {
                    let name = key.map(|k| self.label(k)).unwrap_or_else(|| "Значение".into());
                    return vec![bullets(vec![ListItem::new(
                        clinical.inlines(&name, date_style),
                    )])];
                }
                let entries: Vec<Entry<'_>> = map.iter().map(|(k, v)| (k.as_str(), v)).collect();
                self.entries_blocks(&entries, heading_level)
            }
            Value::Array(items) => self.array_nodes(key, items, true),
            scalar => vec![DocNode::Paragraph(Paragraph {
                content: scalar_inlines(key, scalar, date_style),
            })],
        }
    }

    /// Block-level rendering of the fields of one object.
    ///
    /// Clinical values under known lab keys are pulled out under a
    /// `Лабораторные данные` heading at `heading_level`; the rest becomes a
    /// table or a bullet list.
    pub fn entries_blocks(&mut self, entries: &[Entry<'_>], heading_level: usize) -> Vec<DocNode> {
        let labels = &self.options.labels;
        let (labs, rest): (Vec<Entry<'_>>, Vec<Entry<'_>>) =
            entries.iter().copied().partition(|(key, value)| {
                labels.is_lab_key(key) && ClinicalValue::from_value(value).is_some()
            });

        let mut blocks = Vec::new();
        if !rest.is_empty() {
            if self.table_fits(&rest) {
                blocks.push(DocNode::Table(self.field_table(&rest)));
            } else {
                blocks.push(bullets(self.field_items(&rest)));
            }
        }
        if !labs.is_empty() {
            debug!(count = labs.len(), "grouping laboratory values");
            blocks.push(DocNode::Heading(Heading::new(
                heading_level,
                LAB_GROUP_HEADING,
            )));
            blocks.push(bullets(self.field_items(&labs)));
        }
        blocks
    }

    fn table_fits(&self, entries: &[Entry<'_>]) -> bool {
        self.options.tables_enabled(self.mode)
            && entries.len() > self.options.table_threshold
            && entries
                .iter()
                .all(|(_, value)| is_scalar(value) || is_measurement(value))
    }

    /// `Field | Value | Unit | Reference | Note` table of simple fields.
    fn field_table(&self, entries: &[Entry<'_>]) -> Table {
        let date_style = self.options.date_style;
        let keys: Vec<&str> = entries.iter().map(|(key, _)| *key).collect();
        let labels = self.sibling_labels(&keys);

        let rows = entries
            .iter()
            .zip(labels)
            .map(|((key, value), label)| match value {
                Value::Object(map) => {
                    let field = map
                        .get("name")
                        .and_then(Value::as_str)
                        .map(String::from)
                        .unwrap_or(label);
                    let unit = map.get("unit").filter(|u| !u.is_null() && u.as_str() != Some(""));
                    // temperature suffix only applies when no unit is given
                    let value_key = if unit.is_none() { Some(*key) } else { None };
                    let cell = |name: &str| {
                        map.get(name)
                            .map(|v| scalar_text(None, v, date_style))
                            .unwrap_or_default()
                    };
                    let mut notes = Vec::new();
                    if let Some(note) = map.get("note") {
                        notes.push(scalar_text(None, note, date_style));
                    }
                    if let Some(status) = map.get("status") {
                        let status = scalar_text(None, status, date_style);
                        notes.push(status_symbol(&status).to_string());
                    }
                    TableRow::from_texts([
                        field,
                        map.get("value")
                            .map(|v| scalar_text(value_key, v, date_style))
                            .unwrap_or_default(),
                        unit.map(|u| scalar_text(None, u, date_style))
                            .unwrap_or_default(),
                        cell("reference"),
                        notes.join("; "),
                    ])
                }
                scalar => {
                    let note = if scalar.is_null() { "null" } else { "" };
                    TableRow::from_texts([
                        label,
                        scalar_text(Some(*key), scalar, date_style),
                        String::new(),
                        String::new(),
                        note.to_string(),
                    ])
                }
            })
            .collect();

        Table {
            header: TableRow::from_texts(TABLE_COLUMNS),
            rows,
        }
    }

    /// One `- <Label>: <value>` bullet per entry.
    pub fn field_items(&mut self, entries: &[Entry<'_>]) -> Vec<ListItem> {
        let keys: Vec<&str> = entries.iter().map(|(key, _)| *key).collect();
        let labels = self.sibling_labels(&keys);
        let mut items = Vec::with_capacity(entries.len());
        for ((key, value), label) in entries.iter().zip(labels) {
            self.enter_key(key);
            items.push(self.field_item(key, value, &label));
            self.leave();
        }
        items
    }

    /// Bullet for the current value, shown under `label`.
    pub fn field_item(&mut self, key: &str, value: &Value, label: &str) -> ListItem {
        let date_style = self.options.date_style;
        if let Some(excerpt) = self.truncate_if_deep(value) {
            let mut content = vec![InlineContent::Text(format!("{label}: "))];
            content.extend(excerpt);
            return ListItem::new(content);
        }
        match value {
            Value::Object(map) if map.is_empty() => ListItem::text(format!("{label}: —")),
            Value::Array(items) if items.is_empty() => ListItem::text(format!("{label}: —")),
            Value::Object(map) => {
                if let Some(clinical) = ClinicalValue::from_map(map) {
                    return ListItem::new(clinical.inlines(label, date_style));
                }
                let entries: Vec<Entry<'_>> = map.iter().map(|(k, v)| (k.as_str(), v)).collect();
                let children = self.field_items(&entries);
                ListItem::with_children(
                    vec![InlineContent::Text(format!("{label}:"))],
                    vec![bullets(children)],
                )
            }
            Value::Array(items) => {
                let children = self.array_nodes(Some(key), items, false);
                ListItem::with_children(vec![InlineContent::Text(format!("{label}:"))], children)
            }
            scalar => {
                let mut content = vec![InlineContent::Text(format!("{label}: "))];
                content.extend(scalar_inlines(Some(key), scalar, date_style));
                ListItem::new(content)
            }
        }
    }

    /// Rendering of a non-empty array. Tables are only produced at block level.
    pub fn array_nodes(&mut self, key: Option<&str>, items: &[Value], block: bool) -> Vec<DocNode> {
        if items.iter().all(is_scalar) {
            return vec![DocNode::List(self.primitive_list(key, items))];
        }
        if block && self.options.tables_enabled(self.mode) {
            if let Some(table) = self.record_table(items) {
                return vec![DocNode::Table(table)];
            }
        }
        let mut list_items = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            self.enter_index(index);
            list_items.push(self.element_item(key, index, item));
            self.leave();
        }
        vec![DocNode::List(List {
            items: list_items,
            ordered: true,
        })]
    }

    fn primitive_list(&mut self, key: Option<&str>, items: &[Value]) -> List {
        let date_style = self.options.date_style;
        let cap = self.options.array_cap(self.mode);
        let shown = if items.len() > cap {
            self.options.truncated_preview.min(items.len())
        } else {
            items.len()
        };

        let mut list_items: Vec<ListItem> = items[..shown]
            .iter()
            .map(|item| ListItem::new(scalar_inlines(key, item, date_style)))
            .collect();
        if shown < items.len() {
            debug!(path = %self.path_string(), len = items.len(), "array truncated");
            list_items.push(ListItem::text(format!(
                "... (+{} more)",
                items.len() - shown
            )));
            self.queue_raw(Value::Array(items.to_vec()));
        }
        List {
            items: list_items,
            ordered: false,
        }
    }

    /// Summary table for an array of flat records sharing one key set.
    fn record_table(&self, items: &[Value]) -> Option<Table> {
        if items.len() < 2 || self.depth() + 1 > self.options.max_depth {
            return None;
        }
        let first = items[0].as_object()?;
        if first.is_empty() {
            return None;
        }
        let columns: Vec<&str> = first.keys().map(String::as_str).collect();
        for item in items {
            let record = item.as_object()?;
            let same_keys =
                record.len() == columns.len() && columns.iter().all(|c| record.contains_key(*c));
            if !same_keys || !record.values().all(is_scalar) {
                return None;
            }
        }

        let date_style = self.options.date_style;
        let header = TableRow {
            cells: self
                .sibling_labels(&columns)
                .into_iter()
                .map(TableCell::text)
                .collect(),
        };
        let rows = items
            .iter()
            .filter_map(Value::as_object)
            .map(|record| TableRow {
                cells: columns
                    .iter()
                    .map(|column| TableCell {
                        content: record
                            .get(*column)
                            .map(|v| scalar_inlines(Some(*column), v, date_style))
                            .unwrap_or_default(),
                    })
                    .collect(),
            })
            .collect();
        Some(Table { header, rows })
    }

    /// Numbered entry for element `index` of an array of objects (or a mixed array).
    fn element_item(&mut self, key: Option<&str>, index: usize, item: &Value) -> ListItem {
        let date_style = self.options.date_style;
        let fallback = format!("Элемент {}", index + 1);
        if let Some(excerpt) = self.truncate_if_deep(item) {
            return ListItem::new(excerpt);
        }
        match item {
            Value::Object(map) if map.is_empty() => ListItem::text("—"),
            Value::Array(inner) if inner.is_empty() => ListItem::text("—"),
            Value::Object(map) => {
                if let Some(clinical) = ClinicalValue::from_map(map) {
                    return ListItem::new(clinical.inlines(&fallback, date_style));
                }
                let caption = CAPTION_KEYS.iter().find_map(|caption_key| {
                    map.get_key_value(*caption_key)
                        .filter(|(_, v)| v.is_string() || v.is_number())
                });
                let caption_text = match caption {
                    Some((k, v)) => scalar_text(Some(k.as_str()), v, date_style),
                    None => fallback,
                };
                let caption_key = caption.map(|(k, _)| k.as_str());
                let entries: Vec<Entry<'_>> = map
                    .iter()
                    .filter(|(k, _)| Some(k.as_str()) != caption_key)
                    .map(|(k, v)| (k.as_str(), v))
                    .collect();
                if entries.is_empty() {
                    return ListItem::text(caption_text);
                }
                let children = self.field_items(&entries);
                ListItem::with_children(
                    vec![InlineContent::Text(caption_text)],
                    vec![bullets(children)],
                )
            }
            Value::Array(inner) => {
                let children = self.array_nodes(key, inner, false);
                ListItem::with_children(vec![InlineContent::Text(fallback)], children)
            }
            scalar => ListItem::new(scalar_inlines(key, scalar, date_style)),
        }
    }
}

fn bullets(items: Vec<ListItem>) -> DocNode {
    DocNode::List(List {
        items,
        ordered: false,
    })
}
