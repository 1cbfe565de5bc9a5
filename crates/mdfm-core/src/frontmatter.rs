//! The ordered frontmatter mapping, and parsing/serializing block content.
//!
//! Format:
//! ```markdown
//! ---
//! phase: 01
//! type: execute
//! tags: ["api", "db"]
//! depends_on:
//!   - 01-01
//! ---
//!
//! ## Body content here
//! ```
//!
//! Every field remembers the exact text it was parsed from. Serializing
//! emits that text for untouched fields, so a block that was not mutated
//! comes back byte for byte, comments and stray lines included.

use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::trace;

use crate::block::{LineEnding, Lines, DELIMITER};
use crate::value::{self, Value};

#[derive(Debug, Clone)]
struct Field {
    name: String,
    value: Value,
    /// Original lines (terminators included); `None` once the value changes.
    source: Option<String>,
}

#[derive(Debug, Clone)]
enum Entry {
    Field(Field),
    /// Blank, comment, stray or shadowed lines, kept only for serialization.
    Verbatim(String),
}

/// An ordered mapping of field name to [`Value`].
#[derive(Debug, Clone, Default)]
pub struct Frontmatter {
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
    line_ending: LineEnding,
}

impl Frontmatter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_line_ending(line_ending: LineEnding) -> Self {
        Self {
            line_ending,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.index.get(name).and_then(|&i| match &self.entries[i] {
            Entry::Field(field) => Some(&field.value),
            Entry::Verbatim(_) => None,
        })
    }

    /// Set a field, returning the previous value.
    ///
    /// An existing field keeps its position; a new one is appended after
    /// everything else. Setting a field to the value it already holds
    /// leaves its original text untouched.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        let name = name.into();
        if let Some(&i) = self.index.get(&name) {
            if let Entry::Field(field) = &mut self.entries[i] {
                if field.value == value {
                    return Some(value);
                }
                field.source = None;
                return Some(std::mem::replace(&mut field.value, value));
            }
        }
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push(Entry::Field(Field {
            name,
            value,
            source: None,
        }));
        None
    }

    /// Fields in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Field(field) => Some((field.name.as_str(), &field.value)),
            Entry::Verbatim(_) => None,
        })
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|(name, _)| name)
    }

    /// The mapping as a JSON object, field order preserved.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_json()))
            .collect();
        serde_json::Value::Object(map)
    }

    /// Render the whole block, delimiters included.
    ///
    /// The closing `---` carries no line terminator: the terminator that
    /// followed it belongs to the body.
    #[must_use]
    pub fn to_block(&self) -> String {
        let nl = self.line_ending.as_str();
        let mut out = String::with_capacity(64 + self.entries.len() * 32);
        out.push_str(DELIMITER);
        out.push_str(nl);
        for entry in &self.entries {
            match entry {
                Entry::Verbatim(text)
                | Entry::Field(Field {
                    source: Some(text), ..
                }) => out.push_str(text),
                Entry::Field(field) => {
                    out.push_str(&render_line(&field.name, &field.value));
                    out.push_str(nl);
                }
            }
        }
        out.push_str(DELIMITER);
        out
    }

    /// Record a parsed field. A repeated name shadows the earlier line,
    /// which is kept as inert text.
    fn push_parsed(&mut self, name: &str, value: Value, raw: &str) -> usize {
        let position = self.entries.len();
        if let Some(previous) = self.index.insert(name.to_string(), position) {
            trace!(field = name, "duplicate field, last occurrence wins");
            let shadowed = std::mem::replace(
                &mut self.entries[previous],
                Entry::Verbatim(String::new()),
            );
            self.entries[previous] = match shadowed {
                Entry::Field(field) => Entry::Verbatim(field.source.unwrap_or_default()),
                verbatim @ Entry::Verbatim(_) => verbatim,
            };
        }
        self.entries.push(Entry::Field(Field {
            name: name.to_string(),
            value,
            source: Some(raw.to_string()),
        }));
        position
    }

    fn field_mut(&mut self, position: usize) -> Option<&mut Field> {
        match self.entries.get_mut(position) {
            Some(Entry::Field(field)) => Some(field),
            _ => None,
        }
    }
}

/// Field-wise equality: order, names and values. Formatting is ignored.
impl PartialEq for Frontmatter {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Serialize for Frontmatter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

fn render_line(name: &str, value: &Value) -> String {
    match value {
        Value::Null => format!("{name}:"),
        _ => format!("{name}: {}", value.encode()),
    }
}

/// A field that may still absorb indented or `- item` lines.
struct OpenField {
    position: usize,
    /// Block sequence items; `None` once a non-item line shows up or when
    /// the field already had an inline value.
    items: Option<Vec<Value>>,
}

impl OpenField {
    fn close(self, fm: &mut Frontmatter) {
        if let Some(items) = self.items.filter(|items| !items.is_empty()) {
            if let Some(field) = fm.field_mut(self.position) {
                field.value = Value::Array(items);
            }
        }
    }
}

/// Parse the lines between the delimiters.
///
/// Lines that are not `name: value` fields are skipped for the mapping
/// but kept for serialization.
#[must_use]
pub fn parse(content: &str, line_ending: LineEnding) -> Frontmatter {
    let mut fm = Frontmatter::with_line_ending(line_ending);
    let mut open: Option<OpenField> = None;

    for line in Lines::new(content) {
        let text = line.content;

        if is_continuation(text) {
            if let Some(current) = open.as_mut() {
                if let Some(field) = fm.field_mut(current.position) {
                    if let Some(source) = field.source.as_mut() {
                        source.push_str(line.raw);
                    }
                }
                current.items = current
                    .items
                    .take()
                    .and_then(|mut items| sequence_item(text).map(|item| {
                        items.push(item);
                        items
                    }));
                continue;
            }
        }

        if let Some(current) = open.take() {
            current.close(&mut fm);
        }

        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            fm.entries.push(Entry::Verbatim(line.raw.to_string()));
            continue;
        }

        match text.split_once(':') {
            Some((name, rest)) if !is_continuation(text) && !name.trim().is_empty() => {
                let value = if rest.is_empty() {
                    Value::Null
                } else {
                    Value::decode(rest)
                };
                let position = fm.push_parsed(name.trim(), value, line.raw);
                open = Some(OpenField {
                    position,
                    items: rest.trim().is_empty().then(Vec::new),
                });
            }
            _ => {
                trace!(line = text, "skipping line that is not a field");
                fm.entries.push(Entry::Verbatim(line.raw.to_string()));
            }
        }
    }

    if let Some(current) = open {
        current.close(&mut fm);
    }
    fm
}

/// Indented lines and `- item` lines belong to the preceding field.
fn is_continuation(text: &str) -> bool {
    (text.starts_with([' ', '\t']) && !text.trim().is_empty())
        || text.starts_with("- ")
        || text == "-"
}

fn sequence_item(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    let item = trimmed
        .strip_prefix("- ")
        .or_else(|| (trimmed == "-").then_some(""))?;
    let item = item.trim();
    Some(if item.is_empty() {
        Value::Null
    } else {
        value::decode_item(item)
    })
}
