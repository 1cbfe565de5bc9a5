//! Frontmatter values and the textual scalar codec.
//!
//! A value region is the text after the first colon of a `name: value`
//! line. Decoding infers the type from the text:
//!
//! ```text
//! "quoted"   -> String (JSON escapes honoured)
//! 'quoted'   -> String ('' is an escaped quote)
//! [a, "b"]   -> Array of scalars
//! true       -> Bool
//! 42, -1.5   -> Number (canonical JSON numbers only, so `01` stays a string)
//! anything   -> String
//! ```

use std::fmt;

use serde::Serialize;
use serde_json::Number;

/// A single frontmatter value.
///
/// Only flat scalars and single-level arrays of scalars are representable
/// in the line format; nested arrays are encoded as quoted strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Number(Number),
    Bool(bool),
    Null,
    Array(Vec<Value>),
}

impl Value {
    /// Decode a value region into a typed value.
    ///
    /// The region is trimmed first. An empty region decodes to an empty
    /// string; callers that see no value region at all (`name:`) produce
    /// [`Value::Null`] themselves.
    #[must_use]
    pub fn decode(text: &str) -> Self {
        let text = text.trim();
        if let Some(s) = unquote(text) {
            return Self::String(s);
        }
        if let Some(inner) = text.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
            return Self::Array(decode_items(inner));
        }
        decode_bare(text)
    }

    /// Encode this value as the text of a value region.
    ///
    /// [`Value::Null`] encodes to an empty string: it is represented by a
    /// line with nothing after the colon.
    #[must_use]
    pub fn encode(&self) -> String {
        match self {
            Self::String(s) if needs_quotes(s) => quote(s),
            Self::String(s) => s.clone(),
            Self::Number(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Null => String::new(),
            Self::Array(items) => {
                let parts: Vec<String> = items.iter().map(encode_item).collect();
                format!("[{}]", parts.join(", "))
            }
        }
    }

    /// Convert to a JSON value.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Number(n) => serde_json::Value::Number(n.clone()),
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Null => serde_json::Value::Null,
            Self::Array(items) => {
                serde_json::Value::Array(items.iter().map(Self::to_json).collect())
            }
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

/// Plain text form: strings are shown unquoted, arrays in their encoded form.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Null => f.write_str("null"),
            Self::Array(_) => f.write_str(&self.encode()),
        }
    }
}

/// Strip one layer of matching quotes.
fn unquote(text: &str) -> Option<String> {
    if text.len() < 2 {
        return None;
    }
    for q in ['"', '\''] {
        let Some(inner) = text.strip_prefix(q).and_then(|t| t.strip_suffix(q)) else {
            continue;
        };
        if q == '"' {
            let decoded = serde_json::from_str::<String>(text);
            return Some(decoded.unwrap_or_else(|_| inner.to_string()));
        }
        return Some(inner.replace("''", "'"));
    }
    None
}

/// Booleans, then canonical numbers, then raw string.
fn decode_bare(text: &str) -> Value {
    match text {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    match serde_json::from_str::<Number>(text) {
        Ok(n) => Value::Number(n),
        Err(_) => Value::String(text.to_string()),
    }
}

fn decode_items(inner: &str) -> Vec<Value> {
    split_items(inner)
        .into_iter()
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(decode_item)
        .collect()
}

/// Decode one trimmed array element; bare `null` is null here.
pub(crate) fn decode_item(item: &str) -> Value {
    if let Some(s) = unquote(item) {
        return Value::String(s);
    }
    if item == "null" {
        return Value::Null;
    }
    decode_bare(item)
}

/// Split an array body on commas that sit outside quoted elements and
/// nested brackets. A nested `[...]` element stays whole.
fn split_items(inner: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut start = 0;
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in inner.char_indices() {
        match quote {
            Some(q) => {
                if escaped {
                    escaped = false;
                } else if c == '\\' && q == '"' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
            }
            None => match c {
                // Quotes only open at the start of an element, so `don't` stays bare.
                '"' | '\'' if inner[start..i].trim().is_empty() => quote = Some(c),
                '[' => depth += 1,
                ']' => depth = depth.saturating_sub(1),
                ',' if depth == 0 => {
                    items.push(&inner[start..i]);
                    start = i + 1;
                }
                _ => {}
            },
        }
    }
    items.push(&inner[start..]);
    items
}

fn encode_item(item: &Value) -> String {
    match item {
        Value::String(s) => quote(s),
        Value::Null => "null".to_string(),
        Value::Array(_) => quote(&item.encode()),
        Value::Number(_) | Value::Bool(_) => item.encode(),
    }
}

fn quote(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

fn needs_quotes(s: &str) -> bool {
    s.is_empty()
        || s.trim() != s
        || s.starts_with('[')
        || s.contains([':', '"', '\'', '#'])
        || s.chars().any(char::is_control)
        || !matches!(decode_bare(s), Value::String(_))
}
