//! Ordered sets of field updates applied by a merge.

use crate::error::{FrontmatterError, Result};
use crate::value::Value;

/// Field updates, applied in insertion order.
///
/// Every name in a patch is a valid single-line field name, so applying a
/// patch cannot fail halfway.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    entries: Vec<(String, Value)>,
}

impl Patch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a typed value. A repeated name replaces the earlier value.
    ///
    /// # Errors
    ///
    /// Returns [`FrontmatterError::InvalidFieldName`] if `name` cannot be
    /// written as a field line.
    pub fn insert(&mut self, name: &str, value: Value) -> Result<()> {
        check_field_name(name)?;
        match self.entries.iter_mut().find(|(existing, _)| existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name.to_string(), value)),
        }
        Ok(())
    }

    /// Add a raw textual value, decoded the same way as a field line.
    ///
    /// # Errors
    ///
    /// Returns [`FrontmatterError::InvalidFieldName`] for an unusable name.
    pub fn insert_raw(&mut self, name: &str, raw: &str) -> Result<()> {
        self.insert(name, Value::decode(raw))
    }

    /// Build a patch from a JSON object.
    ///
    /// String members are decoded as raw values; numbers, booleans and null
    /// are taken as they are; arrays may only hold scalars.
    ///
    /// # Errors
    ///
    /// Returns [`FrontmatterError::InvalidPatch`] if `json` is not an object
    /// or holds nested values.
    pub fn from_json(json: &serde_json::Value) -> Result<Self> {
        let object = json.as_object().ok_or_else(|| {
            FrontmatterError::InvalidPatch("expected a JSON object of field updates".to_string())
        })?;
        let mut patch = Self::new();
        for (name, member) in object {
            patch.insert(name, value_from_json(name, member)?)?;
        }
        Ok(patch)
    }

    /// Parse JSON text and build a patch from it.
    ///
    /// # Errors
    ///
    /// Returns [`FrontmatterError::InvalidPatch`] for malformed JSON or an
    /// unsupported shape.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let json: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| FrontmatterError::InvalidPatch(format!("malformed JSON: {e}")))?;
        Self::from_json(&json)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

/// Reject names that would not read back as the same field.
///
/// # Errors
///
/// Returns [`FrontmatterError::InvalidFieldName`] describing the problem.
pub fn check_field_name(name: &str) -> Result<()> {
    let reason = if name.is_empty() {
        "name is empty"
    } else if name.trim() != name {
        "name has leading or trailing whitespace"
    } else if name.contains(':') {
        "name contains ':'"
    } else if name.chars().any(char::is_control) {
        "name contains a control character"
    } else if name.starts_with('#') {
        "name starts with '#'"
    } else if name.starts_with("- ") {
        "name would be read as a sequence item"
    } else {
        return Ok(());
    };
    Err(FrontmatterError::InvalidFieldName {
        name: name.to_string(),
        reason,
    })
}

fn value_from_json(name: &str, json: &serde_json::Value) -> Result<Value> {
    use serde_json::Value as Json;

    let nested = || {
        FrontmatterError::InvalidPatch(format!(
            "field '{name}': nested objects and arrays are not supported"
        ))
    };
    match json {
        Json::String(s) => Ok(Value::decode(s)),
        Json::Array(items) => items
            .iter()
            .map(|item| match item {
                Json::String(s) => Ok(Value::String(s.clone())),
                Json::Array(_) | Json::Object(_) => Err(nested()),
                scalar => scalar_from_json(scalar).ok_or_else(nested),
            })
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        Json::Object(_) => Err(nested()),
        scalar => scalar_from_json(scalar).ok_or_else(nested),
    }
}

fn scalar_from_json(json: &serde_json::Value) -> Option<Value> {
    match json {
        serde_json::Value::Number(n) => Some(Value::Number(n.clone())),
        serde_json::Value::Bool(b) => Some(Value::Bool(*b)),
        serde_json::Value::Null => Some(Value::Null),
        _ => None,
    }
}
