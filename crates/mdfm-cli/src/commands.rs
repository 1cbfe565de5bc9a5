//! Subcommand implementations. Each returns the JSON to print.

use std::path::Path;

use serde_json::{json, Value as Json};
use tracing::info;

use mdfm_core::{Patch, Result, Rules, Value};

use crate::storage;

pub fn get(path: &Path, field: Option<&str>) -> Result<Json> {
    let text = storage::read(path)?;
    match field {
        Some(name) => {
            let value = mdfm_core::get_field(&text, name)?;
            let mut object = serde_json::Map::new();
            object.insert(name.to_string(), value.to_json());
            Ok(Json::Object(object))
        }
        None => Ok(mdfm_core::extract(&text).to_json()),
    }
}

pub fn set(path: &Path, field: &str, raw: &str) -> Result<Json> {
    let text = storage::read(path)?;
    let updated = mdfm_core::set_field(&text, field, raw)?;
    storage::write_if_changed(path, &text, &updated)?;
    info!(path = %path.display(), field, "set field");
    Ok(json!({
        "updated": true,
        "field": field,
        "value": Value::decode(raw).to_json(),
    }))
}

pub fn merge(path: &Path, data: &str) -> Result<Json> {
    let patch = Patch::from_json_str(data)?;
    let text = storage::read(path)?;
    let updated = mdfm_core::merge_fields(&text, &patch)?;
    storage::write_if_changed(path, &text, &updated)?;
    let fields: Vec<&str> = patch.names().collect();
    info!(path = %path.display(), count = fields.len(), "merged fields");
    Ok(json!({
        "merged": true,
        "fields": fields,
    }))
}

pub fn validate(
    path: &Path,
    schema: Option<&str>,
    rules_file: Option<&Path>,
    require: &[String],
) -> Result<Json> {
    let mut rules = match schema {
        Some(name) => Rules::builtin(name)?,
        None => Rules::new(),
    };
    if let Some(rules_path) = rules_file {
        rules = rules.merge(Rules::from_yaml(&storage::read(rules_path)?)?);
    }
    for field in require {
        rules = rules.require(field.as_str());
    }

    let text = storage::read(path)?;
    let report = mdfm_core::validate(&text, &rules);
    Ok(json!(report))
}
