//! Frontmatter operations over whole document text.
//!
//! Every operation parses the document afresh and returns either data or a
//! complete replacement document. Nothing here touches the filesystem; the
//! body of a document is never inspected or altered.

use tracing::debug;

use crate::document::Document;
use crate::error::{FrontmatterError, Result};
use crate::frontmatter::Frontmatter;
use crate::patch::Patch;
use crate::schema::{Rules, ValidationReport};
use crate::value::Value;

/// Parse the frontmatter of `text`. No block means an empty mapping.
#[must_use]
pub fn extract(text: &str) -> Frontmatter {
    Document::new(text).frontmatter()
}

/// Read a single field.
///
/// # Errors
///
/// Returns [`FrontmatterError::FieldNotFound`] if the field is absent.
pub fn get_field(text: &str, field: &str) -> Result<Value> {
    extract(text)
        .get(field)
        .cloned()
        .ok_or_else(|| FrontmatterError::FieldNotFound(field.to_string()))
}

/// Set one field from its raw textual value and return the new document.
///
/// `raw` is decoded like a field line, so `["a","b"]` becomes an array
/// and `true` a boolean.
///
/// # Errors
///
/// Returns [`FrontmatterError::InvalidFieldName`] if `field` cannot be
/// written as a field line.
pub fn set_field(text: &str, field: &str, raw: &str) -> Result<String> {
    let mut patch = Patch::new();
    patch.insert_raw(field, raw)?;
    merge_fields(text, &patch)
}

/// Apply every update in `patch` with one parse and one serialization.
///
/// An empty patch returns the input unchanged.
///
/// # Errors
///
/// Never fails for a well-formed [`Patch`]; the `Result` keeps the
/// signature uniform with [`set_field`].
pub fn merge_fields(text: &str, patch: &Patch) -> Result<String> {
    if patch.is_empty() {
        debug!("empty patch, document unchanged");
        return Ok(text.to_string());
    }

    let doc = Document::new(text);
    let mut fm = doc.frontmatter();
    for (name, value) in patch.iter() {
        let previous = fm.insert(name, value.clone());
        debug!(field = name, created = previous.is_none(), "set field");
    }
    Ok(doc.with_frontmatter(&fm))
}

/// Check the frontmatter of `text` against `rules`.
#[must_use]
pub fn validate(text: &str, rules: &Rules) -> ValidationReport {
    let report = rules.check(&extract(text));
    debug!(
        valid = report.valid,
        violations = report.violations.len(),
        "validated frontmatter"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Violation;

    #[test]
    fn get_field_reads_string_values() {
        let text = "---\nphase: 01\nplan: 01\ntype: execute\n---\nbody text";
        assert_eq!(get_field(text, "phase").unwrap(), Value::from("01"));
        assert_eq!(get_field(text, "type").unwrap(), Value::from("execute"));
    }

    #[test]
    fn get_missing_field_fails() {
        let err = get_field("---\nphase: 01\n---\n", "nonexistent").unwrap_err();
        assert!(err.to_string().contains("Field not found"));
    }

    #[test]
    fn extract_without_frontmatter_is_empty() {
        assert!(extract("Plain text with no frontmatter delimiters.").is_empty());
        assert!(extract("").is_empty());
        assert!(extract("---\nunterminated: yes\n").is_empty());
    }

    #[test]
    fn extract_whole_mapping() {
        let fm = extract("---\nphase: 01\nplan: 01\ntype: execute\n---\nbody text");
        let json = serde_json::to_value(&fm).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"phase": "01", "plan": "01", "type": "execute"})
        );
    }

    #[test]
    fn set_field_adds_new_field_and_keeps_body() {
        let out = set_field("---\nphase: 01\n---\nbody", "status", "active").unwrap();
        assert_eq!(out, "---\nphase: 01\nstatus: active\n---\nbody");
        let fm = extract(&out);
        assert_eq!(fm.get("status"), Some(&Value::from("active")));
        assert_eq!(fm.get("phase"), Some(&Value::from("01")));
        assert_eq!(Document::new(&out).body(), "\nbody");
    }

    #[test]
    fn set_field_updates_in_place() {
        let text = "---\nphase: 01\ntype: execute\nwave: 1\n---\nbody";
        let out = set_field(text, "type", "tdd").unwrap();
        assert_eq!(out, "---\nphase: 01\ntype: tdd\nwave: 1\n---\nbody");
    }

    #[test]
    fn set_field_decodes_json_arrays() {
        let out = set_field("---\nphase: 01\n---\nbody", "tags", r#"["a","b"]"#).unwrap();
        assert_eq!(
            get_field(&out, "tags").unwrap(),
            Value::Array(vec![Value::from("a"), Value::from("b")])
        );
    }

    #[test]
    fn set_field_preserves_markdown_body() {
        let body = "\n\n# My Heading\n\nSome paragraph with special chars: $, %, &.";
        let text = format!("---\nphase: 01\n---{body}");
        let out = set_field(&text, "phase", "02").unwrap();
        assert!(out.contains("# My Heading"));
        assert!(out.contains("Some paragraph with special chars: $, %, &."));
        assert!(out.ends_with(body));
        assert_eq!(get_field(&out, "phase").unwrap(), Value::from("02"));
    }

    #[test]
    fn set_field_creates_block_when_absent() {
        let out = set_field("# Title\n", "phase", "01").unwrap();
        assert_eq!(out, "---\nphase: 01\n---\n\n# Title\n");
    }

    #[test]
    fn set_field_rejects_bad_names() {
        let err = set_field("---\n---\n", "a: b", "x").unwrap_err();
        assert!(matches!(err, FrontmatterError::InvalidFieldName { .. }));
    }

    #[test]
    fn set_field_with_same_value_is_identity() {
        let text = "---\ntitle: 'Hello'\ntags:\n  - a\n---\nbody";
        assert_eq!(set_field(text, "title", "Hello").unwrap(), text);
        assert_eq!(set_field(text, "tags", r#"["a"]"#).unwrap(), text);
    }

    #[test]
    fn set_field_updates_dash_led_field_in_place() {
        let text = "---\n-x: 1\nphase: 01\n---\n";
        assert_eq!(get_field(text, "-x").unwrap(), Value::from(1_i64));
        let out = set_field(text, "-x", "2").unwrap();
        assert_eq!(out, "---\n-x: 2\nphase: 01\n---\n");
    }

    #[test]
    fn set_field_on_unterminated_block_prepends_a_new_one() {
        let out = set_field("---\nphase: 01\n", "status", "x").unwrap();
        assert_eq!(out, "---\nstatus: x\n---\n\n---\nphase: 01\n");
    }

    #[test]
    fn merge_with_empty_patch_is_identity() {
        for text in ["---\nphase: 01\n---\nbody", "no frontmatter", "---\nbroken\n"] {
            assert_eq!(merge_fields(text, &Patch::new()).unwrap(), text);
        }
    }

    #[test]
    fn merge_applies_patch_in_order() {
        let text = "---\nphase: 01\nstatus: draft\n---\n\nbody\n";
        let patch =
            Patch::from_json_str(r#"{"wave": 2, "status": "active", "owner": "ana"}"#).unwrap();
        let out = merge_fields(text, &patch).unwrap();
        assert_eq!(
            out,
            "---\nphase: 01\nstatus: active\nwave: 2\nowner: ana\n---\n\nbody\n"
        );
    }

    #[test]
    fn merge_is_idempotent() {
        let text = "---\nphase: 01\n---\nbody";
        let patch = Patch::from_json_str(r#"{"status": "active", "tags": ["x"]}"#).unwrap();
        let once = merge_fields(text, &patch).unwrap();
        let twice = merge_fields(&once, &patch).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn validate_reports_single_missing_field() {
        let rules = Rules::new().require("phase").require("type");
        let report = validate("---\nphase: 01\n---\n", &rules);
        assert!(!report.valid);
        assert_eq!(
            report.violations,
            [Violation::MissingRequiredField {
                field: "type".to_string()
            }]
        );
    }

    #[test]
    fn validate_document_without_frontmatter_misses_everything() {
        let report = validate("just text", &Rules::builtin("verification").unwrap());
        assert_eq!(report.missing, ["phase", "verified", "status", "score"]);
        assert!(report.present.is_empty());
    }
}
