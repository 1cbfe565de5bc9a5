//! Validation rules for frontmatter: required fields and allowed values.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{FrontmatterError, Result, SchemaError, Violation};
use crate::frontmatter::Frontmatter;
use crate::value::Value;

/// Built-in rule sets for planning documents.
const BUILTIN_SCHEMAS: &[(&str, &[&str])] = &[
    (
        "plan",
        &[
            "phase",
            "plan",
            "type",
            "wave",
            "depends_on",
            "files_modified",
            "autonomous",
            "must_haves",
        ],
    ),
    (
        "summary",
        &["phase", "plan", "subsystem", "tags", "duration", "completed"],
    ),
    ("verification", &["phase", "verified", "status", "score"]),
];

/// Rules a document's frontmatter must satisfy.
///
/// Loaded from YAML (or JSON):
/// ```yaml
/// name: task
/// required: [phase, type]
/// allowed:
///   type: [execute, tdd]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub required: Vec<String>,
    /// Field name to permitted plain-text values.
    #[serde(default, deserialize_with = "allowed_values")]
    pub allowed: BTreeMap<String, Vec<String>>,
}

impl Rules {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a built-in rule set by name.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownSchema`] listing the available names.
    pub fn builtin(name: &str) -> Result<Self> {
        let (_, fields) = BUILTIN_SCHEMAS
            .iter()
            .find(|(builtin, _)| *builtin == name)
            .ok_or_else(|| SchemaError::UnknownSchema {
                name: name.to_string(),
                available: Self::builtin_names(),
            })?;
        Ok(Self {
            name: Some(name.to_string()),
            required: fields.iter().map(ToString::to_string).collect(),
            allowed: BTreeMap::new(),
        })
    }

    #[must_use]
    pub fn builtin_names() -> Vec<&'static str> {
        BUILTIN_SCHEMAS.iter().map(|(name, _)| *name).collect()
    }

    /// Parse rules from YAML. JSON documents are accepted too.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::ParseError`] if the text is not a rules document.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let mut rules: Self = serde_yaml::from_str(text)
            .map_err(|e| FrontmatterError::from(SchemaError::ParseError(e.to_string())))?;
        let required = std::mem::take(&mut rules.required);
        Ok(required.into_iter().fold(rules, Self::require))
    }

    #[must_use]
    pub fn require(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        if !self.required.contains(&field) {
            self.required.push(field);
        }
        self
    }

    #[must_use]
    pub fn allow<I, S>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed
            .entry(field.into())
            .or_default()
            .extend(values.into_iter().map(Into::into));
        self
    }

    /// Combine with another rule set. Names are joined with `+`.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.name = match (self.name, other.name) {
            (Some(a), Some(b)) => Some(format!("{a}+{b}")),
            (a, b) => a.or(b),
        };
        for field in other.required {
            self = self.require(field);
        }
        for (field, values) in other.allowed {
            self = self.allow(field, values);
        }
        self
    }

    /// Check a mapping against these rules, collecting every violation.
    #[must_use]
    pub fn check(&self, fm: &Frontmatter) -> ValidationReport {
        let mut present = Vec::new();
        let mut missing = Vec::new();
        let mut violations = Vec::new();

        for field in &self.required {
            if fm.contains_key(field) {
                present.push(field.clone());
            } else {
                missing.push(field.clone());
                violations.push(Violation::MissingRequiredField {
                    field: field.clone(),
                });
            }
        }

        for (field, allowed) in &self.allowed {
            let Some(value) = fm.get(field) else {
                continue;
            };
            let candidates = match value {
                Value::Array(items) => items.as_slice(),
                scalar => std::slice::from_ref(scalar),
            };
            for candidate in candidates {
                let text = candidate.to_string();
                if !allowed.contains(&text) {
                    violations.push(Violation::InvalidEnumValue {
                        field: field.clone(),
                        value: text,
                        allowed: allowed.clone(),
                    });
                }
            }
        }

        ValidationReport {
            valid: violations.is_empty(),
            schema: self.name.clone(),
            present,
            missing,
            violations,
        }
    }
}

/// Outcome of checking a document against [`Rules`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub schema: Option<String>,
    /// Required fields that were found.
    pub present: Vec<String>,
    /// Required fields that were not found.
    pub missing: Vec<String>,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Turn a failing report into [`FrontmatterError::Validation`].
    ///
    /// # Errors
    ///
    /// Returns every violation when the report is not valid.
    pub fn into_result(self) -> Result<Self> {
        if self.valid {
            Ok(self)
        } else {
            Err(FrontmatterError::Validation(self.violations))
        }
    }
}

/// Allowed values may be written as strings, numbers or booleans.
fn allowed_values<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<String, Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let raw = BTreeMap::<String, Vec<serde_yaml::Value>>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(field, values)| {
            let values = values
                .into_iter()
                .map(|value| match value {
                    serde_yaml::Value::String(s) => Ok(s),
                    serde_yaml::Value::Number(n) => Ok(n.to_string()),
                    serde_yaml::Value::Bool(b) => Ok(b.to_string()),
                    other => Err(D::Error::custom(format!(
                        "allowed values for '{field}' must be scalars, got {other:?}"
                    ))),
                })
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok((field, values))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontmatter::parse;
    use crate::block::LineEnding;

    fn fm(content: &str) -> Frontmatter {
        parse(content, LineEnding::Lf)
    }

    #[test]
    fn missing_required_field_is_the_only_violation() {
        let rules = Rules::new().require("phase").require("type");
        let report = rules.check(&fm("phase: 01\n"));
        assert!(!report.valid);
        assert_eq!(report.present, ["phase"]);
        assert_eq!(report.missing, ["type"]);
        assert_eq!(
            report.violations,
            [Violation::MissingRequiredField {
                field: "type".to_string()
            }]
        );
    }

    #[test]
    fn reports_every_violation_at_once() {
        let rules = Rules::new()
            .require("phase")
            .require("type")
            .require("wave")
            .allow("status", ["active", "done"]);
        let report = rules.check(&fm("status: later\n"));
        let fields: Vec<_> = report.violations.iter().map(Violation::field).collect();
        assert_eq!(fields, ["phase", "type", "wave", "status"]);
        let err = report.into_result().unwrap_err();
        assert!(matches!(err, FrontmatterError::Validation(v) if v.len() == 4));
    }

    #[test]
    fn allowed_values_compare_plain_text() {
        let rules = Rules::new()
            .allow("wave", ["1", "2"])
            .allow("autonomous", ["true"])
            .allow("type", ["execute"]);
        let report = rules.check(&fm("wave: 2\nautonomous: true\ntype: \"execute\"\n"));
        assert!(report.valid, "{report:?}");
    }

    #[test]
    fn array_values_are_checked_per_element() {
        let rules = Rules::new().allow("tags", ["api", "db"]);
        let report = rules.check(&fm("tags: [api, ui, db, cli]\n"));
        let values: Vec<_> = report
            .violations
            .iter()
            .map(|v| match v {
                Violation::InvalidEnumValue { value, .. } => value.as_str(),
                Violation::MissingRequiredField { field } => field.as_str(),
            })
            .collect();
        assert_eq!(values, ["ui", "cli"]);
    }

    #[test]
    fn absent_constrained_field_is_not_a_violation() {
        let rules = Rules::new().allow("status", ["active"]);
        assert!(rules.check(&fm("phase: 01\n")).valid);
    }

    #[test]
    fn builtin_schemas() {
        let plan = Rules::builtin("plan").unwrap();
        assert_eq!(plan.name.as_deref(), Some("plan"));
        assert_eq!(plan.required.len(), 8);
        assert!(plan.required.contains(&"must_haves".to_string()));

        let err = Rules::builtin("bogus").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("bogus"));
        assert!(msg.contains("plan, summary, verification"));
    }

    #[test]
    fn rules_from_yaml_accept_scalar_allowed_values() {
        let rules = Rules::from_yaml(
            "name: task\nrequired: [phase, type]\nallowed:\n  type: [execute, tdd]\n  wave: [1, 2]\n",
        )
        .unwrap();
        assert_eq!(rules.name.as_deref(), Some("task"));
        assert_eq!(rules.required, ["phase", "type"]);
        assert_eq!(rules.allowed["wave"], ["1", "2"]);
    }

    #[test]
    fn rules_from_yaml_list_each_required_field_once() {
        let rules = Rules::from_yaml("required: [a, b, a]\n").unwrap();
        assert_eq!(rules.required, ["a", "b"]);
        let report = rules.check(&fm("b: 1\n"));
        assert_eq!(
            report.violations,
            [Violation::MissingRequiredField {
                field: "a".to_string()
            }]
        );
    }

    #[test]
    fn rules_from_json() {
        let rules = Rules::from_yaml(r#"{"required": ["phase"]}"#).unwrap();
        assert_eq!(rules.required, ["phase"]);
        assert!(rules.allowed.is_empty());
    }

    #[test]
    fn rules_from_yaml_rejects_nested_allowed_values() {
        let err = Rules::from_yaml("allowed:\n  type: [[a]]\n").unwrap_err();
        assert!(matches!(
            err,
            FrontmatterError::Schema(SchemaError::ParseError(_))
        ));
    }

    #[test]
    fn merge_combines_rules_without_duplicates() {
        let rules = Rules::builtin("verification")
            .unwrap()
            .merge(Rules::new().require("phase").require("owner").allow("status", ["passed"]));
        assert_eq!(rules.name.as_deref(), Some("verification"));
        assert_eq!(rules.required, ["phase", "verified", "status", "score", "owner"]);
        assert_eq!(rules.allowed["status"], ["passed"]);
    }
}
