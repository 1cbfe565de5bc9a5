//! Error types for mdfm.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Top-level result type for frontmatter operations.
pub type Result<T> = std::result::Result<T, FrontmatterError>;

/// Top-level error type for frontmatter operations.
#[derive(Debug, Error)]
pub enum FrontmatterError {
    #[error("Field not found: {0}")]
    FieldNotFound(String),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("invalid field name '{name}': {reason}")]
    InvalidFieldName { name: String, reason: &'static str },

    #[error("invalid patch: {0}")]
    InvalidPatch(String),

    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("validation failed: {}", join_violations(.0))]
    Validation(Vec<Violation>),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl FrontmatterError {
    /// Machine-readable category of this failure.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FieldNotFound(_) | Self::FileNotFound(_) => ErrorKind::NotFound,
            Self::InvalidFieldName { .. } | Self::InvalidPatch(_) | Self::Schema(_) => {
                ErrorKind::InvalidInput
            }
            Self::Validation(_) => ErrorKind::Validation,
            Self::Io(_) => ErrorKind::Io,
        }
    }
}

/// Broad failure categories, rendered in structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    Validation,
    Io,
}

/// Errors related to loading validation rules.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("unknown schema '{name}' (available: {})", .available.join(", "))]
    UnknownSchema {
        name: String,
        available: Vec<&'static str>,
    },

    #[error("rules parse error: {0}")]
    ParseError(String),
}

/// A single broken validation rule.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Violation {
    #[error("missing required field '{field}'")]
    MissingRequiredField { field: String },

    #[error("invalid value '{value}' for field '{field}': allowed values are {allowed:?}")]
    InvalidEnumValue {
        field: String,
        value: String,
        allowed: Vec<String>,
    },
}

impl Violation {
    /// Name of the field the rule applies to.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::MissingRequiredField { field } | Self::InvalidEnumValue { field, .. } => field,
        }
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
