//! # mdfm-core
//!
//! Reading and rewriting the `---` delimited frontmatter of text documents.
//!
//! The crate is a set of pure functions over document text:
//! - [`extract`] / [`get_field`] read the mapping or one field
//! - [`set_field`] / [`merge_fields`] return the rewritten document
//! - [`validate`] checks required fields and allowed values ([`Rules`])
//!
//! Building blocks:
//! - [`Value`] and its textual codec ([`value`])
//! - the block locator ([`block`]) and [`Document`]
//! - the ordered [`Frontmatter`] mapping with its parser and serializer
//! - error hierarchy ([`FrontmatterError`], [`SchemaError`], [`Violation`])
//!
//! Rewriting only ever replaces the block. The body comes back byte for
//! byte, and fields that were not touched keep their original text.

pub mod block;
pub mod document;
pub mod error;
pub mod frontmatter;
pub mod ops;
pub mod patch;
pub mod schema;
pub mod value;

pub use block::{BlockLocation, BlockSpan, LineEnding};
pub use document::Document;
pub use error::{ErrorKind, FrontmatterError, Result, SchemaError, Violation};
pub use frontmatter::Frontmatter;
pub use ops::{extract, get_field, merge_fields, set_field, validate};
pub use patch::Patch;
pub use schema::{Rules, ValidationReport};
pub use value::Value;
