//! Reader and writer for the line-oriented meeting-minutes format.
//!
//! ```text
//! local: Room A
//! objetivo: Plan launch
//!
//! participantes[2]{num,nome}:
//! 1,Alice
//! 2,Bob
//! ```
//!
//! Parsing and validation are separate steps: [`parse`] only enforces the
//! structure (headers, row widths, declared row counts) while [`validate`]
//! checks that the required entries of a [`Schema`] are present.

pub mod decode;
pub mod encode;
pub mod error;
pub mod json;
pub mod options;
#[cfg(feature = "parallel")]
pub mod parallel;
pub mod types;

pub use crate::decode::classify::{classify_line, is_data_row, Header, LineKind};
pub use crate::decode::{Parsed, SkipReason, SkippedLine};
pub use crate::error::{Error, ErrorKind, ErrorReport, Location, RowWidthError};
pub use crate::json::{from_json_str, to_json_string, to_json_string_pretty};
pub use crate::options::{ArraySpec, ParseOptions, Schema};
#[cfg(feature = "parallel")]
pub use crate::parallel::parse_batch;
pub use crate::types::{ArrayBlock, Document, Record, Value};

pub type Result<T> = std::result::Result<T, Error>;

pub fn parse(input: &str) -> Result<Document> {
    parse_with_options(input, &ParseOptions::default())
}

pub fn parse_with_options(input: &str, options: &ParseOptions) -> Result<Document> {
    decode::parse(input, options)
}

/// Like [`parse_with_options`], also returning the lines that were skipped.
pub fn parse_detailed(input: &str, options: &ParseOptions) -> Result<Parsed> {
    decode::parse_detailed(input, options)
}

pub fn validate(document: &Document) -> Result<()> {
    validate_with(document, &Schema::default())
}

pub fn validate_with(document: &Document, schema: &Schema) -> Result<()> {
    decode::validation::validate_document(document, schema)
}

/// Parses with default options and validates against the meeting-minutes schema.
pub fn parse_and_validate(input: &str) -> Result<Document> {
    let document = parse(input)?;
    validate(&document)?;
    Ok(document)
}

pub fn serialize(document: &Document) -> String {
    serialize_with(document, &Schema::default())
}

pub fn serialize_with(document: &Document, schema: &Schema) -> String {
    encode::serialize(document, schema)
}
