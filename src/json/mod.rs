//! JSON view of a [`Document`]: scalars become strings and array blocks become
//! lists of objects keyed by field name.

mod de;
mod ser;

use serde::ser::Error as _;
use serde::Serialize;

use crate::types::Document;

pub fn to_json_string(document: &Document) -> serde_json::Result<String> {
    serde_json::to_string(document)
}

pub fn to_json_string_pretty(document: &Document, indent: usize) -> serde_json::Result<String> {
    let indent_bytes = vec![b' '; indent];
    let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent_bytes);
    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    document.serialize(&mut serializer)?;
    String::from_utf8(out).map_err(serde_json::Error::custom)
}

pub fn from_json_str(input: &str) -> serde_json::Result<Document> {
    serde_json::from_str(input)
}
