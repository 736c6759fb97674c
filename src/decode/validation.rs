use crate::types::{Document, Value};
use crate::{Error, Result, Schema};

/// Checks every required entry of `schema` and reports all failures at once.
///
/// A scalar fails when it is absent, blank or not a scalar; an array fails when
/// it is absent, not an array or has no records. Missing names are listed in
/// schema order, scalars first.
pub fn validate_document(document: &Document, schema: &Schema) -> Result<()> {
    let mut missing = Vec::new();

    for name in &schema.required_scalars {
        if !has_scalar(document, name) {
            missing.push(name.to_string());
        }
    }
    for spec in &schema.required_arrays {
        if !has_records(document, &spec.name) {
            missing.push(spec.name.to_string());
        }
    }

    if missing.is_empty() {
        return Ok(());
    }
    log::debug!("document is missing {} required entries", missing.len());
    Err(Error::MissingRequiredFields { names: missing })
}

fn has_scalar(document: &Document, name: &str) -> bool {
    matches!(document.get(name), Some(Value::Scalar(value)) if !value.trim().is_empty())
}

fn has_records(document: &Document, name: &str) -> bool {
    matches!(document.get(name), Some(Value::Array(block)) if !block.is_empty())
}
