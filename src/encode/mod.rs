mod writer;

use crate::types::{ArrayBlock, Document};
use crate::Schema;

use writer::Writer;

/// Renders `document` in canonical form.
///
/// Scalars come first: the schema's required scalars in schema order, then the
/// rest in insertion order. A blank line separates the scalar block from the
/// arrays and each array from the next; arrays follow the same ordering rule.
/// Headers always use single braces and the output has no trailing newline.
pub fn serialize(document: &Document, schema: &Schema) -> String {
    let mut writer = Writer::with_capacity(estimate_len(document));

    for (key, value) in ordered_scalars(document, schema) {
        writer.write_scalar(key, value);
    }
    for (name, block) in ordered_arrays(document, schema) {
        if !writer.is_empty() {
            writer.write_newline();
        }
        writer.write_array_header(name, block.len(), block.fields());
        for record in block.records() {
            writer.write_row(record);
        }
    }

    writer.finish()
}

fn ordered_scalars<'d>(document: &'d Document, schema: &'d Schema) -> Vec<(&'d str, &'d str)> {
    let mut out: Vec<(&str, &str)> = schema
        .required_scalars
        .iter()
        .filter_map(|name| document.scalar(name).map(|value| (name.as_str(), value)))
        .collect();
    out.extend(
        document
            .scalars()
            .filter(|(key, _)| !schema.required_scalars.iter().any(|name| name.as_str() == *key)),
    );
    out
}

fn ordered_arrays<'d>(
    document: &'d Document,
    schema: &'d Schema,
) -> Vec<(&'d str, &'d ArrayBlock)> {
    let mut out: Vec<(&str, &ArrayBlock)> = schema
        .required_arrays
        .iter()
        .filter_map(|spec| document.array(&spec.name).map(|block| (spec.name.as_str(), block)))
        .collect();
    out.extend(
        document
            .arrays()
            .filter(|(name, _)| schema.array_spec(name).is_none()),
    );
    out
}

fn estimate_len(document: &Document) -> usize {
    document
        .iter()
        .map(|(key, value)| {
            key.len()
                + match value.as_array() {
                    Some(block) => block
                        .records()
                        .iter()
                        .map(|record| record.values().map(str::len).sum::<usize>() + record.len())
                        .sum::<usize>()
                        + 32,
                    None => value.as_scalar().map_or(0, str::len) + 3,
                }
        })
        .sum()
}
