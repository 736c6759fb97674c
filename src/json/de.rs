use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use smallvec::SmallVec;
use smol_str::SmolStr;

use crate::decode::classify::{classify_line, is_identifier, is_index, LineKind};
use crate::types::{ArrayBlock, Document, Record, Value};

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DocumentVisitor;

        impl<'de> Visitor<'de> for DocumentVisitor {
            type Value = Document;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object of scalar fields and arrays of records")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Document, A::Error> {
                let mut document = Document::new();
                while let Some((key, value)) = map.next_entry::<String, Value>()? {
                    check_entry_key(&key, &value)?;
                    document.insert(key, value);
                }
                Ok(document)
            }
        }

        deserializer.deserialize_map(DocumentVisitor)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string, a number or an array of records")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Value, E> {
                single_line(value)?;
                Ok(Value::Scalar(value.to_string()))
            }

            fn visit_string<E: de::Error>(self, value: String) -> Result<Value, E> {
                single_line(&value)?;
                Ok(Value::Scalar(value))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Value, E> {
                CellVisitor.visit_u64(value).map(|cell: Cell| Value::Scalar(cell.0))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Value, E> {
                CellVisitor.visit_i64(value).map(|cell: Cell| Value::Scalar(cell.0))
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> Result<Value, E> {
                CellVisitor.visit_f64(value).map(|cell: Cell| Value::Scalar(cell.0))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
                let mut records: Vec<Record> = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(record) = seq.next_element::<Record>()? {
                    records.push(record);
                }
                block_from_records(records).map(Value::Array)
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = Record;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object of string or number cells")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Record, A::Error> {
                let mut fields: SmallVec<[SmolStr; 4]> = SmallVec::new();
                let mut values: SmallVec<[String; 4]> = SmallVec::new();
                while let Some((field, cell)) = map.next_entry::<String, Cell>()? {
                    if !is_identifier(&field) {
                        return Err(de::Error::custom(format_args!(
                            "record field {field:?} is not an identifier"
                        )));
                    }
                    fields.push(SmolStr::new(field));
                    values.push(cell.0);
                }
                Ok(Record::from_aligned(&fields, values))
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

fn block_from_records<E: de::Error>(records: Vec<Record>) -> Result<ArrayBlock, E> {
    let Some(first) = records.first() else {
        return Err(E::custom("cannot infer the field list of an empty array"));
    };
    let fields: Vec<SmolStr> = first.field_names().map(SmolStr::new).collect();
    if fields.is_empty() {
        return Err(E::custom("array records must have at least one field"));
    }
    let mut block = ArrayBlock::with_capacity(fields, records.len());
    for (position, record) in records.into_iter().enumerate() {
        if !record.field_names().eq(block.fields().iter().map(SmolStr::as_str)) {
            return Err(E::custom(format_args!(
                "record {} does not match the field list of the first record",
                position + 1
            )));
        }
        check_row(&record, position)?;
        block.push_record(record);
    }
    Ok(block)
}

/// The first column carries the row index and only the last one may hold commas.
fn check_row<E: de::Error>(record: &Record, position: usize) -> Result<(), E> {
    let mut values = record.values();
    if !values.next().is_some_and(is_index) {
        return Err(E::custom(format_args!(
            "record {}: the first field must be a decimal row index",
            position + 1
        )));
    }
    let middle = record.len().saturating_sub(2);
    if values.take(middle).any(|value| value.contains(',')) {
        return Err(E::custom(format_args!(
            "record {}: only the last field may contain commas",
            position + 1
        )));
    }
    Ok(())
}

/// Scalar keys must read back as the same `key: value` line; array names as headers.
fn check_entry_key<E: de::Error>(key: &str, value: &Value) -> Result<(), E> {
    let readable = match value {
        Value::Array(_) => is_identifier(key),
        Value::Scalar(scalar) => {
            !key.is_empty()
                && single_line::<E>(key).is_ok()
                && matches!(
                    classify_line(&format!("{key}: {scalar}")),
                    LineKind::Scalar { key: parsed, .. } if parsed == key
                )
        }
    };
    if readable {
        Ok(())
    } else {
        Err(E::custom(format_args!("key {key:?} cannot be written back")))
    }
}

fn single_line<E: de::Error>(value: &str) -> Result<(), E> {
    if value.contains(['\n', '\r']) {
        return Err(E::custom("values must fit on a single line"));
    }
    Ok(())
}

struct Cell(String);

struct CellVisitor;

impl<'de> Visitor<'de> for CellVisitor {
    type Value = Cell;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or a number")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Cell, E> {
        single_line(value)?;
        Ok(Cell(value.to_string()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Cell, E> {
        single_line(&value)?;
        Ok(Cell(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Cell, E> {
        let mut buf = itoa::Buffer::new();
        Ok(Cell(buf.format(value).to_string()))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Cell, E> {
        let mut buf = itoa::Buffer::new();
        Ok(Cell(buf.format(value).to_string()))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Cell, E> {
        if !value.is_finite() {
            return Err(E::custom("non-finite number"));
        }
        let mut buf = ryu::Buffer::new();
        Ok(Cell(buf.format_finite(value).to_string()))
    }
}

impl<'de> Deserialize<'de> for Cell {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(CellVisitor)
    }
}
