use smallvec::SmallVec;
use smol_str::SmolStr;

use crate::error::RowWidthError;

/// A top-level document entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Scalar(String),
    Array(ArrayBlock),
}

impl Value {
    pub fn scalar(value: impl Into<String>) -> Self {
        Value::Scalar(value.into())
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Value::Scalar(value) => Some(value),
            Value::Array(_) => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayBlock> {
        match self {
            Value::Array(block) => Some(block),
            Value::Scalar(_) => None,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Value::Scalar(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Scalar(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Scalar(value.to_string())
    }
}

impl From<ArrayBlock> for Value {
    fn from(block: ArrayBlock) -> Self {
        Value::Array(block)
    }
}

/// One row of an array block. Values are positionally aligned with the
/// block's field list; duplicate field names are kept as-is.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Record {
    entries: SmallVec<[(SmolStr, String); 4]>,
}

impl Record {
    pub(crate) fn from_aligned<I>(fields: &[SmolStr], values: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let entries = fields.iter().cloned().zip(values).collect();
        Self { entries }
    }

    /// First value stored under `field`.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, value)| value.as_str())
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

/// A named, fixed-schema sequence of records. The name lives in the owning
/// document; the declared count is `records().len()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArrayBlock {
    fields: Vec<SmolStr>,
    records: Vec<Record>,
}

impl ArrayBlock {
    /// # Panics
    ///
    /// Panics if `fields` is empty.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fields: Vec<SmolStr> = fields
            .into_iter()
            .map(|field| SmolStr::new(field.as_ref()))
            .collect();
        assert!(!fields.is_empty(), "array block needs at least one field");
        Self {
            fields,
            records: Vec::new(),
        }
    }

    pub(crate) fn with_capacity(fields: Vec<SmolStr>, rows: usize) -> Self {
        Self {
            fields,
            records: Vec::with_capacity(rows),
        }
    }

    /// Appends a row whose values line up with the field list.
    ///
    /// # Panics
    ///
    /// Panics if the number of values differs from the number of fields. See
    /// [`ArrayBlock::try_push_row`] for the fallible form.
    pub fn push_row<I, S>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Err(err) = self.try_push_row(values) {
            panic!("row width must match the field list: {err}");
        }
        self
    }

    pub fn try_push_row<I, S>(&mut self, values: I) -> Result<&mut Self, RowWidthError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: SmallVec<[String; 4]> = values.into_iter().map(Into::into).collect();
        if values.len() != self.fields.len() {
            return Err(RowWidthError {
                expected: self.fields.len(),
                actual: values.len(),
            });
        }
        self.records.push(Record::from_aligned(&self.fields, values));
        Ok(self)
    }

    /// Appends a row whose first column is the 1-based row position, followed
    /// by `values` for the remaining columns.
    ///
    /// # Panics
    ///
    /// Panics if `values` does not fill exactly the remaining columns.
    pub fn push_numbered<I, S>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Err(err) = self.try_push_numbered(values) {
            panic!("row width must match the field list: {err}");
        }
        self
    }

    pub fn try_push_numbered<I, S>(&mut self, values: I) -> Result<&mut Self, RowWidthError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut position = itoa::Buffer::new();
        let index = position.format(self.records.len() + 1).to_string();
        let row = std::iter::once(index).chain(values.into_iter().map(Into::into));
        self.try_push_row(row)
    }

    pub(crate) fn push_record(&mut self, record: Record) {
        debug_assert_eq!(record.len(), self.fields.len());
        self.records.push(record);
    }

    pub fn fields(&self) -> &[SmolStr] {
        &self.fields
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
