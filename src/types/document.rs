use indexmap::IndexMap;

use super::value::{ArrayBlock, Value};

/// Scalar fields and array blocks keyed by name.
///
/// Insertion order is kept so serialization is deterministic, but it takes no
/// part in equality.
#[derive(Clone, Debug, Default)]
pub struct Document {
    entries: IndexMap<String, Value>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key`, returning the value it replaced. A replaced
    /// key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn with_scalar(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, Value::Scalar(value.into()));
        self
    }

    pub fn with_array(mut self, key: impl Into<String>, block: ArrayBlock) -> Self {
        self.insert(key, Value::Array(block));
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn scalar(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_scalar)
    }

    pub fn array(&self, key: &str) -> Option<&ArrayBlock> {
        self.get(key).and_then(Value::as_array)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn scalars(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter()
            .filter_map(|(key, value)| value.as_scalar().map(|scalar| (key, scalar)))
    }

    pub fn arrays(&self) -> impl Iterator<Item = (&str, &ArrayBlock)> {
        self.iter()
            .filter_map(|(key, value)| value.as_array().map(|block| (key, block)))
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .all(|(key, value)| other.entries.get(key) == Some(value))
    }
}

impl Eq for Document {}

impl<K, V> FromIterator<(K, V)> for Document
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut document = Document::new();
        for (key, value) in iter {
            document.insert(key, value);
        }
        document
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
