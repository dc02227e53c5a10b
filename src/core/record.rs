//! Invoice records: ordered field id → value maps

use crate::core::field::FieldValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Field values of one invoice, in the order they were supplied
///
/// A record is built per request, enriched with derived fields and then
/// flattened into the template store. It is never persisted on its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceRecord(IndexMap<String, FieldValue>);

impl InvoiceRecord {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub fn get(&self, id: &str) -> Option<&FieldValue> {
        self.0.get(id)
    }

    /// Insert or overwrite a value, keeping the original position of an existing key
    pub fn insert(&mut self, id: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(id.into(), value.into());
    }

    /// Remove a field, keeping the order of the others
    pub fn remove(&mut self, id: &str) -> Option<FieldValue> {
        self.0.shift_remove(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    /// Textual value of a field, if present and textual
    pub fn text(&self, id: &str) -> Option<&str> {
        self.get(id).and_then(FieldValue::as_text)
    }

    /// Numeric value of a field, if present and numeric
    pub fn number(&self, id: &str) -> Option<f64> {
        self.get(id).and_then(FieldValue::as_number)
    }

    /// True when the field is absent, null or whitespace-only text
    pub fn is_missing(&self, id: &str) -> bool {
        self.get(id).is_none_or(FieldValue::is_blank)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> IndexMap<String, FieldValue> {
        self.0
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for InvoiceRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<IndexMap<String, FieldValue>> for InvoiceRecord {
    fn from(map: IndexMap<String, FieldValue>) -> Self {
        Self(map)
    }
}
