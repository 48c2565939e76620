//! Schema-free view over a parsed JSON payload.
//!
//! The RugCheck API is not versioned from the client's side, so responses are
//! kept as a recursive [`Document`] rather than deserialized into fixed structs.
//! Fields are read with [`Document::get`] (absent keys are `None`) or
//! [`Document::lookup`] (absent keys are an error), and the whole tree converts
//! back to plain JSON without loss.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Object(BTreeMap<String, Document>),
    Array(Vec<Document>),
    /// Scalars, plus sequences nested directly inside sequences, kept verbatim.
    Leaf(Value),
}

impl Document {
    /// A document with no fields, used wherever a fetch degrades.
    pub fn empty() -> Self {
        Document::Object(BTreeMap::new())
    }

    /// Wraps a parsed JSON value.
    ///
    /// Mappings are wrapped field by field, recursing into nested mappings and
    /// sequences. Inside a sequence only mapping elements are wrapped; every
    /// other element is carried as a leaf.
    pub fn wrap(value: Value) -> Self {
        match value {
            Value::Object(map) => {
                Document::Object(map.into_iter().map(|(k, v)| (k, Self::wrap(v))).collect())
            }
            Value::Array(items) => {
                Document::Array(items.into_iter().map(Self::wrap_element).collect())
            }
            other => Document::Leaf(other),
        }
    }

    fn wrap_element(value: Value) -> Self {
        match value {
            Value::Object(_) => Self::wrap(value),
            other => Document::Leaf(other),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Document> {
        match self {
            Document::Object(fields) => fields.get(key),
            _ => None,
        }
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a Document) -> &'a Document {
        self.get(key).unwrap_or(default)
    }

    /// Like [`Document::get`], but an absent key is an [`AppError::KeyNotFound`].
    pub fn lookup(&self, key: &str) -> AppResult<&Document> {
        self.get(key)
            .ok_or_else(|| AppError::KeyNotFound(key.to_string()))
    }

    /// Follows a chain of keys, e.g. `["tokenMeta", "name"]`.
    pub fn path(&self, keys: &[&str]) -> Option<&Document> {
        keys.iter().try_fold(self, |doc, key| doc.get(key))
    }

    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        let fields = match self {
            Document::Object(fields) => Some(fields.keys()),
            _ => None,
        };
        fields.into_iter().flatten().map(String::as_str)
    }

    /// Number of fields for a mapping, elements for a sequence, zero for a leaf.
    pub fn len(&self) -> usize {
        match self {
            Document::Object(fields) => fields.len(),
            Document::Array(items) => items.len(),
            Document::Leaf(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_str(&self) -> Option<&str> {
        self.leaf().and_then(Value::as_str)
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.leaf().and_then(Value::as_f64)
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self.leaf() {
            Some(Value::Number(n)) => Some(n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.leaf().and_then(Value::as_bool)
    }

    pub fn as_array(&self) -> Option<&[Document]> {
        match self {
            Document::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Document::Leaf(Value::Null))
    }

    fn leaf(&self) -> Option<&Value> {
        match self {
            Document::Leaf(value) => Some(value),
            _ => None,
        }
    }

    /// Whether the value counts as set: not null, `false`, zero, or empty.
    pub fn is_truthy(&self) -> bool {
        match self {
            Document::Object(fields) => !fields.is_empty(),
            Document::Array(items) => !items.is_empty(),
            Document::Leaf(Value::Null) => false,
            Document::Leaf(Value::Bool(b)) => *b,
            Document::Leaf(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
            Document::Leaf(Value::String(s)) => !s.is_empty(),
            Document::Leaf(Value::Array(items)) => !items.is_empty(),
            Document::Leaf(Value::Object(fields)) => !fields.is_empty(),
        }
    }

    /// Text for display: strings unquoted, everything else as compact JSON.
    pub fn to_text(&self) -> String {
        match self {
            Document::Leaf(Value::String(s)) => s.clone(),
            other => other.to_string(),
        }
    }

    pub fn to_plain(&self) -> Value {
        match self {
            Document::Object(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_plain()))
                    .collect::<Map<String, Value>>(),
            ),
            Document::Array(items) => Value::Array(items.iter().map(Self::to_plain).collect()),
            Document::Leaf(value) => value.clone(),
        }
    }

    pub fn into_plain(self) -> Value {
        match self {
            Document::Object(fields) => Value::Object(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, v.into_plain()))
                    .collect::<Map<String, Value>>(),
            ),
            Document::Array(items) => {
                Value::Array(items.into_iter().map(Self::into_plain).collect())
            }
            Document::Leaf(value) => value,
        }
    }

    /// Serializes the plain form. Pretty output indents with four spaces.
    pub fn to_json(&self, pretty: bool) -> AppResult<String> {
        if !pretty {
            return Ok(serde_json::to_string(self)?);
        }

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        // serde_json only ever writes UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Developer-facing text, identical to the compact JSON of the plain form.
    pub fn describe(&self) -> String {
        self.to_plain().to_string()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Value> for Document {
    fn from(value: Value) -> Self {
        Self::wrap(value)
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        doc.into_plain()
    }
}

impl Index<&str> for Document {
    type Output = Document;

    /// Panics when `key` is absent; use [`Document::lookup`] to handle that case.
    fn index(&self, key: &str) -> &Self::Output {
        match self.get(key) {
            Some(doc) => doc,
            None => panic!("key not found in document: {key:?}"),
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Document::Object(fields) => serializer.collect_map(fields),
            Document::Array(items) => serializer.collect_seq(items),
            Document::Leaf(value) => value.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::wrap)
    }
}
