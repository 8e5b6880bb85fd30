#![forbid(unsafe_code)]

//! Immutable flat records with per-field identity.
//!
//! # Invariants
//!
//! 1. A `Record` never changes after construction. "Setting" a field builds a
//!    new record.
//! 2. Field order is insertion order. Replacing an existing field keeps its
//!    position; a new name is appended.
//! 3. [`Record::with_field`] allocates a fresh `Rc<Value>` for the written
//!    field, even when the content is equal to the old one. All other fields
//!    share their `Rc` with the source record.
//! 4. Cloning a `Record` is O(1) and yields a handle that is
//!    [`same_as`](Record::same_as) the original.

use std::fmt;
use std::rc::Rc;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::{RecordError, Result};
use crate::value::Value;

/// A single named field.
#[derive(Clone)]
pub struct Field {
    name: Rc<str>,
    value: Rc<Value>,
}

impl Field {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The shared value handle. Two handles are the same value iff
    /// `Rc::ptr_eq` holds.
    #[must_use]
    pub fn value(&self) -> &Rc<Value> {
        &self.value
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:?}", self.name, self.value)
    }
}

/// An immutable, ordered set of named primitive fields.
#[derive(Clone)]
pub struct Record {
    fields: Rc<[Field]>,
}

impl Record {
    /// An empty record.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fields: Rc::from(Vec::new()),
        }
    }

    #[must_use]
    pub fn builder() -> RecordBuilder {
        RecordBuilder::default()
    }

    /// Build a record from `(name, value)` pairs. A repeated name overwrites
    /// the earlier entry in place.
    pub fn from_fields<N, V, I>(fields: I) -> Self
    where
        N: AsRef<str>,
        V: Into<Value>,
        I: IntoIterator<Item = (N, V)>,
    {
        let mut builder = Self::builder();
        for (name, value) in fields {
            builder = builder.field(name.as_ref(), value);
        }
        builder.build()
    }

    /// Load a record from a flat JSON object.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let parsed: serde_json::Value = serde_json::from_str(json)?;
        let map = match parsed {
            serde_json::Value::Object(map) => map,
            other => {
                return Err(RecordError::NotAnObject {
                    found: json_kind(&other),
                });
            }
        };
        let mut builder = Self::builder();
        for (name, raw) in map {
            let value = Value::from_json(&name, raw)?;
            builder = builder.field(&name, value);
        }
        Ok(builder.build())
    }

    /// Serialize as a JSON object in field order.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Shared handle of a field value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Rc<Value>> {
        self.position(name).map(|idx| &self.fields[idx].value)
    }

    #[must_use]
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.get(name).map(|v| &**v)
    }

    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.value(name).and_then(Value::as_text)
    }

    #[must_use]
    pub fn int(&self, name: &str) -> Option<i64> {
        self.value(name).and_then(Value::as_int)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(Field::name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    /// A new record equal to `self` except that `name` holds a freshly
    /// allocated `value`.
    #[must_use]
    pub fn with_field(&self, name: &str, value: impl Into<Value>) -> Self {
        self.merged([(name, value.into())])
    }

    /// Apply several writes in one copy. Later writes to the same name win.
    #[must_use]
    pub fn merged<N, V, I>(&self, writes: I) -> Self
    where
        N: AsRef<str>,
        V: Into<Value>,
        I: IntoIterator<Item = (N, V)>,
    {
        let mut fields = self.fields.to_vec();
        for (name, value) in writes {
            put(&mut fields, name.as_ref(), value.into());
        }
        Self {
            fields: Rc::from(fields),
        }
    }

    /// Identity comparison: true iff both handles point at the same snapshot.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.fields, &other.fields)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| &*f.name == name)
    }
}

fn put(fields: &mut Vec<Field>, name: &str, value: Value) {
    let value = Rc::new(value);
    match fields.iter_mut().find(|f| &*f.name == name) {
        Some(field) => field.value = value,
        None => fields.push(Field {
            name: Rc::from(name),
            value,
        }),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

impl Default for Record {
    fn default() -> Self {
        Self::new()
    }
}

/// Structural equality: same names in the same order with equal contents.
impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.fields.len() == other.fields.len()
            && self
                .fields
                .iter()
                .zip(other.fields.iter())
                .all(|(a, b)| a.name == b.name && a.value == b.value)
    }
}

impl Eq for Record {}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.fields.iter().map(|field| (&*field.name, &*field.value)))
            .finish()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {:?}", field.name, field.value.to_string())?;
        }
        f.write_str("}")
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for field in self.fields.iter() {
            map.serialize_entry(&*field.name, &*field.value)?;
        }
        map.end()
    }
}

/// Incremental constructor for [`Record`].
#[derive(Debug, Default)]
pub struct RecordBuilder {
    fields: Vec<Field>,
}

impl RecordBuilder {
    #[must_use]
    pub fn field(mut self, name: &str, value: impl Into<Value>) -> Self {
        put(&mut self.fields, name, value.into());
        self
    }

    #[must_use]
    pub fn build(self) -> Record {
        Record {
            fields: Rc::from(self.fields),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
