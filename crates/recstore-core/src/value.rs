#![forbid(unsafe_code)]

//! Primitive field values.

use std::fmt;

use serde::Serialize;

use crate::error::{RecordError, Result};

/// A primitive value held by a single record field.
///
/// Serialized untagged, so a value maps one-to-one onto a JSON primitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
}

impl Value {
    /// Convert a JSON value, rejecting composites and non-integral numbers.
    ///
    /// `field` is only used to label the error.
    pub fn from_json(field: &str, json: serde_json::Value) -> Result<Self> {
        match json {
            serde_json::Value::Null => Ok(Self::Null),
            serde_json::Value::Bool(b) => Ok(Self::Bool(b)),
            serde_json::Value::String(s) => Ok(Self::Text(s)),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .ok_or_else(|| RecordError::not_primitive(field)),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                Err(RecordError::not_primitive(field))
            }
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short name of the variant, used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Text(_) => "text",
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_json_accepts_primitives() {
        assert_eq!(
            Value::from_json("a", serde_json::json!("hi")).unwrap(),
            Value::Text("hi".into())
        );
        assert_eq!(
            Value::from_json("a", serde_json::json!(42)).unwrap(),
            Value::Int(42)
        );
        assert_eq!(
            Value::from_json("a", serde_json::json!(true)).unwrap(),
            Value::Bool(true)
        );
        assert!(Value::from_json("a", serde_json::Value::Null).unwrap().is_null());
    }

    #[test]
    fn from_json_rejects_composites_and_floats() {
        for json in [
            serde_json::json!([1, 2]),
            serde_json::json!({"x": 1}),
            serde_json::json!(1.5),
        ] {
            let err = Value::from_json("age", json).unwrap_err();
            assert!(matches!(err, RecordError::NotPrimitive { ref field } if field == "age"));
        }
    }

    #[test]
    fn display_is_bare() {
        assert_eq!(Value::from("Alice").to_string(), "Alice");
        assert_eq!(Value::from(30).to_string(), "30");
        assert_eq!(Value::Null.to_string(), "null");
    }

    #[test]
    fn serializes_untagged() {
        let json = serde_json::to_string(&vec![
            Value::from("x"),
            Value::from(1),
            Value::from(false),
            Value::Null,
        ])
        .unwrap();
        assert_eq!(json, r#"["x",1,false,null]"#);
    }

    #[test]
    fn accessors_match_variant() {
        assert_eq!(Value::from("x").as_text(), Some("x"));
        assert_eq!(Value::from("x").as_int(), None);
        assert_eq!(Value::from(7).as_int(), Some(7));
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert_eq!(Value::from(7).kind(), "int");
    }
}
