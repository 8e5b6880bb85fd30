#![forbid(unsafe_code)]

//! Core: flat records of primitive values.
//!
//! A [`Record`] is an immutable, ordered set of named fields. Every field
//! value lives behind its own `Rc`, which gives each value an identity that
//! survives copying the record. Mutating a record means building a new one
//! with [`Record::with_field`]; fields that were not touched keep their
//! pointers, the touched field gets a fresh allocation.

pub mod error;
pub mod record;
pub mod value;

pub use error::{RecordError, Result};
pub use record::{Field, Record, RecordBuilder};
pub use value::Value;
