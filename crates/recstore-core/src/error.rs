use thiserror::Error;

pub type Result<T> = std::result::Result<T, RecordError>;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("record must be a JSON object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("field `{field}` is not a primitive value")]
    NotPrimitive { field: String },
}

impl RecordError {
    #[must_use]
    pub fn not_primitive(field: impl Into<String>) -> Self {
        Self::NotPrimitive {
            field: field.into(),
        }
    }
}
