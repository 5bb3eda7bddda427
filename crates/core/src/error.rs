//! Error types for the core library

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing field `{field}` in {context}")]
    MissingField { field: String, context: String },

    #[error("Invalid document: {0}")]
    InvalidDocument(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>, context: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
            context: context.into(),
        }
    }
}
