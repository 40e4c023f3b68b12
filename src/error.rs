//! Error types for schema construction and definition loading
//!
//! Validation never produces a `SchemaError`: a value that does not conform
//! yields a [`Failure`](crate::Failure). Everything here is a programmer or
//! configuration error raised while schemas are being put together.

use thiserror::Error;

/// Result type for schema construction operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Schema construction errors
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Schema must declare at least one property")]
    EmptySchema,

    #[error("Cannot add a {what} with an empty name")]
    EmptyName { what: &'static str },

    #[error("Cannot call {operation}: no property is currently open")]
    NoOpenProperty { operation: &'static str },

    #[error("Cannot call {operation}: property '{name}' is an excluded property")]
    WrongPropertyKind { operation: &'static str, name: String },

    #[error("Cannot call {operation}: no schema is currently open")]
    NoOpenSchema { operation: &'static str },

    #[error("Schema already exists: {0}")]
    DuplicateSchema(String),

    #[error("Unknown basic type: '{0}'")]
    UnknownBasicType(String),

    #[error("Schema '{schema}' references unknown schema '{reference}'")]
    UnknownSchemaReference { schema: String, reference: String },

    #[error("Invalid schema definition in {path}: {message}")]
    InvalidDefinition { path: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}
