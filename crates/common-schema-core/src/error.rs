//! Error types for the common-schema core library
//!
//! Three domain errors live here. [`SchemaError`] is raised while a schema is
//! normalized. [`FieldError`] is raised by a type plugin or hook for a single
//! document field, and [`ValidationError`] batches field errors at the end of a
//! validate or normalize run. Everything is wrapped by the crate-wide [`Error`].
//!
//! Copyright (c) 2025 Common Schema Team
//! Licensed under the Apache-2.0 license

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::value::Value;

/// Main error type for common-schema operations
#[derive(Error, Debug)]
pub enum Error {
    /// The schema definition itself is malformed
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A single document field failed a type or constraint check
    #[error(transparent)]
    Field(#[from] FieldError),

    /// One or more field errors were collected during a document walk
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A caller-supplied handler or hook failed
    #[error("Handler error: {message}")]
    Handler {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// YAML parsing errors
    #[error("YAML error: {message}")]
    Yaml {
        message: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic internal error with context
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a handler error from a plain message
    pub fn handler<M: Into<String>>(message: M) -> Self {
        Error::Handler {
            message: message.into(),
            source: None,
        }
    }

    /// Create an internal error from a plain message
    pub fn internal<M: Into<String>>(message: M) -> Self {
        Error::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// The field error carried by this error, if it is one
    pub fn as_field_error(&self) -> Option<&FieldError> {
        match self {
            Error::Field(error) => Some(error),
            _ => None,
        }
    }

    /// The validation error carried by this error, if it is one
    pub fn as_validation_error(&self) -> Option<&ValidationError> {
        match self {
            Error::Validation(error) => Some(error),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Yaml {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Handler {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

/// A malformed schema definition
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("Schema error: {message}")]
pub struct SchemaError {
    pub message: String,
}

impl SchemaError {
    pub fn new<M: Into<String>>(message: M) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Prefix the message with the property the error was found under
    pub fn at(self, key: &str) -> Self {
        Self {
            message: format!("{}: {}", key, self.message),
        }
    }
}

/// Machine-readable classification of a field error
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorCode {
    InvalidType,
    InvalidFormat,
    Required,
    TooSmall,
    TooLarge,
    TooShort,
    TooLong,
    Unrecognized,
    UnknownField,
    Invalid,
    Duplicate,
    #[serde(untagged)]
    Custom(String),
}

impl FieldErrorCode {
    pub fn as_str(&self) -> &str {
        match self {
            FieldErrorCode::InvalidType => "invalid_type",
            FieldErrorCode::InvalidFormat => "invalid_format",
            FieldErrorCode::Required => "required",
            FieldErrorCode::TooSmall => "too_small",
            FieldErrorCode::TooLarge => "too_large",
            FieldErrorCode::TooShort => "too_short",
            FieldErrorCode::TooLong => "too_long",
            FieldErrorCode::Unrecognized => "unrecognized",
            FieldErrorCode::UnknownField => "unknown_field",
            FieldErrorCode::Invalid => "invalid",
            FieldErrorCode::Duplicate => "duplicate",
            FieldErrorCode::Custom(code) => code,
        }
    }
}

impl fmt::Display for FieldErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed check on one document field
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
pub struct FieldError {
    pub code: FieldErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// Dot-separated path of the field, set by the engine when batching
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{} ({}): {}", field, self.code, self.message),
            None => write!(f, "{}: {}", self.code, self.message),
        }
    }
}

impl FieldError {
    pub fn new<M: Into<String>>(code: FieldErrorCode, message: M) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            field: None,
        }
    }

    /// Attach structured details (e.g. the offending value)
    pub fn with_details(mut self, details: impl Into<Value>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Tag the error with a field path
    pub fn with_field<F: Into<String>>(mut self, field: F) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn invalid_type<M: Into<String>>(message: M) -> Self {
        Self::new(FieldErrorCode::InvalidType, message)
    }

    pub fn invalid_format<M: Into<String>>(message: M) -> Self {
        Self::new(FieldErrorCode::InvalidFormat, message)
    }
}

/// Batch of field errors raised once at the end of a validate or normalize run
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
pub struct ValidationError {
    pub message: String,
    pub field_errors: Vec<FieldError>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if self.field_errors.len() > 1 {
            write!(f, " (and {} more)", self.field_errors.len() - 1)?;
        }
        Ok(())
    }
}

impl ValidationError {
    pub fn new<M: Into<String>>(message: M) -> Self {
        Self {
            message: message.into(),
            field_errors: Vec::new(),
        }
    }

    /// Build from collected field errors; the message is taken from the first one
    pub fn from_field_errors(field_errors: Vec<FieldError>) -> Self {
        let message = field_errors
            .first()
            .map(|error| error.message.clone())
            .unwrap_or_else(|| "Validation failure".to_string());
        Self {
            message,
            field_errors,
        }
    }

    /// Field errors recorded for one path
    pub fn errors_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FieldError> + 'a {
        self.field_errors
            .iter()
            .filter(move |error| error.field.as_deref() == Some(field))
    }
}

/// Accumulates field errors during a document walk
#[derive(Debug, Default, Clone)]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Convert to result - Ok if no errors, Err if any errors exist
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::from_field_errors(self.errors).into())
        }
    }
}
