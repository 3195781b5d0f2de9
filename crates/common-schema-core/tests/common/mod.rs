//! Shared support for integration tests

#![allow(dead_code)]

use std::sync::Once;

use common_schema_core::{FieldError, ValidationError, Value};
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Install a fmt subscriber once per test binary; `RUST_LOG` controls the level
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Document value from JSON
pub fn doc(json: serde_json::Value) -> Value {
    Value::from(json)
}

/// `(field, code, message)` triples of a validation failure
pub fn field_errors(error: &ValidationError) -> Vec<(String, String, String)> {
    error
        .field_errors
        .iter()
        .map(|e: &FieldError| {
            (
                e.field.clone().unwrap_or_default(),
                e.code.as_str().to_string(),
                e.message.clone(),
            )
        })
        .collect()
}

pub fn triple(field: &str, code: &str, message: &str) -> (String, String, String) {
    (field.to_string(), code.to_string(), message.to_string())
}
