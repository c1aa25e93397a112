//! Error types for the accessor layer and the engine's field errors.
//!
//! The adapter itself has exactly one failure mode: invoking the root
//! handle as a field. Everything else (invalid paths, failed validation)
//! originates in the engine and passes through unchanged.

use serde::Serialize;
use thiserror::Error;

/// Errors raised by the accessor layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    /// The root handle identifies the whole form; it cannot be registered
    /// as a single field.
    #[error("cannot register at the root: select a field first")]
    RootRegistration,
}

/// A validation error attached to a single field by the engine.
///
/// `kind` names the failed rule ("required", "min", "minLength", ...);
/// `message` is the human-readable text surfaced to the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub kind: String,
    pub message: String,
}

impl FieldError {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }

    pub fn required() -> Self {
        Self::new("required", "this field is required")
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}
