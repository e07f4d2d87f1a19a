//! Field-level validation errors.

use serde::Serialize;
use thiserror::Error;

/// A single failed field with a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Non-empty collection of field errors produced by one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{}", self.summary())]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    /// Build from collected errors. Returns `None` when the list is empty,
    /// so callers cannot construct an "errors" value that holds none.
    pub fn from_vec(errors: Vec<FieldError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self { errors })
        }
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Whether a specific field is among the failures.
    pub fn cites(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Accumulator used by the per-step validators.
#[derive(Debug, Default)]
pub(crate) struct ErrorBag {
    errors: Vec<FieldError>,
}

impl ErrorBag {
    pub(crate) fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    /// Finish the pass: `Ok(value)` when nothing failed, the errors otherwise.
    pub(crate) fn finish<T>(self, value: T) -> Result<T, FieldErrors> {
        match FieldErrors::from_vec(self.errors) {
            None => Ok(value),
            Some(errors) => Err(errors),
        }
    }

    /// Drain accumulated errors, if any.
    pub(crate) fn take(self) -> Option<FieldErrors> {
        FieldErrors::from_vec(self.errors)
    }
}
