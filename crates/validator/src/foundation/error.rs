//! Tooling fault types
//!
//! Rule violations are never errors: they live in a [`Report`](super::Report).
//! The types here describe faults in the machinery around the rules (a field
//! that cannot be read, a predicate that does not parse). The engine logs
//! these and lets the affected field pass.

use thiserror::Error;

use crate::predicate::PredicateError;

// ============================================================================
// ACCESS ERROR
// ============================================================================

/// Failure to read a field or invoke a method on a record.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// The record has no field with this name.
    #[error("unknown field '{name}'")]
    UnknownField { name: String },

    /// The record has no method with this name.
    #[error("unknown method '{name}'")]
    UnknownMethod { name: String },

    /// The field exists but could not be read.
    #[error("field '{name}' is not accessible: {reason}")]
    Inaccessible { name: String, reason: String },
}

impl AccessError {
    /// Creates an [`AccessError::UnknownField`].
    pub fn unknown_field(name: impl Into<String>) -> Self {
        Self::UnknownField { name: name.into() }
    }

    /// Creates an [`AccessError::UnknownMethod`].
    pub fn unknown_method(name: impl Into<String>) -> Self {
        Self::UnknownMethod { name: name.into() }
    }

    /// Creates an [`AccessError::Inaccessible`].
    pub fn inaccessible(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Inaccessible {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

// ============================================================================
// VALIDATOR ERROR
// ============================================================================

/// A tooling fault raised while evaluating one field.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum ValidatorError {
    /// Reading the field failed.
    #[error("cannot read field '{field}': {source}")]
    FieldAccess {
        field: String,
        #[source]
        source: AccessError,
    },

    /// The field's predicate could not be evaluated.
    #[error("predicate on field '{field}' failed: {source}")]
    Predicate {
        field: String,
        #[source]
        source: PredicateError,
    },

    /// The object graph is nested deeper than the configured limit.
    #[error("object graph exceeds maximum depth of {max_depth}")]
    DepthExceeded { max_depth: usize },
}

impl ValidatorError {
    /// Error code for categorization in logs.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::FieldAccess { .. } => "VALIDATOR:FIELD_ACCESS",
            Self::Predicate { .. } => "VALIDATOR:PREDICATE",
            Self::DepthExceeded { .. } => "VALIDATOR:DEPTH",
        }
    }
}

// ============================================================================
// SCHEMA ERROR
// ============================================================================

/// Failure to load a declarative schema document.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The document is not valid JSON or does not match the schema shape.
    #[error("invalid schema document: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_error_display() {
        assert_eq!(
            AccessError::unknown_field("city").to_string(),
            "unknown field 'city'"
        );
        assert_eq!(
            AccessError::inaccessible("city", "locked").to_string(),
            "field 'city' is not accessible: locked"
        );
    }

    #[test]
    fn test_validator_error_code() {
        let err = ValidatorError::FieldAccess {
            field: "city".into(),
            source: AccessError::unknown_field("city"),
        };
        assert_eq!(err.code(), "VALIDATOR:FIELD_ACCESS");
        assert!(err.to_string().contains("unknown field 'city'"));
        assert_eq!(
            ValidatorError::DepthExceeded { max_depth: 3 }.code(),
            "VALIDATOR:DEPTH"
        );
    }
}
