//! Prelude module for convenient imports.
//!
//! Provides a single `use palisade_validator::prelude::*;` import that brings
//! in the types needed to declare schemas and run validation.
//!
//! # Examples
//!
//! ```rust,ignore
//! use palisade_validator::prelude::*;
//!
//! let report = Validator::new().validate(&record);
//! report.into_result()?;
//! ```

// ============================================================================
// FOUNDATION: Values, introspection, reports, faults
// ============================================================================

pub use crate::foundation::{
    AccessError, AsValue, FieldKind, Report, SchemaError, Validatable, ValidatorError, Value,
    is_empty,
};

// ============================================================================
// SCHEMA: Constraint metadata
// ============================================================================

pub use crate::schema::{ALWAYS, Constraint, FieldSchema, Schema, SchemaBuilder, SizeRule};

// ============================================================================
// PREDICATES AND ENGINE
// ============================================================================

pub use crate::engine::{Validator, ValidatorConfig, validate};
pub use crate::predicate::{ExpressionEvaluator, PredicateError, PredicateEvaluator};
pub use crate::validators::{SizeViolation, display_width};

pub use rust_decimal::Decimal;
