//! Core validation types and traits
//!
//! This module contains the fundamental building blocks the engine works with:
//!
//! - **Values**: [`Value`], [`FieldKind`], [`AsValue`]
//! - **Introspection**: [`Validatable`]
//! - **Results**: [`Report`]
//! - **Faults**: [`AccessError`], [`ValidatorError`], [`SchemaError`]
//!
//! # Architecture
//!
//! Rule violations and tooling faults are kept strictly apart. A rule that
//! fails produces a message inside a [`Report`] and traversal continues. A
//! field that cannot be read, or a predicate that cannot be evaluated,
//! produces a [`ValidatorError`], which the engine logs before letting that
//! one field pass.

pub mod error;
pub mod report;
pub mod traits;
pub mod value;

pub use error::{AccessError, SchemaError, ValidatorError};
pub use report::Report;
pub use traits::Validatable;
pub use value::{AsValue, FieldKind, Value, is_empty};
