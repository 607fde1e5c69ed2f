//! Introspection capability consumed by the engine.

use super::error::AccessError;
use super::value::Value;
use crate::schema::Schema;

// ============================================================================
// VALIDATABLE
// ============================================================================

/// A record the engine can walk.
///
/// This is the only way the engine sees user data: it asks for the schema
/// (which fields carry constraints, and their declared kinds), reads field
/// values by name, and lets predicate expressions call named methods.
///
/// Most types get this implementation from the
/// [`validatable!`](crate::validatable) macro. Implementing it by hand is
/// useful for dynamic records, e.g. a row read from a database:
///
/// ```rust,ignore
/// use palisade_validator::prelude::*;
///
/// struct Row { schema: Schema, cells: HashMap<String, String> }
///
/// impl Validatable for Row {
///     fn schema(&self) -> &Schema {
///         &self.schema
///     }
///
///     fn field(&self, name: &str) -> Result<Value<'_>, AccessError> {
///         self.cells
///             .get(name)
///             .map(|s| Value::text(s.as_str()))
///             .ok_or_else(|| AccessError::unknown_field(name))
///     }
/// }
/// ```
pub trait Validatable {
    /// Returns the schema describing the constrained fields of this record.
    fn schema(&self) -> &Schema;

    /// Reads the current value of a field.
    fn field(&self, name: &str) -> Result<Value<'_>, AccessError>;

    /// Invokes a named method for predicate expressions.
    ///
    /// The default implementation knows no methods.
    fn call(&self, method: &str, args: &[Value<'_>]) -> Result<Value<'_>, AccessError> {
        let _ = args;
        Err(AccessError::unknown_method(method))
    }
}

impl<T: Validatable + ?Sized> Validatable for &T {
    fn schema(&self) -> &Schema {
        (**self).schema()
    }

    fn field(&self, name: &str) -> Result<Value<'_>, AccessError> {
        (**self).field(name)
    }

    fn call(&self, method: &str, args: &[Value<'_>]) -> Result<Value<'_>, AccessError> {
        (**self).call(method, args)
    }
}
