//! Conditional gating of constraints
//!
//! Every [`Constraint`](crate::schema::Constraint) carries a predicate that
//! decides whether the rule is in effect for the current record. The engine
//! only sees the [`PredicateEvaluator`] trait; [`ExpressionEvaluator`] is the
//! built-in implementation, a small expression language written as a
//! `${ ... }` template:
//!
//! ```text
//! ${true}
//! ${buyerCheck == '0'}
//! ${!isEmpty(bsid) || !isEmpty(payno)}
//! ${address.city matches '[A-Z].*' and checkDateEnd()}
//! ```
//!
//! Identifiers name fields of the record under validation, `a.b` reads a
//! field of a nested record, and `name(args)` calls a built-in
//! (`isEmpty`, `isBlank`, `length`) or else a method exposed through
//! [`Validatable::call`].
//!
//! A closure `Fn(&str, &dyn Validatable) -> Result<bool, PredicateError>`
//! is also a [`PredicateEvaluator`], for callers that keep a fixed table of
//! named predicates instead.

pub mod eval;
pub mod lexer;
pub mod parser;

use thiserror::Error;

use crate::foundation::{AccessError, Validatable, Value};

// ============================================================================
// ERRORS
// ============================================================================

/// Failure to parse or evaluate a predicate.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PredicateError {
    /// Malformed expression.
    #[error("syntax error at {position}: {message}")]
    Syntax { position: usize, message: String },

    /// An operand has the wrong type for the operation.
    #[error("type error in '{operation}': expected {expected}, found {found}")]
    TypeMismatch {
        operation: String,
        expected: &'static str,
        found: &'static str,
    },

    /// The expression did not produce a boolean.
    #[error("predicate must evaluate to a bool, found {found}")]
    NotBoolean { found: &'static str },

    /// A built-in was called with the wrong number of arguments.
    #[error("{function} expects {expected} argument(s), found {found}")]
    Arity {
        function: &'static str,
        expected: usize,
        found: usize,
    },

    /// A `matches` pattern does not compile.
    #[error("invalid pattern '{pattern}': {message}")]
    InvalidRegex { pattern: String, message: String },

    /// A field or method lookup on the record failed.
    #[error(transparent)]
    Access(#[from] AccessError),
}

impl PredicateError {
    /// Creates a [`PredicateError::Syntax`].
    pub fn syntax(position: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            position,
            message: message.into(),
        }
    }

    /// Creates a [`PredicateError::TypeMismatch`] for an operand.
    pub fn type_mismatch(
        operation: impl Into<String>,
        expected: &'static str,
        found: &Value<'_>,
    ) -> Self {
        Self::TypeMismatch {
            operation: operation.into(),
            expected,
            found: found.type_name(),
        }
    }
}

// ============================================================================
// EVALUATOR TRAIT
// ============================================================================

/// Decides whether a constraint's predicate holds for a record.
///
/// Implementations must return `Ok(false)` for a blank expression and must
/// be reentrant: the engine may call them recursively while walking nested
/// records.
pub trait PredicateEvaluator {
    /// Evaluates `expression` with `context` as the record in scope.
    fn evaluate(&self, expression: &str, context: &dyn Validatable) -> Result<bool, PredicateError>;
}

impl<F> PredicateEvaluator for F
where
    F: Fn(&str, &dyn Validatable) -> Result<bool, PredicateError>,
{
    fn evaluate(&self, expression: &str, context: &dyn Validatable) -> Result<bool, PredicateError> {
        if expression.trim().is_empty() {
            return Ok(false);
        }
        self(expression, context)
    }
}

// ============================================================================
// EXPRESSION EVALUATOR
// ============================================================================

/// Built-in [`PredicateEvaluator`] for the `${ ... }` expression language.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpressionEvaluator;

impl ExpressionEvaluator {
    /// Creates the evaluator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl PredicateEvaluator for ExpressionEvaluator {
    fn evaluate(&self, expression: &str, context: &dyn Validatable) -> Result<bool, PredicateError> {
        let source = template_body(expression);
        if source.trim().is_empty() {
            return Ok(false);
        }
        let expr = parser::parse(source)?;
        match eval::evaluate(&expr, context)? {
            Value::Bool(b) => Ok(b),
            other => Err(PredicateError::NotBoolean {
                found: other.type_name(),
            }),
        }
    }
}

/// Strips the `${` and `}` delimiters from a template. Text without the
/// delimiters is returned unchanged.
#[must_use]
pub fn template_body(expression: &str) -> &str {
    let trimmed = expression.trim();
    trimmed
        .strip_prefix("${")
        .and_then(|rest| rest.strip_suffix('}'))
        .unwrap_or(trimmed)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;

    struct Flagged {
        flag: &'static str,
    }

    impl Validatable for Flagged {
        fn schema(&self) -> &Schema {
            static EMPTY: Schema = Schema::empty();
            &EMPTY
        }

        fn field(&self, name: &str) -> Result<Value<'_>, AccessError> {
            match name {
                "flag" => Ok(Value::text(self.flag)),
                _ => Err(AccessError::unknown_field(name)),
            }
        }
    }

    #[test]
    fn test_template_body() {
        assert_eq!(template_body("${true}"), "true");
        assert_eq!(template_body("  ${ a == 'b' }  "), " a == 'b' ");
        assert_eq!(template_body("a == b"), "a == b");
        assert_eq!(template_body("${}"), "");
    }

    #[test]
    fn test_default_predicate_holds() {
        let record = Flagged { flag: "0" };
        assert!(ExpressionEvaluator.evaluate("${true}", &record).unwrap());
    }

    #[test]
    fn test_blank_is_false() {
        let record = Flagged { flag: "0" };
        assert!(!ExpressionEvaluator.evaluate("", &record).unwrap());
        assert!(!ExpressionEvaluator.evaluate("   ", &record).unwrap());
        assert!(!ExpressionEvaluator.evaluate("${ }", &record).unwrap());
    }

    #[test]
    fn test_field_comparison() {
        let record = Flagged { flag: "0" };
        assert!(ExpressionEvaluator.evaluate("${flag == '0'}", &record).unwrap());
        let record = Flagged { flag: "1" };
        assert!(!ExpressionEvaluator.evaluate("${flag == '0'}", &record).unwrap());
    }

    #[test]
    fn test_malformed_is_error() {
        let record = Flagged { flag: "0" };
        let err = ExpressionEvaluator
            .evaluate("${flag ==}", &record)
            .unwrap_err();
        assert!(matches!(err, PredicateError::Syntax { .. }));
    }

    #[test]
    fn test_non_boolean_is_error() {
        let record = Flagged { flag: "0" };
        let err = ExpressionEvaluator.evaluate("${flag}", &record).unwrap_err();
        assert_eq!(err, PredicateError::NotBoolean { found: "text" });
    }

    #[test]
    fn test_closure_evaluator() {
        let evaluator = |expression: &str, _: &dyn Validatable| -> Result<bool, PredicateError> {
            Ok(expression == "always")
        };
        let record = Flagged { flag: "0" };
        assert!(evaluator.evaluate("always", &record).unwrap());
        assert!(!evaluator.evaluate("never", &record).unwrap());
        assert!(!evaluator.evaluate(" ", &record).unwrap());
    }
}
