//! Object graph traversal
//!
//! [`Validator`] walks a record depth-first. For each constrained field it
//! runs the field's constraints (see [`field`]), recursing into nested
//! records and collections reachable through those fields, and folds the
//! outcome into one [`Report`].
//!
//! # Examples
//!
//! ```rust,ignore
//! use palisade_validator::prelude::*;
//!
//! let report = Validator::new().validate(&order);
//! if !report.is_valid() {
//!     eprintln!("{}", report.error_message());
//! }
//! ```
//!
//! # Faults
//!
//! Rule violations end up as messages in the report. Tooling faults (a field
//! that cannot be read, a predicate that does not evaluate, a graph nested
//! beyond [`ValidatorConfig::max_depth`]) are logged at `warn` level and the
//! affected field is treated as passing.

pub mod field;

use serde::{Deserialize, Serialize};

use crate::foundation::{Report, Validatable, ValidatorError, Value};
use crate::predicate::{ExpressionEvaluator, PredicateEvaluator};

// ============================================================================
// CONFIG
// ============================================================================

/// Traversal settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Deepest nesting level the validator descends into. Each nested
    /// record or collection reached through a field adds one level.
    pub max_depth: usize,
}

impl ValidatorConfig {
    /// Default for [`ValidatorConfig::max_depth`].
    pub const DEFAULT_MAX_DEPTH: usize = 64;
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}

// ============================================================================
// VALIDATOR
// ============================================================================

/// Validates records against their schemas.
///
/// A validator holds no per-call state and can be shared between threads
/// when its evaluator can.
#[derive(Debug, Clone, Default)]
pub struct Validator<E = ExpressionEvaluator> {
    evaluator: E,
    config: ValidatorConfig,
}

impl Validator {
    /// Creates a validator using the built-in [`ExpressionEvaluator`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: PredicateEvaluator> Validator<E> {
    /// Creates a validator with a custom predicate evaluator.
    ///
    /// ```rust,ignore
    /// let validator = Validator::with_evaluator(|expr: &str, _: &dyn Validatable| {
    ///     Ok(expr == "${true}")
    /// });
    /// ```
    pub fn with_evaluator(evaluator: E) -> Self {
        Self {
            evaluator,
            config: ValidatorConfig::default(),
        }
    }

    /// Replaces the traversal settings.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_config(mut self, config: ValidatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the traversal settings.
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Returns the predicate evaluator.
    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Validates a record.
    pub fn validate(&self, record: &dyn Validatable) -> Report {
        self.validate_with(&Value::Record(record), None)
    }

    /// Validates any value, using `description` as the label of the
    /// returned report.
    ///
    /// - `Null` yields an empty valid report.
    /// - A record's schema display name, when set, replaces `description`.
    /// - A list validates every element with the same description and
    ///   aggregates the failures as `[{..},{..}]`.
    /// - A record runs the constraints of every constrained field.
    /// - Scalars and maps carry no constraints of their own and are valid.
    pub fn validate_with(&self, value: &Value<'_>, description: Option<&str>) -> Report {
        match self.walk(value, description, 0) {
            Ok(report) => report,
            Err(error) => {
                tracing::warn!(code = error.code(), error = %error, "validation skipped");
                Report::new()
            }
        }
    }

    pub(crate) fn walk(
        &self,
        value: &Value<'_>,
        description: Option<&str>,
        depth: usize,
    ) -> Result<Report, ValidatorError> {
        if depth > self.config.max_depth {
            return Err(ValidatorError::DepthExceeded {
                max_depth: self.config.max_depth,
            });
        }

        let description = match value {
            Value::Null => return Ok(Report::new()),
            Value::Record(record) => record.schema().display_name().or(description),
            _ => description,
        };
        let report = Report::new().with_description(description.map(str::to_owned));

        match value {
            Value::List(items) => {
                tracing::trace!(len = items.len(), depth, "validating list elements");
                let elements = items
                    .iter()
                    .map(|item| self.walk(item, description, depth + 1))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(report.merge_list(elements))
            }
            Value::Record(record) => Ok(self.walk_record(*record, report, depth)),
            _ => Ok(report),
        }
    }

    fn walk_record(&self, record: &dyn Validatable, mut report: Report, depth: usize) -> Report {
        for schema in record.schema().fields() {
            match field::evaluate(self, record, schema, depth) {
                Ok(reports) => {
                    for child in reports.into_iter().filter(|r| !r.is_valid()) {
                        report = report.merge(child);
                    }
                }
                Err(error) => {
                    tracing::warn!(
                        field = schema.name(),
                        code = error.code(),
                        error = %error,
                        "field skipped after tooling fault"
                    );
                }
            }
        }
        report
    }
}

/// Validates a record with a default [`Validator`].
pub fn validate(record: &dyn Validatable) -> Report {
    Validator::new().validate(record)
}
