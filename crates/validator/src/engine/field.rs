//! Constraint evaluation for a single field
//!
//! Every constraint of a field is evaluated on its own, in declaration
//! order, and produces one [`Report`]. A failing constraint does not stop
//! the ones after it.
//!
//! One constraint runs as follows:
//!
//! 1. A blank predicate skips the constraint.
//! 2. The predicate is evaluated against the owning record; call it the gate.
//! 3. A closed gate with a message fails right away with that message.
//! 4. The field value is read.
//! 5. An empty value fails with `must not be empty` when the gate is open
//!    and the constraint is `required`. Otherwise it passes.
//! 6. Scalars of a leaf [`FieldKind`](crate::foundation::FieldKind) are
//!    size checked.
//! 7. Anything else is validated recursively.
//!
//! Every message starts with the field label (see [`FieldSchema::label`]).

use super::Validator;
use crate::foundation::{Report, Validatable, ValidatorError, is_empty};
use crate::predicate::PredicateEvaluator;
use crate::schema::{Constraint, FieldSchema};
use crate::validators::check_size;

/// Evaluates every constraint of `field` on `owner`, returning one report
/// per constraint.
///
/// `depth` is the nesting level of `owner`; nested values are walked one
/// level deeper.
///
/// # Errors
///
/// Returns the first tooling fault met. Rule violations are never errors.
pub fn evaluate<E: PredicateEvaluator>(
    validator: &Validator<E>,
    owner: &dyn Validatable,
    field: &FieldSchema,
    depth: usize,
) -> Result<Vec<Report>, ValidatorError> {
    let label = field.label();
    field
        .constraints()
        .iter()
        .map(|constraint| execute_constraint(validator, owner, field, constraint, label, depth))
        .collect()
}

/// Evaluates one constraint of `field` on `owner`.
///
/// # Errors
///
/// Returns [`ValidatorError::Predicate`] when the gate cannot be evaluated,
/// [`ValidatorError::FieldAccess`] when the field cannot be read, and
/// [`ValidatorError::DepthExceeded`] when a nested value lies too deep.
pub fn execute_constraint<E: PredicateEvaluator>(
    validator: &Validator<E>,
    owner: &dyn Validatable,
    field: &FieldSchema,
    constraint: &Constraint,
    label: &str,
    depth: usize,
) -> Result<Report, ValidatorError> {
    if constraint.predicate.trim().is_empty() {
        return Ok(Report::new());
    }

    let gate = validator
        .evaluator()
        .evaluate(&constraint.predicate, owner)
        .map_err(|source| ValidatorError::Predicate {
            field: field.name().to_owned(),
            source,
        })?;

    if !gate {
        if !constraint.message.is_empty() {
            return Ok(Report::failure(format!("{label} {}", constraint.message)));
        }
        tracing::trace!(field = field.name(), predicate = %constraint.predicate, "gate closed");
    }

    let value = owner
        .field(field.name())
        .map_err(|source| ValidatorError::FieldAccess {
            field: field.name().to_owned(),
            source,
        })?;

    if is_empty(&value) {
        if gate && !constraint.allow_empty {
            return Ok(Report::failure(format!("{label} must not be empty")));
        }
        return Ok(Report::new());
    }

    let kind = field.kind();
    if kind.is_leaf()
        && let Some(text) = value.scalar_text()
    {
        let rule = constraint.size.promoted(kind.is_numeric());
        return Ok(match check_size(&rule, &text) {
            Ok(()) => Report::new(),
            Err(violation) => Report::failure(format!("{label} {violation}")),
        });
    }

    tracing::debug!(field = field.name(), depth, "validating nested value");
    let nested = validator.walk(&value, Some(label), depth + 1)?;
    Ok(Report::new().merge(nested))
}

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use rust_decimal::Decimal;

    use super::*;
    use crate::foundation::{AccessError, FieldKind, Value};
    use crate::schema::{Schema, SizeRule};

    struct Payment {
        flag: &'static str,
        serial: Option<&'static str>,
        amount: Decimal,
        count: i64,
    }

    static PAYMENT: LazyLock<Schema> = LazyLock::new(Schema::empty);

    impl Validatable for Payment {
        fn schema(&self) -> &Schema {
            &PAYMENT
        }

        fn field(&self, name: &str) -> Result<Value<'_>, AccessError> {
            match name {
                "flag" => Ok(Value::text(self.flag)),
                "serial" => Ok(self.serial.map_or(Value::Null, Value::text)),
                "amount" => Ok(Value::Decimal(self.amount)),
                "count" => Ok(Value::Int(self.count)),
                "locked" => Err(AccessError::inaccessible(name, "locked")),
                _ => Err(AccessError::unknown_field(name)),
            }
        }
    }

    fn payment() -> Payment {
        Payment {
            flag: "0",
            serial: None,
            amount: Decimal::new(12345, 2),
            count: 1234,
        }
    }

    fn run(field: &FieldSchema, owner: &Payment) -> Result<Vec<String>, ValidatorError> {
        let reports = evaluate(&Validator::new(), owner, field, 0)?;
        Ok(reports.iter().map(Report::error_message).collect())
    }

    #[test]
    fn test_one_report_per_constraint() {
        let field = FieldSchema::new(
            "serial",
            FieldKind::Text,
            [
                Constraint::new().description("serial number").required(),
                Constraint::new().when("${flag == '1'}").message("is locked"),
                Constraint::new(),
            ],
        );
        assert_eq!(
            run(&field, &payment()).unwrap(),
            [
                "serial number must not be empty",
                "serial number is locked",
                "",
            ]
        );
    }

    #[test]
    fn test_closed_gate_without_message_passes_empty_value() {
        let field = FieldSchema::new(
            "serial",
            FieldKind::Text,
            [Constraint::new().when("${flag == '1'}").required()],
        );
        assert_eq!(run(&field, &payment()).unwrap(), [""]);
    }

    #[test]
    fn test_closed_gate_still_checks_size() {
        let field = FieldSchema::new(
            "flag",
            FieldKind::Text,
            [Constraint::new()
                .when("${false}")
                .size(SizeRule::exact_length(2))],
        );
        assert_eq!(run(&field, &payment()).unwrap(), ["flag length must equal 2"]);
    }

    #[test]
    fn test_blank_predicate_skips() {
        let field = FieldSchema::new(
            "serial",
            FieldKind::Text,
            [Constraint::new().when("").required()],
        );
        assert_eq!(run(&field, &payment()).unwrap(), [""]);
    }

    #[test]
    fn test_numeric_promotion() {
        // Not flagged numeric, but the field is.
        let rule = SizeRule {
            integer: 3,
            ..SizeRule::UNSET
        };
        assert!(!rule.numeric);
        let field = FieldSchema::new(
            "count",
            FieldKind::Numeric,
            [Constraint::new().size(rule)],
        );
        assert_eq!(
            run(&field, &payment()).unwrap(),
            ["count integer part must not exceed 3 digits"]
        );
    }

    #[test]
    fn test_decimal_keeps_scale() {
        let field = FieldSchema::new(
            "amount",
            FieldKind::Decimal,
            [Constraint::new().size(SizeRule::digits(3, 1))],
        );
        assert_eq!(
            run(&field, &payment()).unwrap(),
            ["amount length must not exceed <3,1>"]
        );
    }

    #[test]
    fn test_predicate_fault() {
        let field = FieldSchema::new(
            "flag",
            FieldKind::Text,
            [Constraint::new().when("${flag ==}")],
        );
        let err = run(&field, &payment()).unwrap_err();
        assert_eq!(err.code(), "VALIDATOR:PREDICATE");
    }

    #[test]
    fn test_access_fault() {
        let field = FieldSchema::new("locked", FieldKind::Text, [Constraint::new()]);
        let err = run(&field, &payment()).unwrap_err();
        assert!(matches!(
            err,
            ValidatorError::FieldAccess {
                source: AccessError::Inaccessible { .. },
                ..
            }
        ));
    }
}
