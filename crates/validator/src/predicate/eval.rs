//! Evaluation of predicate expressions against a record

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{LazyLock, PoisonError, RwLock};

use regex::Regex;

use super::PredicateError;
use super::parser::{BinaryOp, Expr, Literal};
use crate::foundation::{Validatable, Value, is_empty};
use crate::validators::display_width;

/// Evaluates `expr` with `context` as the record whose fields and methods
/// identifiers refer to.
pub fn evaluate<'r>(expr: &Expr, context: &'r dyn Validatable) -> Result<Value<'r>, PredicateError> {
    match expr {
        Expr::Literal(literal) => Ok(literal_value(literal)),
        Expr::Field(name) => Ok(context.field(name)?),
        Expr::Property { object, name } => match evaluate(object, context)? {
            Value::Record(record) => Ok(record.field(name)?),
            Value::Null => Ok(Value::Null),
            other => Err(PredicateError::type_mismatch(".", "record", &other)),
        },
        Expr::Call {
            receiver: None,
            name,
            args,
        } => {
            let args = evaluate_all(args, context)?;
            match builtin(name, &args)? {
                Some(value) => Ok(value),
                None => Ok(context.call(name, &args)?),
            }
        }
        Expr::Call {
            receiver: Some(receiver),
            name,
            args,
        } => match evaluate(receiver, context)? {
            Value::Record(record) => {
                let args = evaluate_all(args, context)?;
                Ok(record.call(name, &args)?)
            }
            other => Err(PredicateError::type_mismatch(name, "record", &other)),
        },
        Expr::Not(inner) => Ok(Value::Bool(!expect_bool("!", evaluate(inner, context)?)?)),
        Expr::Negate(inner) => negate(evaluate(inner, context)?),
        Expr::Binary { left, op, right } => binary(*op, left, right, context),
    }
}

fn evaluate_all<'r>(
    exprs: &[Expr],
    context: &'r dyn Validatable,
) -> Result<Vec<Value<'r>>, PredicateError> {
    exprs.iter().map(|e| evaluate(e, context)).collect()
}

fn literal_value(literal: &Literal) -> Value<'static> {
    match literal {
        Literal::Null => Value::Null,
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Int(n) => Value::Int(*n),
        Literal::Decimal(d) => Value::Decimal(*d),
        Literal::Text(s) => Value::Text(Cow::Owned(s.clone())),
    }
}

fn builtin<'r>(name: &str, args: &[Value<'r>]) -> Result<Option<Value<'r>>, PredicateError> {
    let single = |function: &'static str| match args {
        [arg] => Ok(arg),
        _ => Err(PredicateError::Arity {
            function,
            expected: 1,
            found: args.len(),
        }),
    };

    let value = match name {
        "isEmpty" => Value::Bool(is_empty(single("isEmpty")?)),
        "isBlank" => Value::Bool(match single("isBlank")? {
            Value::Text(s) => s.trim().is_empty(),
            other => is_empty(other),
        }),
        "length" => match single("length")? {
            Value::Text(s) => Value::UInt(display_width(s) as u64),
            Value::List(items) => Value::UInt(items.len() as u64),
            Value::Map(entries) => Value::UInt(entries.len() as u64),
            Value::Null => Value::UInt(0),
            other => return Err(PredicateError::type_mismatch("length", "text", other)),
        },
        _ => return Ok(None),
    };
    Ok(Some(value))
}

fn expect_bool(operation: &'static str, value: Value<'_>) -> Result<bool, PredicateError> {
    match value {
        Value::Bool(b) => Ok(b),
        other => Err(PredicateError::type_mismatch(operation, "bool", &other)),
    }
}

fn negate(value: Value<'_>) -> Result<Value<'_>, PredicateError> {
    match value {
        Value::Int(n) => Ok(n
            .checked_neg()
            .map_or_else(|| Value::Decimal(-rust_decimal::Decimal::from(n)), Value::Int)),
        Value::UInt(n) => Ok(Value::Decimal(-rust_decimal::Decimal::from(n))),
        Value::Float(n) => Ok(Value::Float(-n)),
        Value::Float32(n) => Ok(Value::Float32(-n)),
        Value::Decimal(d) => Ok(Value::Decimal(-d)),
        other => Err(PredicateError::type_mismatch("-", "number", &other)),
    }
}

fn binary<'r>(
    op: BinaryOp,
    left: &Expr,
    right: &Expr,
    context: &'r dyn Validatable,
) -> Result<Value<'r>, PredicateError> {
    let operands = || -> Result<(Value<'r>, Value<'r>), PredicateError> {
        Ok((evaluate(left, context)?, evaluate(right, context)?))
    };

    let result = match op {
        // Logical operators short-circuit.
        BinaryOp::And => {
            expect_bool("&&", evaluate(left, context)?)?
                && expect_bool("&&", evaluate(right, context)?)?
        }
        BinaryOp::Or => {
            expect_bool("||", evaluate(left, context)?)?
                || expect_bool("||", evaluate(right, context)?)?
        }
        BinaryOp::Equal => {
            let (lhs, rhs) = operands()?;
            values_equal(&lhs, &rhs)
        }
        BinaryOp::NotEqual => {
            let (lhs, rhs) = operands()?;
            !values_equal(&lhs, &rhs)
        }
        BinaryOp::LessThan => {
            let (lhs, rhs) = operands()?;
            compare("<", &lhs, &rhs)? == Ordering::Less
        }
        BinaryOp::LessEqual => {
            let (lhs, rhs) = operands()?;
            compare("<=", &lhs, &rhs)? != Ordering::Greater
        }
        BinaryOp::GreaterThan => {
            let (lhs, rhs) = operands()?;
            compare(">", &lhs, &rhs)? == Ordering::Greater
        }
        BinaryOp::GreaterEqual => {
            let (lhs, rhs) = operands()?;
            compare(">=", &lhs, &rhs)? != Ordering::Less
        }
        BinaryOp::Matches => {
            let (lhs, rhs) = operands()?;
            matches_pattern(&lhs, &rhs)?
        }
    };
    Ok(Value::Bool(result))
}

fn values_equal(lhs: &Value<'_>, rhs: &Value<'_>) -> bool {
    match (lhs, rhs) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Text(a), Value::Text(b)) => a == b,
        (a, b) if a.is_number() && b.is_number() => {
            compare_numbers(a, b).is_some_and(|o| o == Ordering::Equal)
        }
        _ => false,
    }
}

fn compare(
    operation: &'static str,
    lhs: &Value<'_>,
    rhs: &Value<'_>,
) -> Result<Ordering, PredicateError> {
    match (lhs, rhs) {
        (Value::Text(a), Value::Text(b)) => Ok(a.cmp(b)),
        (a, b) if a.is_number() && b.is_number() => compare_numbers(a, b)
            .ok_or_else(|| PredicateError::type_mismatch(operation, "comparable number", b)),
        (a, b) if a.is_number() || matches!(a, Value::Text(_)) => {
            Err(PredicateError::type_mismatch(operation, a.type_name(), b))
        }
        (a, _) => Err(PredicateError::type_mismatch(operation, "number or text", a)),
    }
}

fn compare_numbers(lhs: &Value<'_>, rhs: &Value<'_>) -> Option<Ordering> {
    match (lhs.to_decimal(), rhs.to_decimal()) {
        (Some(a), Some(b)) => Some(a.cmp(&b)),
        _ => as_f64(lhs)?.partial_cmp(&as_f64(rhs)?),
    }
}

fn as_f64(value: &Value<'_>) -> Option<f64> {
    use rust_decimal::prelude::ToPrimitive;
    match value {
        Value::Int(n) => Some(*n as f64),
        Value::UInt(n) => Some(*n as f64),
        Value::Float(n) => Some(*n),
        Value::Float32(n) => Some(f64::from(*n)),
        Value::Decimal(d) => d.to_f64(),
        _ => None,
    }
}

fn matches_pattern(lhs: &Value<'_>, rhs: &Value<'_>) -> Result<bool, PredicateError> {
    let Value::Text(pattern) = rhs else {
        return Err(PredicateError::type_mismatch("matches", "text pattern", rhs));
    };
    let subject = match lhs {
        Value::Null => return Ok(false),
        other => other
            .scalar_text()
            .ok_or_else(|| PredicateError::type_mismatch("matches", "text", other))?,
    };
    Ok(compiled(pattern)?.is_match(&subject))
}

/// Compiled `matches` patterns, keyed by the source pattern.
static PATTERNS: LazyLock<RwLock<HashMap<String, Regex>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Distinct patterns kept compiled. Patterns past the limit are compiled on
/// every use.
const PATTERN_CACHE_LIMIT: usize = 256;

fn compiled(pattern: &str) -> Result<Regex, PredicateError> {
    let cached = PATTERNS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(pattern)
        .cloned();
    if let Some(regex) = cached {
        return Ok(regex);
    }

    let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(|e| PredicateError::InvalidRegex {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;

    let mut patterns = PATTERNS.write().unwrap_or_else(PoisonError::into_inner);
    if patterns.len() < PATTERN_CACHE_LIMIT {
        patterns.insert(pattern.to_string(), regex.clone());
    }
    Ok(regex)
}

// ============================================================================
// TESTS
// ============================================================================
