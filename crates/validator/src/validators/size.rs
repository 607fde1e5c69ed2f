//! Size checking
//!
//! Evaluates a resolved [`SizeRule`] against the string form of a value.
//! Text mode bounds the display width (see [`display_width`]). Numeric mode
//! reads the text as an exact decimal of any precision and bounds the digit
//! counts of its plain representation.

use thiserror::Error;

use super::width::display_width;
use crate::schema::SizeRule;

/// How a value broke its size rule.
///
/// The `Display` form is the message tail that follows the field label.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeViolation {
    /// Numeric mode, but the text is not a number.
    #[error("cannot be converted to a number")]
    NotANumber,

    /// The effective fraction bound is 0, but the value has a fraction.
    #[error("must be an integer")]
    NotAnInteger,

    /// Too many integer digits, only the integer bound is set.
    #[error("integer part must not exceed {max} digits")]
    IntegerDigits { max: i32 },

    /// Too many fraction digits, only the fraction bound is set.
    #[error("fraction part must not exceed {max} digits")]
    FractionDigits { max: i32 },

    /// Too many digits, both bounds are set.
    #[error("length must not exceed <{integer},{fraction}>")]
    Digits { integer: i32, fraction: i32 },

    /// Length differs from the single allowed length.
    #[error("length must equal {len}")]
    LengthEquals { len: i32 },

    /// Length outside `[min, max]`.
    #[error("length must be between {min} and {max}")]
    LengthBetween { min: i32, max: i32 },

    /// Length above `max`, no minimum set.
    #[error("length must not exceed {max}")]
    LengthAtMost { max: i32 },

    /// Length below `min`, no maximum set.
    #[error("length must not be less than {min}")]
    LengthAtLeast { min: i32 },
}

/// Checks `text` against `rule`.
///
/// The rule is taken as-is: numeric promotion of rules on numeric fields is
/// the caller's job (see [`SizeRule::promoted`]).
pub fn check_size(rule: &SizeRule, text: &str) -> Result<(), SizeViolation> {
    if rule.is_unset() {
        return Ok(());
    }
    if rule.numeric {
        check_digits(rule, text)
    } else {
        check_length(rule, text)
    }
}

/// Returns the integer-part and fraction-part lengths of the plain
/// representation of the decimal number in `text`, or `None` when `text` is
/// not a number.
///
/// `text` is an optional sign, digits with an optional point, and an optional
/// exponent (`-12.50`, `.5`, `1.5E-3`). The plain representation drops
/// leading zeros, keeps trailing fraction zeros, and writes exponents out in
/// full, so `1.5E-3` counts as `0.0015` and `1e30` as 31 integer digits.
/// A minus sign counts toward the integer part unless the value is zero.
/// Precision is unbounded: digits are counted, never converted.
#[must_use]
pub fn digit_counts(text: &str) -> Option<(usize, usize)> {
    let (negative, unsigned) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };
    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(at) => (&unsigned[..at], unsigned[at + 1..].parse::<i32>().ok()?),
        None => (unsigned, 0),
    };
    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }

    let digits = whole.bytes().chain(fraction.bytes());
    if !digits.clone().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let leading_zeros = digits.take_while(|&b| b == b'0').count();
    let significant = whole.len() + fraction.len() - leading_zeros;
    let scale = i64::try_from(fraction.len()).ok()? - i64::from(exponent);

    let (integer_len, fraction_len) = if scale <= 0 {
        let zeros = usize::try_from(-scale).ok()?;
        if significant == 0 { (1, 0) } else { (significant + zeros, 0) }
    } else {
        let scale = usize::try_from(scale).ok()?;
        (significant.saturating_sub(scale).max(1), scale)
    };
    Some((integer_len + usize::from(negative && significant > 0), fraction_len))
}

fn check_digits(rule: &SizeRule, text: &str) -> Result<(), SizeViolation> {
    let integer = rule.integer.max(1);
    let fraction = rule.fraction.max(0);

    let (integer_len, fraction_len) = digit_counts(text).ok_or(SizeViolation::NotANumber)?;

    if fraction == 0 && fraction_len > 0 {
        return Err(SizeViolation::NotAnInteger);
    }

    let integer_set = integer != SizeRule::UNSET.integer;
    let fraction_set = fraction != SizeRule::UNSET.fraction;
    let integer_over = integer_len > integer as usize;
    let fraction_over = fraction_len > fraction as usize;

    match (integer_set, fraction_set) {
        (false, false) => Ok(()),
        (true, true) if integer_over || fraction_over => {
            Err(SizeViolation::Digits { integer, fraction })
        }
        (true, false) if integer_over => Err(SizeViolation::IntegerDigits { max: integer }),
        (false, true) if fraction_over => Err(SizeViolation::FractionDigits { max: fraction }),
        _ => Ok(()),
    }
}

fn check_length(rule: &SizeRule, text: &str) -> Result<(), SizeViolation> {
    let max = rule.max.clamp(0, SizeRule::UNBOUNDED);
    let min = rule.min.clamp(0, SizeRule::UNBOUNDED);
    let (min, max) = if min <= max { (min, max) } else { (max, min) };

    let min_set = min != SizeRule::UNSET.min;
    let max_set = max != SizeRule::UNSET.max;
    let len = display_width(text);
    let too_long = len > max as usize;
    let too_short = len < min as usize;

    match (min_set, max_set) {
        (false, false) => Ok(()),
        (true, true) if too_long || too_short => {
            if min == max {
                Err(SizeViolation::LengthEquals { len: min })
            } else {
                Err(SizeViolation::LengthBetween { min, max })
            }
        }
        (false, true) if too_long => Err(SizeViolation::LengthAtMost { max }),
        (true, false) if too_short => Err(SizeViolation::LengthAtLeast { min }),
        _ => Ok(()),
    }
}

// ============================================================================
// TESTS
// ============================================================================
