//! Length and precision bounds

use serde::{Deserialize, Serialize};

/// A length or precision bound with explicit "unset" markers.
///
/// `min`/`max` bound the display length of text. `integer`/`fraction`
/// bound the digit counts of a number. `numeric` selects which pair is
/// active. A rule whose four bounds all sit at their sentinels
/// ([`SizeRule::UNSET`]) imposes nothing, whatever `numeric` says.
///
/// Bounds are plain `i32`s: authors may write them in any order or even
/// negative, and the checker normalizes them before comparing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeRule {
    /// Minimum display length. Sentinel `0`.
    pub min: i32,
    /// Maximum display length. Sentinel [`SizeRule::UNBOUNDED`].
    pub max: i32,
    /// Maximum integer-part digits. Sentinel [`SizeRule::UNBOUNDED`].
    pub integer: i32,
    /// Maximum fraction-part digits. Sentinel `0`.
    pub fraction: i32,
    /// Checks digits instead of length.
    pub numeric: bool,
}

impl SizeRule {
    /// Largest representable bound, used as the "unset" marker for `max`
    /// and `integer`.
    pub const UNBOUNDED: i32 = i32::MAX;

    /// The all-sentinel rule.
    pub const UNSET: Self = Self {
        min: 0,
        max: Self::UNBOUNDED,
        integer: Self::UNBOUNDED,
        fraction: 0,
        numeric: false,
    };

    /// Text length between `min` and `max` inclusive.
    #[must_use]
    pub const fn length(min: i32, max: i32) -> Self {
        Self {
            min,
            max,
            ..Self::UNSET
        }
    }

    /// Text length of at least `min`.
    #[must_use]
    pub const fn min_length(min: i32) -> Self {
        Self { min, ..Self::UNSET }
    }

    /// Text length of at most `max`.
    #[must_use]
    pub const fn max_length(max: i32) -> Self {
        Self { max, ..Self::UNSET }
    }

    /// Text length of exactly `len`.
    #[must_use]
    pub const fn exact_length(len: i32) -> Self {
        Self::length(len, len)
    }

    /// Numeric precision: at most `integer` integer digits and `fraction`
    /// fraction digits.
    #[must_use]
    pub const fn digits(integer: i32, fraction: i32) -> Self {
        Self {
            integer,
            fraction,
            numeric: true,
            ..Self::UNSET
        }
    }

    /// Numeric precision bounding only the integer part. Fractions are
    /// rejected, since the fraction bound stays at `0`.
    #[must_use]
    pub const fn integer_digits(integer: i32) -> Self {
        Self::digits(integer, 0)
    }

    /// Numeric precision bounding only the fraction part.
    #[must_use]
    pub const fn fraction_digits(fraction: i32) -> Self {
        Self::digits(Self::UNBOUNDED, fraction)
    }

    /// Switches the rule to numeric mode.
    #[must_use]
    pub const fn numeric(mut self) -> Self {
        self.numeric = true;
        self
    }

    /// Returns true when all four bounds are at their sentinels.
    #[must_use]
    pub const fn is_unset(&self) -> bool {
        self.min == Self::UNSET.min
            && self.max == Self::UNSET.max
            && self.integer == Self::UNSET.integer
            && self.fraction == Self::UNSET.fraction
    }

    /// Returns the rule in numeric mode when `numeric_field` is set, keeping
    /// the four bounds as they are.
    #[must_use]
    pub const fn promoted(self, numeric_field: bool) -> Self {
        if numeric_field && !self.numeric {
            self.numeric()
        } else {
            self
        }
    }
}

impl Default for SizeRule {
    fn default() -> Self {
        Self::UNSET
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unset() {
        assert!(SizeRule::default().is_unset());
        assert!(SizeRule::UNSET.numeric().is_unset());
    }

    #[test]
    fn test_constructors() {
        assert_eq!(SizeRule::length(1, 20).min, 1);
        assert_eq!(SizeRule::length(1, 20).max, 20);
        assert!(!SizeRule::length(1, 20).numeric);

        let d = SizeRule::digits(3, 2);
        assert_eq!((d.integer, d.fraction, d.numeric), (3, 2, true));
        assert!(!SizeRule::max_length(5).is_unset());
        assert!(!SizeRule::fraction_digits(2).is_unset());
    }

    #[test]
    fn test_promoted_keeps_bounds() {
        let rule = SizeRule::length(2, 4);
        let promoted = rule.promoted(true);
        assert!(promoted.numeric);
        assert_eq!((promoted.min, promoted.max), (2, 4));
        assert_eq!(rule.promoted(false), rule);
    }

    #[test]
    fn test_deserialize_partial() {
        let rule: SizeRule = serde_json::from_str(r#"{"max": 32}"#).unwrap();
        assert_eq!(rule, SizeRule::max_length(32));
    }
}
