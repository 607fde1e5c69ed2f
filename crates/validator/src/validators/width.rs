//! Display width of text
//!
//! Length bounds on text are measured in display units rather than bytes or
//! chars. Characters from U+0391 to U+FFE5 (Greek, Cyrillic, CJK, kana,
//! hangul, full-width forms) take two units. Everything else takes one unit
//! per UTF-16 code unit, so characters outside the Basic Multilingual Plane
//! take two as well.

use std::ops::RangeInclusive;

/// Code points measured as two units.
pub const WIDE_RANGE: RangeInclusive<char> = '\u{0391}'..='\u{FFE5}';

/// Returns the display width of one character.
#[inline]
#[must_use]
pub fn char_width(ch: char) -> usize {
    if WIDE_RANGE.contains(&ch) {
        2
    } else {
        ch.len_utf16()
    }
}

/// Returns the display width of a string.
#[must_use]
pub fn display_width(input: &str) -> usize {
    input.chars().map(char_width).sum()
}
