//! Runtime view of field values
//!
//! The engine never touches user structs directly. Every field is read
//! through [`Validatable::field`](super::Validatable::field), which hands
//! back a borrowed [`Value`]. The value carries just enough shape for the
//! engine to decide between size checking, element-wise iteration and
//! recursion into a nested record.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use rust_decimal::Decimal;

use super::traits::Validatable;

// ============================================================================
// FIELD KIND
// ============================================================================

/// Declared type of a field, as seen by the size checker.
///
/// `bool`, `char`, `i8` and `u8` fields are classified as
/// [`FieldKind::Text`]: they are checked through their string form but never
/// promoted to numeric mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Built-in integer or floating point type.
    Numeric,
    /// Text or another non-numeric built-in scalar.
    Text,
    /// Arbitrary precision decimal.
    Decimal,
    /// Anything else: nested records, collections, maps.
    #[default]
    Other,
}

impl FieldKind {
    /// Returns true for kinds whose values are size-checked instead of
    /// traversed.
    #[must_use]
    pub fn is_leaf(self) -> bool {
        !matches!(self, Self::Other)
    }

    /// Returns true for kinds that force numeric size checking.
    #[must_use]
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Numeric | Self::Decimal)
    }
}

// ============================================================================
// VALUE
// ============================================================================

/// A borrowed, dynamically typed view of a field value.
#[derive(Clone)]
pub enum Value<'a> {
    /// Absent value.
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    UInt(u64),
    /// Double precision floating point number.
    Float(f64),
    /// Single precision floating point number, kept apart so its text form
    /// is the shortest `f32` representation.
    Float32(f32),
    /// Exact decimal.
    Decimal(Decimal),
    /// Text.
    Text(Cow<'a, str>),
    /// Ordered or unordered collection, visited element by element.
    List(Vec<Value<'a>>),
    /// String-keyed mapping. Entries carry no constraints of their own.
    Map(Vec<(Cow<'a, str>, Value<'a>)>),
    /// Nested record with its own schema.
    Record(&'a dyn Validatable),
}

impl<'a> Value<'a> {
    /// Creates a text value.
    pub fn text(s: impl Into<Cow<'a, str>>) -> Self {
        Self::Text(s.into())
    }

    /// Human readable name of the variant, used in predicate errors.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) | Self::UInt(_) | Self::Float(_) | Self::Float32(_) => "number",
            Self::Decimal(_) => "decimal",
            Self::Text(_) => "text",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Record(_) => "record",
        }
    }

    /// Returns true for `Null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the string form used by size checks.
    ///
    /// Integers and floats use `Display`, which never switches to scientific
    /// notation. Decimals keep their scale (`1.50` stays `1.50`). Composite
    /// values and null have no string form.
    #[must_use]
    pub fn scalar_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
            Self::Int(n) => Some(Cow::Owned(n.to_string())),
            Self::UInt(n) => Some(Cow::Owned(n.to_string())),
            Self::Float(n) => Some(Cow::Owned(n.to_string())),
            Self::Float32(n) => Some(Cow::Owned(n.to_string())),
            Self::Decimal(d) => Some(Cow::Owned(d.to_string())),
            Self::Text(s) => Some(Cow::Borrowed(s.as_ref())),
            Self::Null | Self::List(_) | Self::Map(_) | Self::Record(_) => None,
        }
    }

    /// Returns true for the numeric variants.
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(
            self,
            Self::Int(_) | Self::UInt(_) | Self::Float(_) | Self::Float32(_) | Self::Decimal(_)
        )
    }

    /// Converts a numeric value to an exact decimal where possible.
    #[must_use]
    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Int(n) => Some(Decimal::from(*n)),
            Self::UInt(n) => Some(Decimal::from(*n)),
            Self::Float(n) => Decimal::try_from(*n).ok(),
            Self::Float32(n) => Decimal::try_from(*n).ok(),
            Self::Decimal(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Int(n) => f.debug_tuple("Int").field(n).finish(),
            Self::UInt(n) => f.debug_tuple("UInt").field(n).finish(),
            Self::Float(n) => f.debug_tuple("Float").field(n).finish(),
            Self::Float32(n) => f.debug_tuple("Float32").field(n).finish(),
            Self::Decimal(d) => f.debug_tuple("Decimal").field(d).finish(),
            Self::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Self::List(items) => f.debug_tuple("List").field(items).finish(),
            Self::Map(entries) => f.debug_tuple("Map").field(entries).finish(),
            Self::Record(record) => f
                .debug_tuple("Record")
                .field(&record.schema().display_name().unwrap_or("<record>"))
                .finish(),
        }
    }
}

/// Returns true when a value counts as empty for `allow_empty` purposes:
/// null, an empty string, an empty collection or an empty mapping.
#[must_use]
pub fn is_empty(value: &Value<'_>) -> bool {
    match value {
        Value::Null => true,
        Value::Text(s) => s.is_empty(),
        Value::List(items) => items.is_empty(),
        Value::Map(entries) => entries.is_empty(),
        _ => false,
    }
}

// ============================================================================
// AS VALUE
// ============================================================================

/// Conversion from a Rust field into a [`Value`], together with the field's
/// declared [`FieldKind`].
///
/// Records generated by [`validatable!`](crate::validatable) implement this
/// trait as `Value::Record(self)`.
pub trait AsValue {
    /// Declared kind of the field type.
    const KIND: FieldKind;

    /// Borrows the field as a [`Value`].
    fn as_value(&self) -> Value<'_>;
}

macro_rules! signed_as_value {
    ($($ty:ty),*) => {$(
        impl AsValue for $ty {
            const KIND: FieldKind = FieldKind::Numeric;
            fn as_value(&self) -> Value<'_> {
                Value::Int(i64::from(*self))
            }
        }
    )*};
}

macro_rules! unsigned_as_value {
    ($($ty:ty),*) => {$(
        impl AsValue for $ty {
            const KIND: FieldKind = FieldKind::Numeric;
            fn as_value(&self) -> Value<'_> {
                Value::UInt(u64::from(*self))
            }
        }
    )*};
}

signed_as_value!(i16, i32, i64);
unsigned_as_value!(u16, u32, u64);

// Bytes are checked as text, like `char`: a length rule on them stays a
// length rule.
impl AsValue for i8 {
    const KIND: FieldKind = FieldKind::Text;
    fn as_value(&self) -> Value<'_> {
        Value::Int(i64::from(*self))
    }
}

impl AsValue for u8 {
    const KIND: FieldKind = FieldKind::Text;
    fn as_value(&self) -> Value<'_> {
        Value::UInt(u64::from(*self))
    }
}

impl AsValue for isize {
    const KIND: FieldKind = FieldKind::Numeric;
    fn as_value(&self) -> Value<'_> {
        Value::Int(*self as i64)
    }
}

impl AsValue for usize {
    const KIND: FieldKind = FieldKind::Numeric;
    fn as_value(&self) -> Value<'_> {
        Value::UInt(*self as u64)
    }
}

impl AsValue for f32 {
    const KIND: FieldKind = FieldKind::Numeric;
    fn as_value(&self) -> Value<'_> {
        Value::Float32(*self)
    }
}

impl AsValue for f64 {
    const KIND: FieldKind = FieldKind::Numeric;
    fn as_value(&self) -> Value<'_> {
        Value::Float(*self)
    }
}

impl AsValue for bool {
    const KIND: FieldKind = FieldKind::Text;
    fn as_value(&self) -> Value<'_> {
        Value::Bool(*self)
    }
}

impl AsValue for char {
    const KIND: FieldKind = FieldKind::Text;
    fn as_value(&self) -> Value<'_> {
        Value::Text(Cow::Owned(self.to_string()))
    }
}

impl AsValue for String {
    const KIND: FieldKind = FieldKind::Text;
    fn as_value(&self) -> Value<'_> {
        Value::Text(Cow::Borrowed(self.as_str()))
    }
}

impl AsValue for &str {
    const KIND: FieldKind = FieldKind::Text;
    fn as_value(&self) -> Value<'_> {
        Value::Text(Cow::Borrowed(*self))
    }
}

impl AsValue for Decimal {
    const KIND: FieldKind = FieldKind::Decimal;
    fn as_value(&self) -> Value<'_> {
        Value::Decimal(*self)
    }
}

impl<T: AsValue> AsValue for Option<T> {
    const KIND: FieldKind = T::KIND;
    fn as_value(&self) -> Value<'_> {
        self.as_ref().map_or(Value::Null, AsValue::as_value)
    }
}

impl<T: AsValue> AsValue for Box<T> {
    const KIND: FieldKind = T::KIND;
    fn as_value(&self) -> Value<'_> {
        (**self).as_value()
    }
}

impl<T: AsValue> AsValue for Vec<T> {
    const KIND: FieldKind = FieldKind::Other;
    fn as_value(&self) -> Value<'_> {
        Value::List(self.iter().map(AsValue::as_value).collect())
    }
}

impl<T: AsValue> AsValue for [T] {
    const KIND: FieldKind = FieldKind::Other;
    fn as_value(&self) -> Value<'_> {
        Value::List(self.iter().map(AsValue::as_value).collect())
    }
}

impl<T: AsValue, const N: usize> AsValue for [T; N] {
    const KIND: FieldKind = FieldKind::Other;
    fn as_value(&self) -> Value<'_> {
        Value::List(self.iter().map(AsValue::as_value).collect())
    }
}

impl<V: AsValue> AsValue for BTreeMap<String, V> {
    const KIND: FieldKind = FieldKind::Other;
    fn as_value(&self) -> Value<'_> {
        Value::Map(
            self.iter()
                .map(|(k, v)| (Cow::Borrowed(k.as_str()), v.as_value()))
                .collect(),
        )
    }
}

impl<V: AsValue, S: std::hash::BuildHasher> AsValue for HashMap<String, V, S> {
    const KIND: FieldKind = FieldKind::Other;
    fn as_value(&self) -> Value<'_> {
        Value::Map(
            self.iter()
                .map(|(k, v)| (Cow::Borrowed(k.as_str()), v.as_value()))
                .collect(),
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================
