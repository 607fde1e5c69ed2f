//! Macros for attaching constraints to plain structs.
//!
//! # Available Macros
//!
//! - [`validatable!`]: implement [`Validatable`](crate::foundation::Validatable)
//!   and [`AsValue`](crate::foundation::AsValue) from a field listing
//!
//! # Examples
//!
//! ```rust,ignore
//! use palisade_validator::prelude::*;
//! use palisade_validator::validatable;
//!
//! struct Address {
//!     city: Option<String>,
//! }
//!
//! validatable! {
//!     Address {
//!         city: [Constraint::new().required()],
//!     }
//! }
//!
//! struct Order {
//!     code: String,
//!     buyer_check: String,
//!     address: Address,
//! }
//!
//! validatable! {
//!     Order as "order" {
//!         code: [Constraint::new().required().size(SizeRule::length(1, 20))],
//!         buyer_check: [],
//!         address: [Constraint::new()],
//!     }
//!     methods {
//!         "isDomestic" => is_domestic,
//!     }
//! }
//! ```

use crate::foundation::{AsValue, FieldKind};

/// Declared kind of the field selected by `select`.
///
/// Used by [`validatable!`] to read a field's [`FieldKind`] from its type
/// without an instance at hand.
#[doc(hidden)]
pub fn kind_of<R, T, F>(select: F) -> FieldKind
where
    R: ?Sized,
    T: AsValue + ?Sized,
    F: Fn(&R) -> &T,
{
    let _ = select;
    T::KIND
}

// ============================================================================
// VALIDATABLE MACRO
// ============================================================================

/// Implements [`Validatable`](crate::foundation::Validatable) and
/// [`AsValue`](crate::foundation::AsValue) for a struct.
///
/// Each listed field is readable by name from predicates. Fields listed
/// with constraints are also part of the schema, in listing order, with
/// their [`FieldKind`](crate::foundation::FieldKind) taken from the field
/// type. A field listed with `[]` is readable but never validated.
///
/// The schema is built once, on first use, and shared by all instances.
///
/// # Syntax
///
/// ```rust,ignore
/// validatable! {
///     Type as "display name" {        // `as ...` is optional
///         field: [constraint, ...],
///         ...
///     }
///     methods {                       // optional block
///         "predicateName" => method,  // `fn method(&self) -> bool`
///     }
/// }
/// ```
#[macro_export]
macro_rules! validatable {
    (
        $ty:ty $(as $display:literal)? {
            $( $field:ident : [ $($constraint:expr),* $(,)? ] ),* $(,)?
        }
        $( methods { $( $method:literal => $func:ident ),* $(,)? } )?
    ) => {
        impl $crate::foundation::Validatable for $ty {
            fn schema(&self) -> &$crate::schema::Schema {
                static SCHEMA: ::std::sync::LazyLock<$crate::schema::Schema> =
                    ::std::sync::LazyLock::new(|| {
                        let builder = $crate::schema::Schema::builder();
                        $( let builder = builder.display_name($display); )?
                        builder
                            $(
                                .field(
                                    ::std::stringify!($field),
                                    $crate::macros::kind_of(|record: &$ty| &record.$field),
                                    [$($constraint),*],
                                )
                            )*
                            .build()
                    });
                &SCHEMA
            }

            fn field(
                &self,
                name: &str,
            ) -> ::std::result::Result<$crate::foundation::Value<'_>, $crate::foundation::AccessError> {
                match name {
                    $(
                        ::std::stringify!($field) => ::std::result::Result::Ok(
                            $crate::foundation::AsValue::as_value(&self.$field),
                        ),
                    )*
                    _ => ::std::result::Result::Err($crate::foundation::AccessError::unknown_field(name)),
                }
            }

            fn call(
                &self,
                method: &str,
                args: &[$crate::foundation::Value<'_>],
            ) -> ::std::result::Result<$crate::foundation::Value<'_>, $crate::foundation::AccessError> {
                let _ = args;
                match method {
                    $($(
                        $method => ::std::result::Result::Ok($crate::foundation::Value::Bool(self.$func())),
                    )*)?
                    _ => ::std::result::Result::Err($crate::foundation::AccessError::unknown_method(method)),
                }
            }
        }

        impl $crate::foundation::AsValue for $ty {
            const KIND: $crate::foundation::FieldKind = $crate::foundation::FieldKind::Other;

            fn as_value(&self) -> $crate::foundation::Value<'_> {
                $crate::foundation::Value::Record(self)
            }
        }
    };
}
