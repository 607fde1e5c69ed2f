//! # palisade-validator
//!
//! Declarative, metadata-driven validation of object graphs.
//!
//! Records describe their constrained fields in a [`Schema`](schema::Schema):
//! a label, an emptiness policy, a length or precision bound, and a
//! predicate gating each rule. The [`Validator`](engine::Validator) walks a
//! record depth-first, recursing into nested records and collections, and
//! returns a single [`Report`](foundation::Report) whose flattened message
//! keeps the nesting readable:
//!
//! ```text
//! code must not be empty,address(city must not be empty),items([{qty length must not exceed 3}])
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use palisade_validator::prelude::*;
//! use palisade_validator::validatable;
//!
//! struct Contract {
//!     contract_no: String,
//!     amount: Decimal,
//!     buyer_check: String,
//!     remark: Option<String>,
//! }
//!
//! validatable! {
//!     Contract as "contract" {
//!         contract_no: [Constraint::new().description("contract number").required()],
//!         amount: [Constraint::new().size(SizeRule::digits(16, 2))],
//!         buyer_check: [],
//!         remark: [Constraint::new().when("${buyer_check == '0'}").required()],
//!     }
//! }
//!
//! let report = validate(&contract);
//! assert!(report.is_valid(), "{report}");
//! ```
//!
//! ## Modules
//!
//! - [`foundation`]: values, the [`Validatable`](foundation::Validatable)
//!   trait, reports and fault types
//! - [`schema`]: constraint metadata and its JSON form
//! - [`predicate`]: the `${ ... }` gating language
//! - [`validators`]: size checks and display width
//! - [`engine`]: traversal

pub mod engine;
pub mod foundation;
#[doc(hidden)]
pub mod macros;
pub mod predicate;
pub mod prelude;
pub mod schema;
pub mod validators;
