//! Leaf checks applied to scalar field values
//!
//! - [`check_size`]: length and precision bounds from a
//!   [`SizeRule`](crate::schema::SizeRule)
//! - [`display_width`]: the length measure used by text bounds

pub mod size;
pub mod width;

pub use size::{SizeViolation, check_size, digit_counts};
pub use width::{char_width, display_width};
