//! Equality assertions that explain themselves.
//!
//! - [`describe_difference`] - Why two composite values are not equal
//! - [`assert_equal`] - Structural equality check with an explained failure
//! - [`assert_equal!`](crate::assert_equal) - Panicking form for test bodies
//! - [`assert_raises`] / [`Raises`] - Check the type and text of an error
//! - [`assert_raises!`](crate::assert_raises) - Panicking form for test bodies
//!
//! # Example
//!
//! ```rust
//! use mocktest::assertions::assert_equal;
//! use mocktest::Value;
//!
//! let err = assert_equal(&Value::from(vec![1, 2, 3]), &Value::from(vec![1])).unwrap_err();
//! assert_eq!(
//!     err.to_string(),
//!     "Assertion failed: [1, 2, 3] != [1]\nlists differ at index 1:\n\t2 != (no more values)"
//! );
//! ```

mod diff;
mod raises;

pub use diff::{assert_equal, describe_difference};
pub use raises::{assert_raises, Raises};
