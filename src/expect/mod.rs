//! Deferred expectations.
//!
//! - [`Matcher`] - A count/argument expectation over one mock's calls
//! - [`Times`] - The count constraint of a matcher
//! - [`Registry`] - Collects matchers during a test and verifies them at
//!   teardown
//!
//! Matchers created through the registry (or a wrapper's `expects` /
//! `is_expected`) are checked when the test ends; matchers created directly
//! are checked by the caller.
//!
//! ```rust
//! use mocktest::{args, Registry};
//!
//! let registry = Registry::new();
//! registry.setup().unwrap();
//!
//! let wrapper = registry.mock_wrapper().unwrap();
//! wrapper.expects("foo").unwrap().once();
//!
//! let foo = wrapper.mock().child("foo").unwrap();
//! foo.call(args!("a")).unwrap();
//! foo.call(args!()).unwrap();
//!
//! let err = registry.teardown().unwrap_err();
//! let text = err.to_string();
//! assert!(text.contains("Mock \"foo\" did not match expectations:"));
//! assert!(text.contains("expected exactly 1 calls"));
//! assert!(text.contains("received 2 calls"));
//! ```

mod matcher;
mod registry;

pub use matcher::{Matcher, Times};
pub use registry::Registry;
