//! # mocktest
//!
//! > Dynamic mocks with deferred expectations for Rust tests
//!
//! **mocktest** lets a test substitute any collaborator with a recording
//! stand-in, configure how it behaves, and state afterwards which calls
//! should have happened. Expectations are collected while the test runs and
//! verified together when it ends, and every mismatch is reported with the
//! calls that were actually made and where they came from.
//!
//! ## Quick Start
//!
//! ```rust
//! use mocktest::prelude::*;
//!
//! let registry = Registry::new();
//! registry.setup().unwrap();
//!
//! let cache = registry.mock_wrapper().unwrap().named("cache");
//! cache.expects("store").unwrap().with_args(args!("k", 1)).once();
//!
//! // the code under test only sees the mock
//! let mock = cache.mock();
//! mock.invoke("store", args!("k", 1)).unwrap();
//!
//! registry.teardown().unwrap();
//! ```
//!
//! ## Features
//!
//! - **Mock** - Records calls, auto-creates children, proxies to real objects
//! - **Matcher** - Exact/at-least/never expectations with argument filters
//! - **Registry** - Deferred, aggregated verification at teardown
//! - **MockWrapper** - Chainable configuration DSL
//! - **assert_equal!** - Equality assertions that explain list and map diffs
//! - **assert_raises!** - Error type, message and pattern assertions
//! - **`#[mocktest::test]`** - Setup/teardown around a test (`macros` feature)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod assertions;
pub mod error;
pub mod expect;
pub mod mock;
pub mod value;
pub mod wrapper;

/// Prelude for convenient imports
///
/// ```rust
/// use mocktest::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::expect::{Matcher, Registry, Times};
    pub use crate::mock::{CallSite, Delegate, Introspect, Invocation, Mock};
    pub use crate::value::{Args, Value};
    pub use crate::wrapper::MockWrapper;
    pub use crate::{args, assert_equal, assert_raises, call};
}

// Re-exports
pub use error::{Error, Result};
pub use expect::{Matcher, Registry, Times};
pub use mock::{CallSite, Delegate, Introspect, Invocation, Mock};
pub use value::{Args, Value};
pub use wrapper::MockWrapper;

// Re-export the test macro when macros feature is enabled
#[cfg(feature = "macros")]
pub use mocktest_macros::test;
