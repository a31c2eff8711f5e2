//! The dynamic mock object.
//!
//! This module provides the recording stand-in used in place of real
//! collaborators:
//!
//! - [`Mock`] - Records calls, auto-creates children, optionally proxies
//! - [`Invocation`] - One recorded call and where it came from
//! - [`Delegate`] - A real object that non-intercepted calls are forwarded to
//! - [`Introspect`] - A template whose member names can become children
//!
//! # Recording calls
//!
//! ```rust
//! use mocktest::{args, call, Mock};
//!
//! let mock = Mock::named("logger");
//!
//! mock.call(args!("started")).unwrap();
//! call!(mock, "stopped"; code = 0).unwrap();
//!
//! let calls = mock.invocations();
//! assert_eq!(calls.len(), 2);
//! assert_eq!(calls[1].args().to_string(), "'stopped', code=0");
//! assert!(calls[1].site().expression().unwrap().starts_with("mock("));
//! ```

mod delegate;
mod invocation;
mod object;

pub use delegate::{Delegate, Introspect};
pub use invocation::{CallSite, Invocation};
pub use object::{Action, Mock, Predicate, DEFAULT_NAME};

/// Call a mock, recording the call expression text for diagnostics.
///
/// Arguments follow the [`args!`](crate::args) syntax.
///
/// ```rust
/// use mocktest::{call, Mock, Value};
///
/// let m = Mock::new();
/// m.set_return_value(3);
/// assert_eq!(call!(m, 1, 2).unwrap(), Value::from(3));
/// assert_eq!(m.invocations()[0].site().expression(), Some("m(1, 2)"));
/// ```
#[macro_export]
macro_rules! call {
    ($mock:expr $(, $($args:tt)*)?) => {
        $mock.call_at(
            $crate::args!($($($args)*)?),
            $crate::CallSite::new(file!(), line!()).with_expression(concat!(
                stringify!($mock),
                "(",
                stringify!($($($args)*)?),
                ")"
            )),
        )
    };
}
