//! Seams between a mock and real objects.

use crate::error::Result;
use crate::value::{Args, Value};

use super::{CallSite, Mock};

/// A real object that a mock forwards non-intercepted calls to.
///
/// Any `Fn(&Args) -> Result<Value>` closure is a delegate, and so is another
/// [`Mock`].
///
/// # Example
///
/// ```rust
/// use mocktest::{args, Args, Delegate, Result, Value};
///
/// let real = |args: &Args| -> Result<Value> { Ok(Value::from(args.positional().len())) };
/// assert_eq!(Delegate::call(&real, &args!(1, 2)).unwrap(), Value::from(2));
/// ```
pub trait Delegate: Send + Sync {
    /// Perform the real call.
    fn call(&self, args: &Args) -> Result<Value>;
}

impl<F> Delegate for F
where
    F: Fn(&Args) -> Result<Value> + Send + Sync,
{
    fn call(&self, args: &Args) -> Result<Value> {
        self(args)
    }
}

impl Delegate for Mock {
    #[track_caller]
    fn call(&self, args: &Args) -> Result<Value> {
        self.call_at(args.clone(), CallSite::caller())
    }
}

/// A template whose public member names can be enumerated, for
/// [`MockWrapper::with_spec`](crate::MockWrapper::with_spec).
pub trait Introspect {
    /// Names of the template's members.
    fn member_names(&self) -> Vec<String>;
}

impl<S: AsRef<str>> Introspect for [S] {
    fn member_names(&self) -> Vec<String> {
        self.iter().map(|name| name.as_ref().to_string()).collect()
    }
}

impl<S: AsRef<str>, const N: usize> Introspect for [S; N] {
    fn member_names(&self) -> Vec<String> {
        self.as_slice().member_names()
    }
}

impl<S: AsRef<str>> Introspect for Vec<S> {
    fn member_names(&self) -> Vec<String> {
        self.as_slice().member_names()
    }
}

impl Introspect for Mock {
    fn member_names(&self) -> Vec<String> {
        self.attribute_names()
    }
}
