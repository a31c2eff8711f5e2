// Allow must_use_candidate: registered matchers are routinely built and dropped,
// the registry keeps its own handle
#![allow(clippy::must_use_candidate)]

//! Expectations over a mock's call history.
//!
//! A [`Matcher`] is bound to one mock and describes how many calls it should
//! have seen, optionally restricted to calls with particular arguments. It is
//! evaluated lazily: every query re-reads the mock's current call log.
//!
//! # Example
//!
//! ```rust
//! use mocktest::{args, Matcher, Mock};
//!
//! let mock = Mock::named("sender");
//! mock.call(args!("a")).unwrap();
//! mock.call(args!("b")).unwrap();
//! mock.call(args!("a")).unwrap();
//!
//! let sent_a = Matcher::new(&mock).with_args(args!("a")).twice();
//! assert!(sent_a.is_satisfied());
//! assert_eq!(sent_a.get_calls(), vec![args!("a"), args!("a")]);
//!
//! let never_c = Matcher::new(&mock).with_args(args!("c")).never();
//! assert!(never_c.is_satisfied());
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::mock::{Invocation, Mock};
use crate::value::Args;

/// Width the argument column is padded to in diagnostics.
const ARGS_COLUMN: usize = 24;

/// How many matching calls an expectation requires.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Times {
    /// No explicit count; satisfied by at least one call.
    #[default]
    Any,
    /// Exactly this many calls.
    Exactly(usize),
    /// This many calls or more.
    AtLeast(usize),
}

impl Times {
    /// Check a call count against this constraint.
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Self::Any => count > 0,
            Self::Exactly(n) => count == n,
            Self::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Times {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("at least 1 calls"),
            Self::Exactly(n) => write!(f, "exactly {n} calls"),
            Self::AtLeast(n) => write!(f, "at least {n} calls"),
        }
    }
}

#[derive(Debug, Default)]
struct Constraint {
    times: Times,
    args: Option<Args>,
}

/// An expectation over the calls received by one mock.
///
/// Builder methods take and return `self`; clones share their constraint, so
/// a matcher handed back by the registry can still be refined after it was
/// registered.
#[derive(Clone)]
pub struct Matcher {
    mock: Mock,
    constraint: Arc<Mutex<Constraint>>,
}

impl Matcher {
    /// An unconstrained matcher over every call `mock` receives.
    pub fn new(mock: &Mock) -> Self {
        Self {
            mock: mock.clone(),
            constraint: Arc::new(Mutex::new(Constraint::default())),
        }
    }

    /// The mock this matcher observes.
    pub fn mock(&self) -> &Mock {
        &self.mock
    }

    /// The current count constraint.
    pub fn times_constraint(&self) -> Times {
        self.constraint.lock().times
    }

    /// The argument filter, if any.
    pub fn args_filter(&self) -> Option<Args> {
        self.constraint.lock().args.clone()
    }

    /// Require exactly `n` matching calls.
    pub fn exactly(self, n: usize) -> Self {
        self.constraint.lock().times = Times::Exactly(n);
        self
    }

    /// Alias for [`exactly`](Matcher::exactly).
    pub fn times(self, n: usize) -> Self {
        self.exactly(n)
    }

    /// Require exactly one matching call.
    pub fn once(self) -> Self {
        self.exactly(1)
    }

    /// Require exactly two matching calls.
    pub fn twice(self) -> Self {
        self.exactly(2)
    }

    /// Require exactly three matching calls.
    pub fn thrice(self) -> Self {
        self.exactly(3)
    }

    /// Require that no matching call happened.
    pub fn never(self) -> Self {
        self.exactly(0)
    }

    /// Require `n` or more matching calls.
    pub fn at_least(self, n: usize) -> Self {
        self.constraint.lock().times = Times::AtLeast(n);
        self
    }

    /// Only count calls whose arguments equal `args`.
    pub fn with_args(self, args: Args) -> Self {
        self.constraint.lock().args = Some(args);
        self
    }

    /// Matching calls, oldest first, re-derived from the mock on every call.
    pub fn invocations(&self) -> Vec<Invocation> {
        let filter = self.args_filter();
        self.mock
            .invocations()
            .into_iter()
            .filter(|inv| filter.as_ref().map_or(true, |args| inv.args() == args))
            .collect()
    }

    /// Arguments of the matching calls, oldest first.
    pub fn get_calls(&self) -> Vec<Args> {
        self.invocations()
            .into_iter()
            .map(|inv| inv.args().clone())
            .collect()
    }

    /// Number of matching calls.
    pub fn call_count(&self) -> usize {
        self.invocations().len()
    }

    /// Whether the current call history satisfies the constraint.
    pub fn is_satisfied(&self) -> bool {
        self.times_constraint().accepts(self.call_count())
    }

    /// Like [`is_satisfied`](Matcher::is_satisfied), but a failure carries
    /// the rendered diagnostic.
    pub fn check(&self) -> Result<()> {
        if self.is_satisfied() {
            Ok(())
        } else {
            Err(Error::ExpectationNotMet(self.to_string()))
        }
    }
}

impl fmt::Display for Matcher {
    /// Renders the diagnostic, whether or not the matcher is satisfied:
    ///
    /// ```text
    /// Mock "ze_mock" did not match expectations:
    ///  expected exactly 1 calls
    ///  received 2 calls with arguments:
    ///   1:   1, 2, 3                  // tests.rs:12  :: m(1, 2, 3)
    ///   2:   No arguments             // tests.rs:13  :: m()
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.mock.name();
        let (times, filter) = {
            let constraint = self.constraint.lock();
            (constraint.times, constraint.args.clone())
        };

        writeln!(f, "Mock \"{name}\" did not match expectations:")?;
        write!(f, " expected {times}")?;
        if let Some(args) = &filter {
            write!(f, " with arguments equal to: {args}")?;
        }
        writeln!(f)?;

        let calls = self.invocations();
        if calls.is_empty() {
            return f.write_str(" received 0 calls");
        }
        write!(f, " received {} calls with arguments:", calls.len())?;
        for (i, inv) in calls.iter().enumerate() {
            let site = inv.site();
            let expression = site
                .expression()
                .map_or_else(|| format!("{name}({})", inv.args().call_list()), str::to_string);
            write!(
                f,
                "\n  {}:   {:<width$} // {}:{:<3} :: {}",
                i + 1,
                inv.args().to_string(),
                site.file_name(),
                site.line(),
                expression,
                width = ARGS_COLUMN,
            )?;
        }
        Ok(())
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let constraint = self.constraint.lock();
        f.debug_struct("Matcher")
            .field("mock", &self.mock.name())
            .field("times", &constraint.times)
            .field("args", &constraint.args)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{args, call};

    #[test]
    fn test_times_accepts() {
        assert!(!Times::Any.accepts(0));
        assert!(Times::Any.accepts(3));
        assert!(Times::Exactly(0).accepts(0));
        assert!(!Times::Exactly(1).accepts(2));
        assert!(Times::AtLeast(2).accepts(2));
        assert!(!Times::AtLeast(2).accepts(1));
    }

    #[test]
    fn test_counts() {
        let mock = Mock::new();
        assert!(Matcher::new(&mock).never().is_satisfied());
        assert!(!Matcher::new(&mock).is_satisfied());

        mock.call(args!()).unwrap();
        assert!(Matcher::new(&mock).once().is_satisfied());
        assert!(!Matcher::new(&mock).twice().is_satisfied());
        assert!(Matcher::new(&mock).at_least(1).is_satisfied());

        mock.call(args!()).unwrap();
        mock.call(args!()).unwrap();
        assert!(Matcher::new(&mock).thrice().is_satisfied());
        assert!(Matcher::new(&mock).times(3).is_satisfied());
    }

    #[test]
    fn test_argument_filter() {
        let mock = Mock::new();
        mock.call(args!(1)).unwrap();
        mock.call(args!(2)).unwrap();
        mock.call(args!(1; flag = true)).unwrap();
        mock.call(args!(1)).unwrap();

        let ones = Matcher::new(&mock).with_args(args!(1));
        assert_eq!(ones.get_calls(), vec![args!(1), args!(1)]);
        assert!(ones.clone().twice().is_satisfied());

        let flagged = Matcher::new(&mock).with_args(args!(1; flag = true));
        assert_eq!(flagged.call_count(), 1);
    }

    #[test]
    fn test_calls_are_rederived() {
        let mock = Mock::new();
        let matcher = Matcher::new(&mock).once();
        assert!(!matcher.is_satisfied());

        mock.call(args!()).unwrap();
        assert!(matcher.is_satisfied());
        assert_eq!(matcher.get_calls(), matcher.get_calls());

        mock.reset();
        assert!(matcher.get_calls().is_empty());
    }

    #[test]
    fn test_clones_share_constraint() {
        let mock = Mock::new();
        let registered = Matcher::new(&mock);
        let _ = registered.clone().never();
        assert_eq!(registered.times_constraint(), Times::Exactly(0));
    }

    #[test]
    fn test_format_without_calls() {
        let matcher = Matcher::new(&Mock::new())
            .with_args(args!("foo"; bar = 1))
            .twice();
        assert_eq!(
            matcher.to_string(),
            "Mock \"unnamed mock\" did not match expectations:\n \
             expected exactly 2 calls with arguments equal to: 'foo', bar=1\n \
             received 0 calls"
        );
    }

    #[test]
    fn test_format_with_calls() {
        let m = Mock::named("ze_mock");
        let line = line!() + 1;
        call!(m, 1, 2, 3).unwrap();
        m.call(args!()).unwrap();

        let text = Matcher::new(&m).once().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Mock \"ze_mock\" did not match expectations:");
        assert_eq!(lines[1], " expected exactly 1 calls");
        assert_eq!(lines[2], " received 2 calls with arguments:");
        assert_eq!(
            lines[3],
            format!("  1:   1, 2, 3                  // matcher.rs:{line:<3} :: m(1, 2, 3)")
        );
        assert!(lines[4].starts_with("  2:   No arguments             // matcher.rs:"));
        assert!(lines[4].ends_with(":: ze_mock()"));
    }

    #[test]
    fn test_check_carries_diagnostic() {
        let mock = Mock::named("x");
        let err = Matcher::new(&mock).once().check().unwrap_err();
        match err {
            Error::ExpectationNotMet(text) => {
                assert!(text.contains("Mock \"x\" did not match expectations:"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
