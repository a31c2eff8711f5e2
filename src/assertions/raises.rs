//! Assertions on failed outcomes.

use std::any::{self, Any};

use regex::Regex;

use crate::error::{Error, Result};

/// What the error of a failed outcome must look like.
///
/// Built with chained calls and checked by [`assert_raises`]. With no
/// constraint, only the error type is checked.
#[derive(Clone, Debug, Default)]
pub struct Raises {
    message: Option<String>,
    matching: Option<String>,
}

impl Raises {
    /// No constraint beyond the error type.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require the error to display exactly as `message`.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Require the displayed error to match the regular expression
    /// `pattern` somewhere.
    #[must_use]
    pub fn matching(mut self, pattern: impl Into<String>) -> Self {
        self.matching = Some(pattern.into());
        self
    }
}

/// Check that `outcome` failed with an error of type `E`.
///
/// `E` is looked for inside [`Error::Raised`] first, so errors raised by
/// `raising` mocks or actions are matched by their own type. Passing
/// [`Error`] itself accepts any error. The displayed error is then checked
/// against the [`Raises`] constraints.
///
/// An invalid `matching` pattern is a [`Error::Configuration`]; every other
/// failure is an [`Error::AssertionFailed`].
///
/// # Example
///
/// ```rust
/// use mocktest::assertions::{assert_raises, Raises};
/// use mocktest::{Error, Mock};
///
/// let mock = Mock::new();
/// mock.freeze();
///
/// let checked = assert_raises::<Error, _>(
///     mock.get("missing"),
///     &Raises::new().matching("no attribute 'missing'$"),
/// );
/// assert!(checked.is_ok());
/// ```
pub fn assert_raises<E, T>(outcome: Result<T>, expected: &Raises) -> Result<()>
where
    E: std::error::Error + 'static,
{
    let type_name = any::type_name::<E>();
    let Err(error) = outcome else {
        return Err(Error::AssertionFailed(format!("{type_name} not raised")));
    };

    let text = match find::<E>(&error) {
        Some(found) => found.to_string(),
        None => {
            return Err(Error::AssertionFailed(format!(
                "expected {type_name}, got: {error}"
            )));
        }
    };

    if let Some(message) = &expected.message {
        if *message != text {
            return Err(Error::AssertionFailed(format!(
                "expected {type_name} with message '{message}', got '{text}'"
            )));
        }
    }

    if let Some(pattern) = &expected.matching {
        let regex = Regex::new(pattern).map_err(|err| {
            Error::configuration(format!("invalid `matching` pattern {pattern:?}: {err}"))
        })?;
        if !regex.is_match(&text) {
            return Err(Error::AssertionFailed(format!(
                "expected {type_name} matching /{pattern}/, got '{text}'"
            )));
        }
    }

    Ok(())
}

fn find<E>(error: &Error) -> Option<&E>
where
    E: std::error::Error + 'static,
{
    if let Some(raised) = error.raised_error() {
        if let Some(found) = raised.downcast_ref::<E>() {
            return Some(found);
        }
    }
    (error as &dyn Any).downcast_ref::<E>()
}

/// Assert that an outcome failed with an error of the given type.
///
/// Optional `message = ..` (exact text) and `matching = ..` (regular
/// expression) constraints follow the outcome.
///
/// # Panics
///
/// Panics if the outcome succeeded or its error does not meet the
/// constraints.
///
/// ```rust
/// use mocktest::{args, assert_raises, Error, Registry};
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("args are (1, 2)")]
/// struct Bad;
///
/// let registry = Registry::new();
/// registry.setup().unwrap();
/// let failing = registry.mock_wrapper().unwrap().raising(Bad);
///
/// assert_raises!(Bad, failing.mock().call(args!(1, 2)), message = "args are (1, 2)");
/// assert_raises!(Error, failing.mock().call(args!()), matching = r"\)$");
/// # registry.teardown().unwrap();
/// ```
#[macro_export]
macro_rules! assert_raises {
    ($ty:ty, $outcome:expr $(, $key:ident = $value:expr)* $(,)?) => {{
        let expected = $crate::assertions::Raises::new() $(.$key($value))*;
        if let ::core::result::Result::Err(err) =
            $crate::assertions::assert_raises::<$ty, _>($outcome, &expected)
        {
            panic!("{}", err);
        }
    }};
}
