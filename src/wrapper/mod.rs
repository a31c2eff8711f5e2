//! Chainable DSL over a mock.
//!
//! A [`MockWrapper`] pairs a [`Mock`] with the [`Registry`] of the running
//! test. Configuration methods mutate the mock and hand the wrapper back, so
//! a double can be described in one expression:
//!
//! ```rust
//! use mocktest::{args, Registry, Value};
//!
//! let registry = Registry::new();
//! registry.setup().unwrap();
//!
//! let store = registry
//!     .mock_wrapper()
//!     .unwrap()
//!     .named("store")
//!     .with_methods_returning([("get", Value::from(7))])
//!     .unwrap();
//!
//! assert_eq!(store.mock().invoke("get", args!("key")).unwrap(), Value::from(7));
//! assert!(store.mock().get("put").is_err()); // frozen
//!
//! registry.teardown().unwrap();
//! ```

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, RaisedError, Result};
use crate::expect::{Matcher, Registry};
use crate::mock::{Introspect, Mock};
use crate::value::{Args, Value};

/// Names of the wrapper's own methods. Attribute access through the wrapper
/// never reaches mock children with these names.
pub const DSL_METHODS: &[&str] = &[
    "mock",
    "returning",
    "named",
    "with_action",
    "raising",
    "with_args",
    "when_args",
    "with_children",
    "with_child_values",
    "with_methods",
    "with_methods_returning",
    "with_spec",
    "frozen",
    "unfrozen",
    "with_special",
    "expects",
    "is_expected",
    "called",
    "child",
    "reset",
];

/// A mock plus the registry its expectations are recorded in.
#[derive(Clone, Debug)]
pub struct MockWrapper {
    mock: Mock,
    registry: Registry,
}

impl MockWrapper {
    pub(crate) fn new(mock: Mock, registry: Registry) -> Self {
        Self { mock, registry }
    }

    /// The wrapped mock, to hand to the code under test.
    #[must_use]
    pub fn mock(&self) -> &Mock {
        &self.mock
    }

    /// The registry this wrapper registers expectations with.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    // --- configuration -------------------------------------------------

    /// Set the value returned by intercepted calls.
    #[must_use]
    pub fn returning(self, value: impl Into<Value>) -> Self {
        self.mock.set_return_value(value);
        self
    }

    /// Set the display name used in diagnostics.
    #[must_use]
    pub fn named(self, name: impl Into<String>) -> Self {
        self.mock.set_name(name);
        self
    }

    /// Run `action` on every intercepted call; its result becomes the
    /// call's result.
    #[must_use]
    pub fn with_action<F>(self, action: F) -> Self
    where
        F: Fn(&Args) -> Result<Value> + Send + Sync + 'static,
    {
        self.mock.set_action(action);
        self
    }

    /// Make every intercepted call fail with `error`.
    ///
    /// The caller receives [`Error::Raised`] holding `error` itself.
    #[must_use]
    pub fn raising<E>(self, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let raised: RaisedError = Arc::new(error);
        self.with_action(move |_| Err(Error::Raised(Arc::clone(&raised))))
    }

    /// Only intercept calls whose arguments equal `args`; forward the rest
    /// to the proxied object.
    pub fn with_args(self, args: Args) -> Result<Self> {
        self.mock.set_should_intercept(move |received| *received == args)?;
        Ok(self)
    }

    /// Only intercept calls for which `predicate` holds; forward the rest to
    /// the proxied object.
    pub fn when_args<F>(self, predicate: F) -> Result<Self>
    where
        F: Fn(&Args) -> bool + Send + Sync + 'static,
    {
        self.mock.set_should_intercept(predicate)?;
        Ok(self)
    }

    /// Create child mocks for `names`, then freeze.
    pub fn with_children<I, S>(self, names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.add_children(names)?;
        Ok(self.frozen())
    }

    /// Set the given attributes, then freeze.
    pub fn with_child_values<I, S, V>(self, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, V)>,
        S: AsRef<str>,
        V: Into<Value>,
    {
        for (name, value) in values {
            self.mock.set(name.as_ref(), value)?;
        }
        Ok(self.frozen())
    }

    /// Create child mocks for the method `names`, then freeze.
    pub fn with_methods<I, S>(self, names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.with_children(names)
    }

    /// Create a child mock per method returning the paired value, then
    /// freeze.
    pub fn with_methods_returning<I, S, V>(self, methods: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, V)>,
        S: AsRef<str>,
        V: Into<Value>,
    {
        for (name, value) in methods {
            let method = Mock::named(name.as_ref());
            method.set_return_value(value);
            self.mock.set(name.as_ref(), method)?;
        }
        Ok(self.frozen())
    }

    /// Create a child for every member of `spec` except `__dunder__` names,
    /// then freeze.
    pub fn with_spec<T>(self, spec: &T) -> Result<Self>
    where
        T: Introspect + ?Sized,
    {
        let members: Vec<String> = spec
            .member_names()
            .into_iter()
            .filter(|name| !(name.starts_with("__") && name.ends_with("__")))
            .collect();
        self.with_children(members)
    }

    /// Stop auto-creating children.
    #[must_use]
    pub fn frozen(self) -> Self {
        self.mock.freeze();
        self
    }

    /// Resume auto-creating children.
    #[must_use]
    pub fn unfrozen(self) -> Self {
        self.mock.unfreeze();
        self
    }

    /// Set an attribute that shadows the mock's configuration attributes.
    #[must_use]
    pub fn with_special(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.mock.set_special(name, value);
        self
    }

    fn add_children<I, S>(&self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.mock.get(name.as_ref())?;
        }
        Ok(())
    }

    // --- expectations --------------------------------------------------

    /// Expect calls on the child `method`, verified at teardown.
    pub fn expects(&self, method: &str) -> Result<Matcher> {
        let child = self.mock.child(method)?;
        self.registry.expect(&child)
    }

    /// Expect calls on the mock itself, verified at teardown.
    pub fn is_expected(&self) -> Result<Matcher> {
        self.registry.expect(&self.mock)
    }

    /// A matcher over the mock's calls that the caller checks.
    #[must_use]
    pub fn called(&self) -> Matcher {
        Matcher::new(&self.mock)
    }

    // --- navigation and attribute pass-through --------------------------

    /// A wrapper around the child mock `name`.
    pub fn child(&self, name: &str) -> Result<MockWrapper> {
        Ok(Self::new(self.mock.child(name)?, self.registry.clone()))
    }

    /// Forget the mock's recorded calls.
    pub fn reset(&self) {
        self.mock.reset();
    }

    /// Read an attribute of the mock.
    pub fn get(&self, name: &str) -> Result<Value> {
        Self::ensure_not_dsl(name)?;
        self.mock.get(name)
    }

    /// Write an attribute of the mock.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        Self::ensure_not_dsl(name)?;
        self.mock.set(name, value)
    }

    /// Remove an attribute of the mock.
    pub fn delete(&self, name: &str) -> Result<()> {
        Self::ensure_not_dsl(name)?;
        self.mock.delete(name)
    }

    fn ensure_not_dsl(name: &str) -> Result<()> {
        if DSL_METHODS.contains(&name) {
            Err(Error::configuration(format!(
                "`{name}` is a MockWrapper method; reach the attribute through `mock()` instead"
            )))
        } else {
            Ok(())
        }
    }
}

impl fmt::Display for MockWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mock wrapper for \"{}\"", self.mock.name())
    }
}
