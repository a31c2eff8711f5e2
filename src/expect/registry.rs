//! Test-scoped collection of deferred expectations.

use std::fmt::Debug;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::mock::{Delegate, Mock};
use crate::value::Value;
use crate::wrapper::MockWrapper;

use super::Matcher;

#[derive(Default)]
enum RegistryState {
    #[default]
    Uninitialized,
    Active(Vec<Matcher>),
}

/// The expectation registry for one test.
///
/// A registry is created [uninitialized](Registry::is_active), made active by
/// [`setup`](Registry::setup) before the test body runs, and verified and
/// cleared by [`teardown`](Registry::teardown) afterwards. Mock wrappers can
/// only be created while it is active, and every expectation they register
/// ends up here.
///
/// `Registry` is a cheap handle; clones share the same state.
///
/// # Example
///
/// ```rust
/// use mocktest::{args, Registry};
///
/// let registry = Registry::new();
/// registry.setup().unwrap();
///
/// let mailer = registry.mock_wrapper().unwrap().named("mailer");
/// mailer.expects("send").unwrap().once();
///
/// mailer.mock().invoke("send", args!("hi")).unwrap();
///
/// assert!(registry.teardown().is_ok());
/// assert!(!registry.is_active());
/// ```
#[derive(Clone, Default)]
pub struct Registry {
    inner: Arc<Mutex<RegistryState>>,
}

impl Registry {
    /// Creates a new, uninitialized registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start collecting expectations for a test.
    pub fn setup(&self) -> Result<()> {
        let mut state = self.inner.lock();
        if let RegistryState::Active(_) = *state {
            return Err(Error::lifecycle(
                "Registry::setup has been called twice in a row",
            ));
        }
        *state = RegistryState::Active(Vec::new());
        tracing::debug!("expectation registry set up");
        Ok(())
    }

    /// Verify every registered expectation and return to uninitialized.
    ///
    /// The registry is cleared before any expectation is evaluated, so it
    /// ends up uninitialized whatever happens during verification. All unmet
    /// expectations are reported together in [`Error::Unmet`], one
    /// [`Error::ExpectationNotMet`] each.
    pub fn teardown(&self) -> Result<()> {
        let matchers = match std::mem::take(&mut *self.inner.lock()) {
            RegistryState::Uninitialized => {
                return Err(Error::lifecycle(
                    "Registry::teardown has been called twice in a row",
                ));
            }
            RegistryState::Active(matchers) => matchers,
        };

        let failures: Vec<Error> = matchers
            .iter()
            .filter_map(|matcher| {
                let failure = matcher.check().err()?;
                tracing::debug!(mock = %matcher.mock().name(), "expectation not met");
                Some(failure)
            })
            .collect();
        tracing::debug!(
            expectations = matchers.len(),
            unmet = failures.len(),
            "expectation registry torn down"
        );

        if failures.is_empty() {
            Ok(())
        } else {
            Err(Error::Unmet(failures))
        }
    }

    /// Whether [`setup`](Registry::setup) has been called without a matching
    /// [`teardown`](Registry::teardown).
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(*self.inner.lock(), RegistryState::Active(_))
    }

    /// Expectations registered so far (empty when uninitialized).
    #[must_use]
    pub fn pending(&self) -> Vec<Matcher> {
        match &*self.inner.lock() {
            RegistryState::Active(matchers) => matchers.clone(),
            RegistryState::Uninitialized => Vec::new(),
        }
    }

    /// Add a matcher to be verified at teardown, returning it for chaining.
    pub fn register(&self, matcher: Matcher) -> Result<Matcher> {
        match &mut *self.inner.lock() {
            RegistryState::Active(matchers) => {
                tracing::trace!(mock = %matcher.mock().name(), "registered expectation");
                matchers.push(matcher.clone());
                Ok(matcher)
            }
            RegistryState::Uninitialized => Err(Error::configuration(
                "Registry::setup has not been called; expectations can only be registered during a test",
            )),
        }
    }

    /// Register an expectation directly on a mock.
    pub fn expect(&self, mock: &Mock) -> Result<Matcher> {
        self.register(Matcher::new(mock))
    }

    /// A wrapper around a fresh mock.
    pub fn mock_wrapper(&self) -> Result<MockWrapper> {
        self.wrap(&Mock::new())
    }

    /// A wrapper around an existing mock.
    pub fn wrap(&self, mock: &Mock) -> Result<MockWrapper> {
        self.ensure_active()?;
        Ok(MockWrapper::new(mock.clone(), self.clone()))
    }

    /// A wrapper around a value that must hold a mock.
    pub fn wrap_value(&self, value: Value) -> Result<MockWrapper> {
        match value {
            Value::Mock(mock) => self.wrap(&mock),
            other => Err(Error::configuration(format!(
                "expected a mock, got a {}",
                other.type_name()
            ))),
        }
    }

    /// A wrapper around a fresh mock that forwards non-intercepted calls to
    /// `delegate`.
    pub fn proxy(&self, delegate: impl Delegate + 'static) -> Result<MockWrapper> {
        self.wrap(&Mock::proxying(delegate))
    }

    fn ensure_active(&self) -> Result<()> {
        if self.is_active() {
            Ok(())
        } else {
            Err(Error::configuration(
                "Registry::setup has not been called. Set up the registry (or use #[mocktest::test]) before creating mock wrappers",
            ))
        }
    }
}

impl Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &*self.inner.lock() {
            RegistryState::Uninitialized => f.write_str("Registry(uninitialized)"),
            RegistryState::Active(matchers) => f
                .debug_struct("Registry")
                .field("pending", &matchers.len())
                .finish(),
        }
    }
}
