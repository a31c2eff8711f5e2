//! Error definitions
//!
//! This module provides the error type shared by mocks, matchers and the
//! expectation registry.

use std::sync::Arc;

use thiserror::Error;

/// An error raised by user code (an action or a `raising` mock).
pub type RaisedError = Arc<dyn std::error::Error + Send + Sync>;

/// Main error type for mocktest
#[derive(Error, Debug)]
pub enum Error {
    /// The mock DSL was misused (double interception predicate, wrong
    /// underlying type, use before setup).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A frozen mock was asked for an attribute it does not have.
    #[error("Mock \"{mock}\" has no attribute '{attribute}'")]
    UnknownAttribute {
        /// Name of the mock.
        mock: String,
        /// The attribute that was requested.
        attribute: String,
    },

    /// A matcher's constraint failed; carries the full diagnostic text.
    #[error("{0}")]
    ExpectationNotMet(String),

    /// Every expectation that failed during teardown.
    #[error("{}", render_unmet(.0))]
    Unmet(Vec<Error>),

    /// Setup/teardown called out of order.
    #[error("Lifecycle error: {0}")]
    Lifecycle(String),

    /// Assertion failed
    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    /// An error produced by a mock action, passed through untouched.
    #[error(transparent)]
    Raised(RaisedError),
}

impl Error {
    /// Create a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a lifecycle error.
    #[must_use]
    pub fn lifecycle(message: impl Into<String>) -> Self {
        Self::Lifecycle(message.into())
    }

    /// Wrap an arbitrary error so it can be raised from a mock.
    #[must_use]
    pub fn raised<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Raised(Arc::new(error))
    }

    /// The individual failures of an aggregated teardown error.
    ///
    /// Any other error is reported as a single failure.
    #[must_use]
    pub fn failures(&self) -> &[Error] {
        match self {
            Self::Unmet(failures) => failures,
            other => std::slice::from_ref(other),
        }
    }

    /// The user error carried by [`Error::Raised`], for downcasting.
    #[must_use]
    pub fn raised_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Raised(error) => Some(error.as_ref()),
            _ => None,
        }
    }
}

fn render_unmet(failures: &[Error]) -> String {
    let mut out = format!("{} expectation(s) not met:", failures.len());
    for failure in failures {
        out.push_str("\n\n");
        out.push_str(&failure.to_string());
    }
    out
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
