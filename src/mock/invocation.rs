//! Recorded calls.
//!
//! Every intercepted call on a [`Mock`](super::Mock) is appended to its
//! [`CallLog`] as an [`Invocation`].

use std::fmt::Debug;
use std::panic::Location;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::value::Args;

// Shared across all mocks so invocations on different mocks can be ordered.
static NEXT_ORDER: AtomicU64 = AtomicU64::new(0);

/// Where a call was made from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    file: &'static str,
    line: u32,
    expression: Option<String>,
}

impl CallSite {
    /// A call site at the given source position.
    #[must_use]
    pub fn new(file: &'static str, line: u32) -> Self {
        Self {
            file,
            line,
            expression: None,
        }
    }

    /// The location of the caller, via `#[track_caller]`.
    #[track_caller]
    #[must_use]
    pub fn caller() -> Self {
        let location = Location::caller();
        Self::new(location.file(), location.line())
    }

    /// Attach the literal source text of the call expression.
    #[must_use]
    pub fn with_expression(mut self, expression: impl Into<String>) -> Self {
        self.expression = Some(expression.into());
        self
    }

    /// Full source path as reported by the compiler.
    #[must_use]
    pub fn file(&self) -> &'static str {
        self.file
    }

    /// Just the final component of [`CallSite::file`].
    #[must_use]
    pub fn file_name(&self) -> &str {
        Path::new(self.file)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(self.file)
    }

    /// Source line of the call.
    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// The call expression text, when captured by [`call!`](crate::call).
    #[must_use]
    pub fn expression(&self) -> Option<&str> {
        self.expression.as_deref()
    }
}

/// A record of a single intercepted call.
#[derive(Debug, Clone)]
pub struct Invocation {
    args: Args,
    site: CallSite,
    order: u64,
}

impl Invocation {
    /// The arguments passed to the call.
    #[must_use]
    pub fn args(&self) -> &Args {
        &self.args
    }

    /// Where the call was made.
    #[must_use]
    pub fn site(&self) -> &CallSite {
        &self.site
    }

    /// Process-wide order of this call relative to every other recorded call.
    #[must_use]
    pub fn order(&self) -> u64 {
        self.order
    }
}

/// Append-only log of the calls a mock intercepted.
#[derive(Default)]
pub(crate) struct CallLog {
    calls: Mutex<Vec<Invocation>>,
}

impl CallLog {
    /// Record a call with the given arguments.
    pub fn track(&self, args: Args, site: CallSite) {
        let order = NEXT_ORDER.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().push(Invocation { args, site, order });
    }

    /// Get all tracked calls.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().clone()
    }

    /// Get the number of tracked calls.
    pub fn len(&self) -> usize {
        self.calls.lock().len()
    }

    /// Forget every tracked call.
    pub fn reset(&self) {
        self.calls.lock().clear();
    }
}

impl Debug for CallLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallLog")
            .field("call_count", &self.len())
            .finish()
    }
}
