//! The recording mock object.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::value::{Args, Value};

use super::invocation::{CallLog, CallSite, Invocation};
use super::Delegate;

/// Name given to mocks created without one.
pub const DEFAULT_NAME: &str = "unnamed mock";

/// Callable run on every intercepted call; its result is the call's result.
pub type Action = Arc<dyn Fn(&Args) -> Result<Value> + Send + Sync>;

/// Decides whether a call is recorded (`true`) or forwarded to the proxied
/// object (`false`).
pub type Predicate = Arc<dyn Fn(&Args) -> bool + Send + Sync>;

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

/// A dynamic recording stand-in for a real collaborator.
///
/// Attribute access goes through [`get`](Mock::get), [`set`](Mock::set) and
/// [`delete`](Mock::delete); calls go through [`call`](Mock::call). Reading
/// an attribute that was never set creates a child mock named after it,
/// unless the mock is frozen.
///
/// `Mock` is a cheap handle: clones share the same configuration, children and
/// call log.
///
/// # Example
///
/// ```rust
/// use mocktest::{args, Mock, Value};
///
/// let db = Mock::named("db");
/// db.set_return_value(42);
///
/// assert_eq!(db.call(args!("select")).unwrap(), Value::from(42));
/// assert_eq!(db.call_count(), 1);
///
/// // children spring into existence on first access
/// let query = db.child("query").unwrap();
/// query.call(args!()).unwrap();
/// assert_eq!(query.name(), "query");
/// ```
#[derive(Clone)]
pub struct Mock {
    inner: Arc<MockInner>,
}

struct MockInner {
    id: u64,
    state: Mutex<MockState>,
    log: CallLog,
}

struct MockState {
    name: String,
    // `None` until first needed, then a child mock reused for every call.
    return_value: Option<Value>,
    action: Option<Action>,
    should_intercept: Option<Predicate>,
    proxied: Option<Arc<dyn Delegate>>,
    children: BTreeMap<String, Value>,
    modifiable_children: bool,
    special_attrs: BTreeMap<String, Value>,
}

impl MockState {
    fn return_value(&mut self) -> Value {
        let name = &self.name;
        self.return_value
            .get_or_insert_with(|| Value::Mock(Mock::named(format!("{name}()"))))
            .clone()
    }

    fn unknown(&self, attribute: &str) -> Error {
        Error::UnknownAttribute {
            mock: self.name.clone(),
            attribute: attribute.to_string(),
        }
    }
}

enum Outcome {
    Run(Action),
    Return(Value),
}

impl Default for Mock {
    fn default() -> Self {
        Self::new()
    }
}

impl Mock {
    /// Creates a new mock called [`DEFAULT_NAME`].
    #[must_use]
    pub fn new() -> Self {
        Self::named(DEFAULT_NAME)
    }

    /// Creates a new mock with the given display name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(MockInner {
                id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
                state: Mutex::new(MockState {
                    name: name.into(),
                    return_value: None,
                    action: None,
                    should_intercept: None,
                    proxied: None,
                    children: BTreeMap::new(),
                    modifiable_children: true,
                    special_attrs: BTreeMap::new(),
                }),
                log: CallLog::default(),
            }),
        }
    }

    /// Creates a new mock that forwards non-intercepted calls to `delegate`.
    #[must_use]
    pub fn proxying(delegate: impl Delegate + 'static) -> Self {
        let mock = Self::new();
        mock.set_proxied(delegate);
        mock
    }

    /// Unique identity of this mock (shared by its clones).
    #[must_use]
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Whether `other` is a handle to the same mock.
    #[must_use]
    pub fn ptr_eq(&self, other: &Mock) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// The display name used in diagnostics.
    #[must_use]
    pub fn name(&self) -> String {
        self.inner.state.lock().name.clone()
    }

    /// Rename the mock.
    pub fn set_name(&self, name: impl Into<String>) {
        self.inner.state.lock().name = name.into();
    }

    /// The value returned by intercepted calls when no action is set.
    ///
    /// Defaults to a child mock, created on first use and then reused.
    #[must_use]
    pub fn return_value(&self) -> Value {
        self.inner.state.lock().return_value()
    }

    /// Set the value returned by intercepted calls.
    pub fn set_return_value(&self, value: impl Into<Value>) {
        self.inner.state.lock().return_value = Some(value.into());
    }

    /// Install the action run on every intercepted call.
    pub fn set_action<F>(&self, action: F)
    where
        F: Fn(&Args) -> Result<Value> + Send + Sync + 'static,
    {
        self.inner.state.lock().action = Some(Arc::new(action));
    }

    /// Remove the action, falling back to the return value.
    pub fn clear_action(&self) {
        self.inner.state.lock().action = None;
    }

    /// Install the interception predicate.
    ///
    /// Only one predicate may ever be set on a mock; a second attempt is a
    /// configuration error.
    pub fn set_should_intercept<F>(&self, predicate: F) -> Result<()>
    where
        F: Fn(&Args) -> bool + Send + Sync + 'static,
    {
        let mut state = self.inner.state.lock();
        if state.should_intercept.is_some() {
            return Err(Error::configuration(format!(
                "an interception condition (`with_args` or `when_args`) has already been set on mock \"{}\"",
                state.name
            )));
        }
        state.should_intercept = Some(Arc::new(predicate));
        Ok(())
    }

    /// Whether an interception predicate has been installed.
    #[must_use]
    pub fn has_interception(&self) -> bool {
        self.inner.state.lock().should_intercept.is_some()
    }

    /// Forward non-intercepted calls to `delegate`.
    pub fn set_proxied(&self, delegate: impl Delegate + 'static) {
        self.inner.state.lock().proxied = Some(Arc::new(delegate));
    }

    /// Stop auto-creating children; unknown attributes become errors.
    pub fn freeze(&self) {
        self.inner.state.lock().modifiable_children = false;
    }

    /// Resume auto-creating children.
    pub fn unfreeze(&self) {
        self.inner.state.lock().modifiable_children = true;
    }

    /// Whether unknown attributes are rejected.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        !self.inner.state.lock().modifiable_children
    }

    /// Set an attribute that shadows the mock's configuration attributes
    /// (`name`, `return_value`).
    pub fn set_special(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.inner
            .state
            .lock()
            .special_attrs
            .insert(name.into(), value.into());
    }

    /// Read an attribute.
    ///
    /// Lookup order: special attributes, then the configuration attributes
    /// `name` and `return_value`, then children. An unknown name creates a
    /// child mock, or fails with [`Error::UnknownAttribute`] when frozen.
    pub fn get(&self, name: &str) -> Result<Value> {
        let mut state = self.inner.state.lock();
        if let Some(value) = state.special_attrs.get(name) {
            return Ok(value.clone());
        }
        match name {
            "name" => return Ok(Value::Str(state.name.clone())),
            "return_value" => return Ok(state.return_value()),
            _ => {}
        }
        if let Some(value) = state.children.get(name) {
            return Ok(value.clone());
        }
        if !state.modifiable_children {
            return Err(state.unknown(name));
        }

        tracing::trace!(mock = %state.name, child = name, "creating child mock");
        let child = Value::Mock(Mock::named(name));
        state.children.insert(name.to_string(), child.clone());
        Ok(child)
    }

    /// Write an attribute.
    ///
    /// A frozen mock accepts writes to existing attributes only.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        // Rendering may lock other mocks, including this one.
        let rendered_name = (name == "name").then(|| match &value {
            Value::Str(s) => s.clone(),
            other => other.to_string(),
        });
        let mut state = self.inner.state.lock();
        if let Some(slot) = state.special_attrs.get_mut(name) {
            *slot = value;
            return Ok(());
        }
        match (name, rendered_name) {
            ("name", Some(rendered)) => state.name = rendered,
            ("return_value", _) => state.return_value = Some(value),
            _ => {
                if !state.modifiable_children && !state.children.contains_key(name) {
                    return Err(state.unknown(name));
                }
                state.children.insert(name.to_string(), value);
            }
        }
        Ok(())
    }

    /// Remove an attribute.
    ///
    /// Configuration attributes are reset to their defaults.
    pub fn delete(&self, name: &str) -> Result<()> {
        let mut state = self.inner.state.lock();
        if state.special_attrs.remove(name).is_some() {
            return Ok(());
        }
        match name {
            "name" => state.name = DEFAULT_NAME.to_string(),
            "return_value" => state.return_value = None,
            _ => {
                if state.children.remove(name).is_none() {
                    return Err(state.unknown(name));
                }
            }
        }
        Ok(())
    }

    /// Read an attribute that must hold a mock.
    pub fn child(&self, name: &str) -> Result<Mock> {
        match self.get(name)? {
            Value::Mock(mock) => Ok(mock),
            other => Err(Error::configuration(format!(
                "attribute '{name}' of mock \"{}\" is a {}, not a mock",
                self.name(),
                other.type_name()
            ))),
        }
    }

    /// Names of all children and special attributes.
    #[must_use]
    pub fn attribute_names(&self) -> Vec<String> {
        let state = self.inner.state.lock();
        let mut names: Vec<String> = state
            .children
            .keys()
            .chain(state.special_attrs.keys())
            .cloned()
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Call the mock.
    ///
    /// If the interception predicate rejects `args`, the call is forwarded
    /// untouched to the proxied object and nothing is recorded. Otherwise the
    /// call is recorded and the action's result (or the return value) is
    /// returned. Errors from the action or the proxied object are passed
    /// through as-is.
    #[track_caller]
    pub fn call(&self, args: Args) -> Result<Value> {
        self.call_at(args, CallSite::caller())
    }

    /// Call the mock, attributing the call to `site`.
    pub fn call_at(&self, args: Args, site: CallSite) -> Result<Value> {
        let (name, predicate, proxied) = {
            let state = self.inner.state.lock();
            (
                state.name.clone(),
                state.should_intercept.clone(),
                state.proxied.clone(),
            )
        };

        let intercept = predicate.map_or(true, |p| p(&args));
        if !intercept {
            tracing::trace!(mock = %name, %args, "forwarding call to proxied object");
            return match proxied {
                Some(delegate) => Delegate::call(&*delegate, &args),
                None => Err(Error::configuration(format!(
                    "mock \"{name}\" did not intercept a call with {args} and has no proxied object to forward it to"
                ))),
            };
        }

        tracing::trace!(mock = %name, %args, file = site.file(), line = site.line(), "recording call");
        self.inner.log.track(args.clone(), site);

        let outcome = {
            let mut state = self.inner.state.lock();
            match &state.action {
                Some(action) => Outcome::Run(Arc::clone(action)),
                None => Outcome::Return(state.return_value()),
            }
        };
        match outcome {
            Outcome::Run(action) => action(&args),
            Outcome::Return(value) => Ok(value),
        }
    }

    /// Call the child mock `method`, as in `mock.method(args)`.
    #[track_caller]
    pub fn invoke(&self, method: &str, args: Args) -> Result<Value> {
        let site = CallSite::caller();
        self.child(method)?.call_at(args, site)
    }

    /// Every recorded call, oldest first.
    #[must_use]
    pub fn invocations(&self) -> Vec<Invocation> {
        self.inner.log.calls()
    }

    /// Number of recorded calls.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.inner.log.len()
    }

    /// Forget recorded calls. Configuration and children are kept.
    pub fn reset(&self) {
        self.inner.log.reset();
    }
}

impl Debug for Mock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("Mock")
            .field("name", &state.name)
            .field("children", &state.children.keys().collect::<Vec<_>>())
            .field("frozen", &!state.modifiable_children)
            .field("calls", &self.inner.log)
            .finish_non_exhaustive()
    }
}
