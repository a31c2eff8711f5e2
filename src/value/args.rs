//! Call arguments.

use std::collections::BTreeMap;
use std::fmt;

use super::Value;

/// The arguments of one call: ordered positional values plus keyword values.
///
/// Keyword keys are unique and compared independently of the order they were
/// given in.
///
/// # Example
///
/// ```rust
/// use mocktest::{args, Args};
///
/// let a = args!("foo"; bar = 1);
/// let b = Args::new().arg("foo").kwarg("bar", 1);
///
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "'foo', bar=1");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Args {
    positional: Vec<Value>,
    keyword: BTreeMap<String, Value>,
}

impl Args {
    /// Empty argument list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument.
    #[must_use]
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Set a keyword argument, replacing any earlier value for `key`.
    #[must_use]
    pub fn kwarg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keyword.insert(key.into(), value.into());
        self
    }

    /// Positional arguments in call order.
    #[must_use]
    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    /// Keyword arguments.
    #[must_use]
    pub fn keyword(&self) -> &BTreeMap<String, Value> {
        &self.keyword
    }

    /// The positional argument at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }

    /// The keyword argument named `key`.
    #[must_use]
    pub fn kw(&self, key: &str) -> Option<&Value> {
        self.keyword.get(key)
    }

    /// Total number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positional.len() + self.keyword.len()
    }

    /// Whether there are no arguments at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keyword.is_empty()
    }

    /// The argument list as it would appear between call parentheses.
    ///
    /// Unlike `Display`, an empty list renders as an empty string.
    #[must_use]
    pub fn call_list(&self) -> String {
        let mut parts: Vec<String> = self.positional.iter().map(ToString::to_string).collect();
        parts.extend(self.keyword.iter().map(|(k, v)| format!("{k}={v}")));
        parts.join(", ")
    }
}

impl fmt::Display for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("No arguments")
        } else {
            f.write_str(&self.call_list())
        }
    }
}

impl<T: Into<Value>> FromIterator<T> for Args {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            positional: iter.into_iter().map(Into::into).collect(),
            keyword: BTreeMap::new(),
        }
    }
}

/// Build an [`Args`] list.
///
/// Positional arguments come first; keyword arguments follow a `;`.
///
/// ```rust
/// use mocktest::args;
///
/// let positional = args!(1, 2, 3);
/// let keyword = args!(; foo = "bar");
/// let mixed = args!(1; foo = 2);
///
/// assert_eq!(positional.to_string(), "1, 2, 3");
/// assert_eq!(keyword.to_string(), "foo='bar'");
/// assert_eq!(mixed.to_string(), "1, foo=2");
/// assert_eq!(mocktest::args!().to_string(), "No arguments");
/// ```
#[macro_export]
macro_rules! args {
    () => {
        $crate::Args::new()
    };
    ($($arg:expr),* ; $($key:ident = $value:expr),+ $(,)?) => {
        $crate::Args::new()
            $(.arg($arg))*
            $(.kwarg(stringify!($key), $value))+
    };
    ($($arg:expr),+ $(,)?) => {
        $crate::Args::new()$(.arg($arg))+
    };
}
