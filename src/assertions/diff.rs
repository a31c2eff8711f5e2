//! Structural difference descriptions.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::value::Value;

/// Explain why `expected` and `actual` differ.
///
/// Lists and tuples of different lengths report the index where the shorter
/// side runs out, with `(no more values)` standing in for it. Equal-length
/// sequences report their first differing index. Maps report the
/// keys only one side has or, when the key sets agree, the differing entries
/// of each side. Returns `None` when the values are equal or are not both
/// sequences or both maps.
///
/// # Example
///
/// ```rust
/// use mocktest::assertions::describe_difference;
/// use mocktest::Value;
///
/// let diff = describe_difference(&Value::from(vec![1, 2, 3]), &Value::from(vec![1, 4, 3]));
/// assert_eq!(diff.unwrap(), "lists differ at index 1:\n\t2 != 4");
/// ```
pub fn describe_difference(expected: &Value, actual: &Value) -> Option<String> {
    if let (Some(expected), Some(actual)) = (expected.as_sequence(), actual.as_sequence()) {
        return describe_sequences(expected, actual);
    }
    if let (Some(expected), Some(actual)) = (expected.as_map(), actual.as_map()) {
        return describe_maps(expected, actual);
    }
    None
}

fn describe_sequences(expected: &[Value], actual: &[Value]) -> Option<String> {
    const EXHAUSTED: &str = "(no more values)";

    let render = |side: &[Value], index: usize| {
        side.get(index)
            .map_or_else(|| EXHAUSTED.to_string(), ToString::to_string)
    };

    let index = if expected.len() == actual.len() {
        expected.iter().zip(actual).position(|(e, a)| e != a)?
    } else {
        expected.len().min(actual.len())
    };

    Some(format!(
        "lists differ at index {index}:\n\t{} != {}",
        render(expected, index),
        render(actual, index)
    ))
}

fn describe_maps(
    expected: &BTreeMap<Value, Value>,
    actual: &BTreeMap<Value, Value>,
) -> Option<String> {
    let only_expected: Vec<&Value> = expected.keys().filter(|k| !actual.contains_key(k)).collect();
    let only_actual: Vec<&Value> = actual.keys().filter(|k| !expected.contains_key(k)).collect();

    if !only_expected.is_empty() || !only_actual.is_empty() {
        return Some(format!(
            "dict keys differ: {} != {}",
            Value::list(only_expected),
            Value::list(only_actual)
        ));
    }

    let mut expected_side = BTreeMap::new();
    let mut actual_side = BTreeMap::new();
    for (key, value) in expected {
        if let Some(other) = actual.get(key).filter(|other| *other != value) {
            expected_side.insert(key.clone(), value.clone());
            actual_side.insert(key.clone(), other.clone());
        }
    }
    if expected_side.is_empty() {
        return None;
    }
    Some(format!(
        "difference between dicts: {} vs {}",
        Value::Map(expected_side),
        Value::Map(actual_side)
    ))
}

/// Check two values for structural equality.
///
/// The failure text is `<expected> != <actual>`, followed by the
/// [`describe_difference`] explanation when there is one.
pub fn assert_equal(expected: &Value, actual: &Value) -> Result<()> {
    if expected == actual {
        return Ok(());
    }
    let mut message = format!("{expected} != {actual}");
    if let Some(diff) = describe_difference(expected, actual) {
        message.push('\n');
        message.push_str(&diff);
    }
    Err(Error::AssertionFailed(message))
}

/// Assert that two values are structurally equal, explaining the difference
/// on failure.
///
/// Both sides are converted with `Value::from`. An explicit message replaces
/// the generated one.
///
/// # Panics
///
/// Panics if the values differ.
///
/// ```rust
/// use mocktest::assert_equal;
///
/// assert_equal!(vec![1, 2], vec![1, 2]);
/// ```
///
/// ```rust,should_panic
/// use mocktest::assert_equal;
///
/// // Assertion failed: [1, 2, 3] != [1]
/// // lists differ at index 1:
/// // 	2 != (no more values)
/// assert_equal!(vec![1, 2, 3], vec![1]);
/// ```
#[macro_export]
macro_rules! assert_equal {
    ($expected:expr, $actual:expr $(,)?) => {{
        let expected = $crate::Value::from($expected);
        let actual = $crate::Value::from($actual);
        if let ::core::result::Result::Err(err) =
            $crate::assertions::assert_equal(&expected, &actual)
        {
            panic!("{}", err);
        }
    }};
    ($expected:expr, $actual:expr, $($arg:tt)+) => {{
        let expected = $crate::Value::from($expected);
        let actual = $crate::Value::from($actual);
        if expected != actual {
            panic!("Assertion failed: {}", format_args!($($arg)+));
        }
    }};
}
