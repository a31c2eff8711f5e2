//! Integration tests for explained equality assertions.

use std::collections::BTreeMap;
use std::panic;

use mocktest::assertions::{assert_equal, describe_difference};
use mocktest::prelude::*;

fn panic_message(f: impl FnOnce() + panic::UnwindSafe) -> String {
    let payload = panic::catch_unwind(f).unwrap_err();
    payload
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| payload.downcast_ref::<&str>().map(ToString::to_string))
        .unwrap()
}

#[test]
fn test_list_element_difference() {
    let message = panic_message(|| assert_equal!(vec![1, 2, 3], vec![1, 4, 3]));
    let lines: Vec<&str> = message.lines().collect();
    assert_eq!(lines[1..], ["lists differ at index 1:", "\t2 != 4"]);
}

#[test]
fn test_list_length_difference() {
    let message = panic_message(|| assert_equal!(vec![1, 2, 3], vec![1]));
    let lines: Vec<&str> = message.lines().collect();
    assert_eq!(lines[1..], ["lists differ at index 1:", "\t2 != (no more values)"]);
}

#[test]
fn test_length_difference_reported_before_elements() {
    assert_eq!(
        describe_difference(&Value::from(vec![1, 2, 3]), &Value::from(vec![9])).unwrap(),
        "lists differ at index 1:\n\t2 != (no more values)"
    );
}

#[test]
fn test_dict_differences() {
    let expected: BTreeMap<&str, &str> = [("a", "b")].into_iter().collect();
    let other_keys: BTreeMap<&str, &str> = [("4", "x"), ("5", "d")].into_iter().collect();
    let other_values: BTreeMap<&str, &str> = [("a", "d")].into_iter().collect();

    assert_eq!(
        describe_difference(&Value::from(expected.clone()), &Value::from(other_keys)).unwrap(),
        "dict keys differ: ['a'] != ['4', '5']"
    );
    assert_eq!(
        describe_difference(&Value::from(expected), &Value::from(other_values)).unwrap(),
        "difference between dicts: {'a': 'b'} vs {'a': 'd'}"
    );
}

#[test]
fn test_nested_values_compare_structurally() {
    let a = Value::list([Value::map([("k", vec![1, 2])]), Value::from("s")]);
    let b = Value::list([Value::map([("k", vec![1, 2])]), Value::from("s")]);
    assert!(assert_equal(&a, &b).is_ok());

    let c = Value::list([Value::map([("k", vec![1, 3])]), Value::from("s")]);
    let err = assert_equal(&a, &c).unwrap_err();
    assert!(err.to_string().contains("lists differ at index 0:"));
}

#[test]
fn test_scalars_have_no_explanation() {
    let err = assert_equal(&Value::from("foo"), &Value::from("bar")).unwrap_err();
    assert_eq!(err.to_string(), "Assertion failed: 'foo' != 'bar'");
}

#[test]
fn test_custom_message_overrides() {
    let message = panic_message(|| assert_equal!(vec![1], vec![2], "totals for {} differ", "may"));
    assert_eq!(message, "Assertion failed: totals for may differ");
}

#[test]
fn test_mocks_compare_by_identity() {
    let m = Mock::named("same");
    assert_equal!(m.clone(), &m);
    assert!(assert_equal(&Value::from(Mock::named("same")), &Value::from(&m)).is_err());
}
