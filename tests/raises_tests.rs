//! Integration tests for error assertions.

use mocktest::assertions::{assert_raises, Raises};
use mocktest::prelude::*;

#[derive(Debug, thiserror::Error)]
#[error("{0}: {1}{2}")]
struct Formatted(&'static str, u32, &'static str);

#[derive(Debug, thiserror::Error)]
#[error("type mismatch")]
struct Mismatch;

fn active() -> Registry {
    let registry = Registry::new();
    registry.setup().unwrap();
    registry
}

#[test]
fn test_raising_mock_checked_by_type_and_message() {
    let registry = active();
    let wrapper = registry
        .mock_wrapper()
        .unwrap()
        .with_action(|args| {
            let first = args.get(0).and_then(Value::as_str).unwrap_or_default().to_string();
            Err(Error::raised(Formatted(
                if first == "one" { "one" } else { "other" },
                2,
                "y",
            )))
        });

    assert_raises!(Formatted, wrapper.mock().call(args!("one", 2; extra = "y")), message = "one: 2y");
    assert_raises!(Error, wrapper.mock().call(args!()), matching = "^other");
    registry.teardown().unwrap();
}

#[test]
fn test_wrong_type_message_or_pattern_fails() {
    let registry = active();
    let wrapper = registry.mock_wrapper().unwrap().raising(Formatted("a", 1, ")"));

    let wrong_type = assert_raises::<Mismatch, _>(wrapper.mock().call(args!()), &Raises::new());
    assert!(matches!(wrong_type, Err(Error::AssertionFailed(_))));

    let wrong_message =
        assert_raises::<Formatted, _>(wrapper.mock().call(args!()), &Raises::new().message("nope"));
    assert!(matches!(wrong_message, Err(Error::AssertionFailed(_))));

    let wrong_pattern =
        assert_raises::<Formatted, _>(wrapper.mock().call(args!()), &Raises::new().matching("^b"));
    assert!(matches!(wrong_pattern, Err(Error::AssertionFailed(_))));

    let right_pattern =
        assert_raises::<Formatted, _>(wrapper.mock().call(args!()), &Raises::new().matching(r"\)$"));
    assert!(right_pattern.is_ok());
    registry.teardown().unwrap();
}

#[test]
fn test_teardown_failure_matches_pattern() {
    let registry = active();
    let f = registry.mock_wrapper().unwrap();
    f.expects("foo").unwrap().once();
    let foo = f.mock().child("foo").unwrap();
    foo.call(args!("a")).unwrap();
    foo.call(args!()).unwrap();

    assert_raises!(
        Error,
        registry.teardown(),
        matching = r#"(?s)Mock "foo" .*expected exactly 1 calls.* received 2 calls"#
    );
}

#[test]
#[should_panic(expected = "not raised")]
fn test_success_fails_the_assertion() {
    let mock = Mock::new();
    assert_raises!(Error, mock.call(args!()));
}
