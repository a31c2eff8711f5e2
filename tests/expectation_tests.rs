//! Integration tests for matchers, the registry and failure diagnostics.

use mocktest::prelude::*;
use regex::Regex;

fn active() -> Registry {
    let registry = Registry::new();
    registry.setup().unwrap();
    registry
}

/// Replace the padded line number column so snapshots survive edits.
fn line_agnostic(text: &str) -> Vec<String> {
    let line_column = Regex::new(r"\.rs:[0-9 ]{3} ").unwrap();
    text.lines()
        .map(|line| line_column.replace(line, ".rs:LINE ").into_owned())
        .collect()
}

#[test]
fn test_expectation_formatting_without_calls() {
    let registry = active();
    let matcher = registry
        .mock_wrapper()
        .unwrap()
        .called()
        .with_args(args!("foo"; bar = 1))
        .twice();

    assert_eq!(
        matcher.to_string(),
        [
            "Mock \"unnamed mock\" did not match expectations:",
            " expected exactly 2 calls with arguments equal to: 'foo', bar=1",
            " received 0 calls",
        ]
        .join("\n")
    );
    registry.teardown().unwrap();
}

#[test]
fn test_reality_formatting() {
    let registry = active();
    let m = registry.mock_wrapper().unwrap().named("ze_mock");
    let mock = m.mock();
    mock.call(args!(1, 2, 3)).unwrap();
    mock.call(args!(; foo = "bar")).unwrap();
    mock.call(args!()).unwrap();
    mock.call(args!(1; foo = 2)).unwrap();

    let rendered = registry.wrap(mock).unwrap().called().once().to_string();
    assert_eq!(
        line_agnostic(&rendered),
        [
            "Mock \"ze_mock\" did not match expectations:",
            " expected exactly 1 calls",
            " received 4 calls with arguments:",
            "  1:   1, 2, 3                  // expectation_tests.rs:LINE :: ze_mock(1, 2, 3)",
            "  2:   foo='bar'                // expectation_tests.rs:LINE :: ze_mock(foo='bar')",
            "  3:   No arguments             // expectation_tests.rs:LINE :: ze_mock()",
            "  4:   1, foo=2                 // expectation_tests.rs:LINE :: ze_mock(1, foo=2)",
        ]
    );
    registry.teardown().unwrap();
}

#[test]
fn test_call_macro_records_expression() {
    let m = Mock::named("x");
    call!(m, 1, 2, 3).unwrap();

    let rendered = Matcher::new(&m).once().to_string();
    let lines = line_agnostic(&rendered);
    assert_eq!(lines[0], "Mock \"x\" did not match expectations:");
    assert_eq!(lines[1], " expected exactly 1 calls");
    assert_eq!(lines[2], " received 1 calls with arguments:");
    assert!(lines[3].starts_with("  1:   1, 2, 3 "));
    assert!(lines[3].contains("// expectation_tests.rs:LINE :: m("));
}

#[test]
fn test_diagnostic_is_rendered_when_satisfied() {
    let m = Mock::named("x");
    m.call(args!(1, 2, 3)).unwrap();

    let matcher = Matcher::new(&m).once();
    assert!(matcher.is_satisfied());
    let text = matcher.to_string();
    assert!(text.contains("Mock \"x\" did not match expectations:"));
    assert!(text.contains("expected exactly 1 calls"));
    assert!(text.contains("received 1 calls with arguments:"));
    assert!(text.contains("1, 2, 3"));

    let unmet = Matcher::new(&m).twice();
    match unmet.check() {
        Err(Error::ExpectationNotMet(message)) => assert_eq!(message, unmet.to_string()),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn test_teardown_reports_every_unmet_expectation() {
    let registry = active();
    let f = registry.mock_wrapper().unwrap();
    f.expects("foo").unwrap().once();
    f.expects("bar").unwrap().at_least(1);

    let foo = f.mock().child("foo").unwrap();
    foo.call(args!("a")).unwrap();
    foo.call(args!()).unwrap();

    let err = registry.teardown().unwrap_err();
    let pattern =
        Regex::new(r#"(?s)Mock "foo" .*expected exactly 1 calls.* received 2 calls.*"#).unwrap();
    assert!(pattern.is_match(&err.to_string()));
    assert_eq!(err.failures().len(), 2);
    assert!(err.to_string().starts_with("2 expectation(s) not met:"));
    assert!(!registry.is_active());
}

#[test]
fn test_expectations_on_mock_wrapper_and_child() {
    let registry = active();
    let wrapper = registry.mock_wrapper().unwrap();
    let mock = wrapper.mock().clone();

    registry.expect(&mock.child("a").unwrap()).unwrap().once();
    wrapper.expects("b").unwrap().once();
    wrapper.child("c").unwrap().is_expected().unwrap().once();
    assert_eq!(registry.pending().len(), 3);

    mock.invoke("a", args!()).unwrap();
    mock.invoke("b", args!()).unwrap();
    mock.invoke("c", args!()).unwrap();
    registry.teardown().unwrap();
}

#[test]
fn test_get_calls_filters_in_order() {
    let m = Mock::new();
    m.call(args!(1)).unwrap();
    m.call(args!(2)).unwrap();
    m.call(args!(1; k = "v")).unwrap();
    m.call(args!(1)).unwrap();

    let matcher = Matcher::new(&m).with_args(args!(1));
    assert_eq!(matcher.get_calls(), vec![args!(1), args!(1)]);
    assert_eq!(matcher.call_count(), 2);

    let orders: Vec<u64> = matcher.invocations().iter().map(Invocation::order).collect();
    assert!(orders.windows(2).all(|w| w[0] < w[1]));

    let all = Matcher::new(&m);
    assert_eq!(
        all.get_calls(),
        vec![args!(1), args!(2), args!(1; k = "v"), args!(1)]
    );
}

#[test]
fn test_wide_integer_arguments_are_not_conflated() {
    let m = Mock::new();
    m.call(args!(u64::MAX - 1)).unwrap();
    m.call(args!(u64::MAX)).unwrap();

    let matcher = Matcher::new(&m).with_args(args!(u64::MAX)).once();
    assert_eq!(matcher.get_calls(), vec![args!(u64::MAX)]);
    assert!(matcher.is_satisfied());
}

#[test]
fn test_expectations_after_teardown_are_configuration_errors() {
    let registry = active();
    let wrapper = registry.mock_wrapper().unwrap();
    registry.teardown().unwrap();

    let err = wrapper.expects("late").unwrap_err();
    assert!(matches!(err, Error::Configuration(ref msg) if msg.contains("Registry::setup")));
    assert!(matches!(registry.expect(wrapper.mock()), Err(Error::Configuration(_))));
}

#[test]
fn test_get_calls_reflects_later_calls() {
    let m = Mock::new();
    let matcher = Matcher::new(&m).at_least(2);
    assert!(!matcher.is_satisfied());

    m.call(args!()).unwrap();
    m.call(args!()).unwrap();
    assert!(matcher.is_satisfied());
    assert_eq!(matcher.get_calls().len(), 2);

    m.reset();
    assert!(matcher.get_calls().is_empty());
    assert!(!matcher.is_satisfied());
}

#[test]
fn test_quantifiers() {
    let m = Mock::new();
    for _ in 0..3 {
        m.call(args!()).unwrap();
    }

    assert!(Matcher::new(&m).thrice().is_satisfied());
    assert!(Matcher::new(&m).times(3).is_satisfied());
    assert!(!Matcher::new(&m).twice().is_satisfied());
    assert!(!Matcher::new(&m).never().is_satisfied());
    assert!(Matcher::new(&m).at_least(3).is_satisfied());
    assert!(!Matcher::new(&m).at_least(4).is_satisfied());
    assert!(Matcher::new(&m).is_satisfied());
    assert!(!Matcher::new(&Mock::new()).is_satisfied());
    assert!(Matcher::new(&Mock::new()).never().is_satisfied());
}

#[test]
fn test_unconstrained_rendering() {
    let matcher = Matcher::new(&Mock::named("idle"));
    assert_eq!(matcher.times_constraint(), Times::Any);
    assert!(matcher.to_string().contains(" expected at least 1 calls"));
}

#[test]
fn test_teardown_twice_is_a_lifecycle_error() {
    let registry = active();
    registry.mock_wrapper().unwrap().expects("x").unwrap().never();
    registry.teardown().unwrap();

    assert!(matches!(registry.teardown(), Err(Error::Lifecycle(_))));
    assert!(!registry.is_active());
    assert!(registry.pending().is_empty());
}

#[test]
fn test_registry_is_reusable_across_tests() {
    let registry = active();
    registry.mock_wrapper().unwrap().expects("x").unwrap().once();
    assert!(registry.teardown().is_err());

    registry.setup().unwrap();
    assert!(registry.pending().is_empty());
    registry.teardown().unwrap();
}

#[test]
fn test_raised_error_surfaces_unchanged() {
    #[derive(Debug, thiserror::Error)]
    #[error("connection refused")]
    struct Refused;

    let registry = active();
    let wrapper = registry.mock_wrapper().unwrap().raising(Refused);
    wrapper.is_expected().unwrap().once();

    let err = wrapper.mock().call(args!()).unwrap_err();
    assert!(err.raised_error().unwrap().is::<Refused>());
    registry.teardown().unwrap();
}
