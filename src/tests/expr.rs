use rstest::rstest;

use crate::expr::{evaluate, parse};
use crate::module::Binding;

fn eval_str(text: &str, binding: &Binding) -> f64 {
    evaluate(&parse(text).expect("should parse"), binding).expect("should evaluate")
}

#[rstest]
#[case("1 + 2 * 3", 7.0)]
#[case("(1 + 2) * 3", 9.0)]
#[case("2 ^ 3 ^ 2", 512.0)] // right-associative: 2^(3^2), not (2^3)^2
#[case("-2 ^ 2", -4.0)] // unary minus binds looser than exponentiation
#[case("10 / 2 / 5", 1.0)]
#[case("1 - 2 - 3", -4.0)]
#[case("abs(-5)", 5.0)]
#[case("sqrt(9)", 3.0)]
#[case("min(3, 1, 2)", 1.0)]
#[case("max(3, 1, 2)", 3.0)]
fn arithmetic_respects_precedence_and_associativity(#[case] text: &str, #[case] expected: f64) {
    let binding = Binding::new();
    assert_eq!(eval_str(text, &binding), expected);
}

#[rstest]
#[case("3 == 3", 1.0)]
#[case("3 != 3", 0.0)]
#[case("1 < 2", 1.0)]
#[case("2 <= 2", 1.0)]
#[case("3 > 2", 1.0)]
#[case("2 >= 3", 0.0)]
fn relational_operators_return_zero_or_one(#[case] text: &str, #[case] expected: f64) {
    let binding = Binding::new();
    assert_eq!(eval_str(text, &binding), expected);
}

#[rstest]
#[case("1 and 1", 1.0)]
#[case("1 and 0", 0.0)]
#[case("0 or 1", 1.0)]
#[case("0 or 0", 0.0)]
#[case("not 0", 1.0)]
#[case("not 1", 0.0)]
#[case("1 > 0 and 2 > 1", 1.0)]
fn logical_operators_treat_nonzero_as_true(#[case] text: &str, #[case] expected: f64) {
    let binding = Binding::new();
    assert_eq!(eval_str(text, &binding), expected);
}

#[test]
fn or_short_circuits_and_skips_the_right_operand() {
    // An unbound identifier on the right of `or` would be an eval error if
    // evaluated; short-circuiting must skip it entirely.
    let binding = Binding::new();
    assert_eq!(eval_str("1 or unbound", &binding), 1.0);
}

#[test]
fn and_short_circuits_and_skips_the_right_operand() {
    let binding = Binding::new();
    assert_eq!(eval_str("0 and unbound", &binding), 0.0);
}

#[test]
fn identifiers_resolve_against_the_binding() {
    let mut binding = Binding::new();
    binding.insert("x", 2.0);
    binding.insert("t", 5.0);
    assert_eq!(eval_str("x * 0.3 + t", &binding), 5.6);
}

#[test]
fn unbound_identifier_is_an_eval_error() {
    let binding = Binding::new();
    let expr = parse("x + 1").unwrap();
    assert!(evaluate(&expr, &binding).is_err());
}

#[test]
fn division_by_zero_is_an_eval_error() {
    let binding = Binding::new();
    let expr = parse("1 / 0").unwrap();
    assert!(evaluate(&expr, &binding).is_err());
}

#[test]
fn malformed_expression_is_a_parse_error() {
    assert!(parse("1 +").is_err());
    assert!(parse("(1 + 2").is_err());
}

#[test]
fn whitespace_around_operators_is_tolerated() {
    let binding = Binding::new();
    assert_eq!(eval_str("1+2", &binding), eval_str("1 + 2", &binding));
}

#[test]
fn nested_function_calls_do_not_confuse_argument_splitting() {
    let binding = Binding::new();
    assert_eq!(eval_str("max(min(1, 2), 0)", &binding), 1.0);
}

#[test]
fn wrong_arity_function_call_is_an_eval_error() {
    let binding = Binding::new();
    let expr = parse("sin(1, 2)").unwrap();
    assert!(evaluate(&expr, &binding).is_err());
    let expr = parse("min(1)").unwrap();
    assert!(evaluate(&expr, &binding).is_err());
}
