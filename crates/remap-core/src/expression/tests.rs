//! Tests for the expression language

use super::*;
use serde_json::json;

fn document(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

fn eval(expression: &str, value: Value) -> Result<Value, ExpressionError> {
    let input = Document::new();
    ExprEvaluator.evaluate(expression, &EvalContext::for_rule(&value, &input))
}

fn eval_with_input(expression: &str, value: Value, input: Value) -> Result<Value, ExpressionError> {
    let input = document(input);
    ExprEvaluator.evaluate(expression, &EvalContext::for_rule(&value, &input))
}

#[test]
fn test_doubles_value() {
    assert_eq!(eval("value * 2", json!(10)).unwrap(), json!(20));
}

#[test]
fn test_evaluate_expression_binds_environment() {
    let env = document(json!({"value": 10, "factor": 3}));
    assert_eq!(evaluate_expression("value * factor", &env).unwrap(), json!(30));
    assert!(matches!(
        evaluate_expression("missing + 1", &env),
        Err(ExpressionError::UnknownVariable { name }) if name == "missing"
    ));
}

#[test]
fn test_arithmetic() {
    assert_eq!(eval("1 + 2 * 3 - 4", Value::Null).unwrap(), json!(3));
    assert_eq!(eval("(1 + 2) * 3", Value::Null).unwrap(), json!(9));
    assert_eq!(eval("7 % 3", Value::Null).unwrap(), json!(1));
    assert_eq!(eval("10 / 4", Value::Null).unwrap(), json!(2.5));
    assert_eq!(eval("value + 0.5", json!(1)).unwrap(), json!(1.5));
    assert_eq!(eval("-value", json!(3)).unwrap(), json!(-3));
}

#[test]
fn test_arithmetic_errors() {
    assert_eq!(eval("value / 0", json!(1)), Err(ExpressionError::DivisionByZero));
    assert_eq!(eval("value % 0", json!(1)), Err(ExpressionError::DivisionByZero));
    assert!(matches!(
        eval("value * 2", json!(i64::MAX)),
        Err(ExpressionError::Overflow { .. })
    ));
    assert!(matches!(
        eval("value - 1", json!("a")),
        Err(ExpressionError::TypeMismatch { .. })
    ));
    assert!(matches!(
        eval("value * 1e308", json!(1e308)),
        Err(ExpressionError::NonFinite { .. })
    ));
    assert!(matches!(
        eval("value % 2", json!(2.5)),
        Err(ExpressionError::TypeMismatch { .. })
    ));
}

#[test]
fn test_string_concatenation() {
    assert_eq!(eval("'Hello, ' + value", json!("Ann")).unwrap(), json!("Hello, Ann"));
    assert_eq!(eval("'n=' + value", json!(4)).unwrap(), json!("n=4"));
    assert_eq!(eval("value + '!'", json!(true)).unwrap(), json!("true!"));
}

#[test]
fn test_comparisons() {
    assert_eq!(eval("value > 18", json!(21)).unwrap(), json!(true));
    assert_eq!(eval("value <= 1.5", json!(1)).unwrap(), json!(true));
    assert_eq!(eval("value < 'b'", json!("a")).unwrap(), json!(true));
    assert_eq!(eval("value == 1.0", json!(1)).unwrap(), json!(true));
    assert_eq!(eval("value != null", Value::Null).unwrap(), json!(false));
    // no array literals
    assert!(eval("value == [1, 2]", json!([1, 2])).is_err());
    assert!(matches!(
        eval("value < 1", json!("a")),
        Err(ExpressionError::TypeMismatch { .. })
    ));
}

#[test]
fn test_logic_short_circuits() {
    // the right side would fail if evaluated
    assert_eq!(eval("false && missing", Value::Null).unwrap(), json!(false));
    assert_eq!(eval("true || missing", Value::Null).unwrap(), json!(true));
    assert_eq!(eval("value and 'x'", json!(1)).unwrap(), json!(true));
    assert_eq!(eval("not value", json!("")).unwrap(), json!(true));
    assert_eq!(eval("!value", json!([])).unwrap(), json!(true));
}

#[test]
fn test_coalesce_and_conditional() {
    assert_eq!(eval("value ?? 'default'", Value::Null).unwrap(), json!("default"));
    assert_eq!(eval("value ?? missing", json!(0)).unwrap(), json!(0));
    assert_eq!(
        eval("value >= 18 ? 'adult' : 'minor'", json!(12)).unwrap(),
        json!("minor")
    );
    assert_eq!(
        eval("value == 'M' ? 1 : value == 'F' ? 2 : 3", json!("F")).unwrap(),
        json!(2)
    );
}

#[test]
fn test_member_and_index_access() {
    let input = json!({
        "user": {"name": "Ann", "tags": ["a", "b", "c"]},
        "odd key": 1
    });
    assert_eq!(
        eval_with_input("input.user.name", Value::Null, input.clone()).unwrap(),
        json!("Ann")
    );
    assert_eq!(
        eval_with_input("input.user.tags[-1]", Value::Null, input.clone()).unwrap(),
        json!("c")
    );
    assert_eq!(
        eval_with_input("input['odd key']", Value::Null, input.clone()).unwrap(),
        json!(1)
    );
    assert_eq!(
        eval_with_input("input.user.tags[10]", Value::Null, input.clone()).unwrap(),
        Value::Null
    );
    assert_eq!(
        eval_with_input("input.nobody.name", Value::Null, input.clone()).unwrap(),
        Value::Null
    );
    assert!(matches!(
        eval_with_input("input.user.name.first", Value::Null, input),
        Err(ExpressionError::TypeMismatch { .. })
    ));
}

#[test]
fn test_member_of_computed_value() {
    assert!(eval("(value ?? {}).a", json!({"a": 5})).is_err());
    assert_eq!(eval("(value ?? null).a", json!({"a": 5})).unwrap(), json!(5));
    assert_eq!(eval("(true ? value : null)[1]", json!([1, 2])).unwrap(), json!(2));
}

#[test]
fn test_functions() {
    assert_eq!(eval("len(value)", json!("héllo")).unwrap(), json!(5));
    assert_eq!(eval("len(value)", json!([1, 2])).unwrap(), json!(2));
    assert_eq!(eval("upper(trim(value))", json!("  ann ")).unwrap(), json!("ANN"));
    assert_eq!(eval("lower(value)", json!("ANN")).unwrap(), json!("ann"));
    assert_eq!(eval("string(value)", json!(12)).unwrap(), json!("12"));
    assert_eq!(eval("number(value) + 1", json!("41")).unwrap(), json!(42));
    assert_eq!(eval("number(value)", json!("2.5")).unwrap(), json!(2.5));
}

#[test]
fn test_function_errors() {
    assert!(matches!(
        eval("shout(value)", json!("a")),
        Err(ExpressionError::UnknownFunction { name }) if name == "shout"
    ));
    assert!(matches!(
        eval("upper(value, value)", json!("a")),
        Err(ExpressionError::Arity { expected: 1, found: 2, .. })
    ));
    assert!(matches!(
        eval("upper(value)", json!(1)),
        Err(ExpressionError::TypeMismatch { .. })
    ));
    assert!(matches!(
        eval("number(value)", json!("abc")),
        Err(ExpressionError::TypeMismatch { .. })
    ));
}

#[test]
fn test_unbound_variables() {
    let context = EvalContext::new();
    assert!(matches!(
        ExprEvaluator.evaluate("value", &context),
        Err(ExpressionError::UnknownVariable { .. })
    ));
    assert!(matches!(
        ExprEvaluator.evaluate("input", &context),
        Err(ExpressionError::UnknownVariable { .. })
    ));
}

#[test]
fn test_input_variable_yields_whole_document() {
    let input = json!({"a": 1});
    assert_eq!(eval_with_input("input", Value::Null, input.clone()).unwrap(), input);
}

#[test]
fn test_syntax_error_reported() {
    let err = eval("value +", json!(1)).unwrap_err();
    assert!(err.is_syntax());
}

#[test]
fn test_parsed_expression_is_reusable() {
    let expression: Expression = "value + 1".parse().unwrap();
    assert_eq!(expression.source(), "value + 1");
    assert_eq!(expression.to_string(), "value + 1");

    let input = Document::new();
    for n in 0..3 {
        let value = json!(n);
        assert_eq!(
            expression.evaluate(&EvalContext::for_rule(&value, &input)).unwrap(),
            json!(n + 1)
        );
    }
}

#[test]
fn test_closure_evaluator() {
    fn constant(_: &str, _: &EvalContext<'_>) -> Result<Value, ExpressionError> {
        Ok(json!("fixed"))
    }
    assert_eq!(
        constant.evaluate("anything", &EvalContext::new()).unwrap(),
        json!("fixed")
    );
}

#[test]
fn test_values_equal_and_truthiness() {
    assert!(values_equal(&json!({"a": [1, 2.0]}), &json!({"a": [1.0, 2]})));
    assert!(!values_equal(&json!({"a": 1}), &json!({"a": 1, "b": 2})));
    assert!(!is_truthy(&json!(0)));
    assert!(!is_truthy(&json!({})));
    assert!(is_truthy(&json!(-1)));
    assert!(is_truthy(&json!("0")));
}

fn assert_too_deep(expression: &str) {
    match eval(expression, json!(1)) {
        Err(ExpressionError::Syntax { message, .. }) => assert!(message.contains("too deep"), "{message}"),
        other => panic!("expected a nesting error, got {other:?}"),
    }
}

#[test]
fn test_deep_nesting_is_rejected() {
    let parens = format!("{}value{}", "(".repeat(500), ")".repeat(500));
    assert_too_deep(&parens);
    assert_too_deep(&format!("{}value", "!".repeat(500)));
    assert_too_deep(&format!("{}value{}", "upper(".repeat(300), ")".repeat(300)));
    assert_too_deep(&format!("value{}", "[0]".repeat(300)));
    assert_too_deep(&format!("{}1{}", "value ? ".repeat(300), " : 0".repeat(300)));
}

#[test]
fn test_long_operator_chain_is_rejected() {
    assert_too_deep(&format!("value{}", " + 1".repeat(20_000)));
    assert_too_deep(&format!("value{}", " && value".repeat(5_000)));
}

#[test]
fn test_moderate_nesting_evaluates() {
    let parens = format!("{}value{}", "(".repeat(50), ")".repeat(50));
    assert_eq!(eval(&parens, json!(7)).unwrap(), json!(7));

    let chain = format!("value{}", " + 1".repeat(90));
    assert_eq!(eval(&chain, json!(1)).unwrap(), json!(91));
}

#[test]
fn test_hand_built_deep_tree_is_rejected() {
    let mut expr = Expr::Variable("value".to_string());
    for _ in 0..(parser::MAX_DEPTH + 10) {
        expr = Expr::unary(UnaryOperator::Not, expr);
    }
    let value = json!(true);
    let err = interpreter::evaluate(&expr, &EvalContext::new().with_value(&value)).unwrap_err();
    assert_eq!(err, ExpressionError::TooDeep { limit: parser::MAX_DEPTH });
}
