//! Integration tests for the Quire kernel.
//!
//! Exercises the full evaluate contract:
//! - single-expression fragments produce a representation
//! - statement fragments produce bindings only
//! - output capture on both channels
//! - syntax errors and runtime faults land on stderr, never panic
//! - mutation isolation between the input environment and the result
//! - partial progress after a mid-fragment fault
//! - chaining results across evaluations

use quire_eval::{output, Bindings, Value};
use quire_kernel::{evaluate, CellResult};

fn eval_empty(code: &str) -> CellResult {
    evaluate(code, &Bindings::new())
}

// ══════════════════════════════════════════════════════════════════════════════
// Classification & representation
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn single_expression_yields_representation() {
    let result = eval_empty("1 + 2");
    assert_eq!(result.representation.as_deref(), Some("3"));
    assert_eq!(result.stdout, "");
    assert_eq!(result.stderr, "");
    assert!(result.bindings.is_empty());
}

#[test]
fn string_representation_is_quoted() {
    let result = eval_empty("\"hi\"");
    assert_eq!(result.representation.as_deref(), Some("\"hi\""));
}

#[test]
fn statement_fragment_has_no_representation() {
    let result = eval_empty("x = 1");
    assert_eq!(result.representation, None);
    assert_eq!(result.bindings.get("x"), Some(&Value::Number(1.0)));
}

#[test]
fn nil_expression_is_not_echoed() {
    let result = eval_empty("nil");
    assert_eq!(result.representation, None);
    assert_eq!(result.stderr, "");
}

#[test]
fn multiple_expressions_are_statements() {
    // Two bare expressions: executed for effects, no representation.
    let result = eval_empty("1 + 1\n2 + 2");
    assert_eq!(result.representation, None);
    assert_eq!(result.stderr, "");
}

#[test]
fn empty_fragment() {
    let result = eval_empty("");
    assert_eq!(result.representation, None);
    assert_eq!(result.stdout, "");
    assert_eq!(result.stderr, "");
    assert!(result.bindings.is_empty());
}

#[test]
fn whitespace_and_comments_only() {
    let result = eval_empty("  \n// just a comment\n");
    assert_eq!(result.representation, None);
    assert_eq!(result.stderr, "");
}

// ══════════════════════════════════════════════════════════════════════════════
// Output capture
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn print_is_captured() {
    let result = eval_empty("print(\"hi\")");
    assert_eq!(result.stdout, "hi\n");
    assert_eq!(result.stderr, "");
    // print returns nil, and a nil value is not echoed.
    assert_eq!(result.representation, None);
}

#[test]
fn eprint_is_captured_separately() {
    let result = eval_empty("print(\"out\")\neprint(\"err\")");
    assert_eq!(result.stdout, "out\n");
    assert_eq!(result.stderr, "err\n");
}

#[test]
fn output_accumulates_in_order() {
    let result = eval_empty("for n in range(3) {\n  print(n)\n}");
    assert_eq!(result.stdout, "0\n1\n2\n");
}

#[test]
fn capture_is_restored_after_evaluation() {
    eval_empty("print(\"inside\")");
    // With no guard installed this goes to the real stream; under an
    // outer guard it must land there, not in the finished capture.
    let guard = output::CaptureGuard::install();
    output::write_stdout("after");
    let (stdout, _) = guard.finish();
    assert_eq!(stdout, "after");
}

#[test]
fn nested_evaluation_does_not_leak_output() {
    let outer = output::CaptureGuard::install();
    output::write_stdout("before ");
    let result = eval_empty("print(\"inner\")");
    output::write_stdout("after");
    let (stdout, _) = outer.finish();
    assert_eq!(result.stdout, "inner\n");
    assert_eq!(stdout, "before after");
}

// ══════════════════════════════════════════════════════════════════════════════
// Errors & faults
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn syntax_error_lands_on_stderr() {
    let mut input = Bindings::new();
    input.insert("x".to_string(), Value::Number(1.0));
    let result = evaluate("x = = 1", &input);
    assert!(result.stderr.contains("syntax error"), "stderr: {}", result.stderr);
    assert!(result.stderr.ends_with('\n'));
    assert_eq!(result.representation, None);
    assert_eq!(result.stdout, "");
    // Bindings pass through untouched.
    assert_eq!(result.bindings.get("x"), Some(&Value::Number(1.0)));
}

#[test]
fn runtime_fault_lands_on_stderr() {
    let result = eval_empty("1 / 0");
    assert_eq!(result.stderr, "division by zero\n");
    assert_eq!(result.representation, None);
    assert!(result.bindings.is_empty());
}

#[test]
fn fault_preserves_partial_progress() {
    let result = eval_empty("x = 1\nfail(\"boom\")\ny = 2");
    assert_eq!(result.stderr, "boom\n");
    assert_eq!(result.bindings.get("x"), Some(&Value::Number(1.0)));
    assert!(!result.bindings.contains_key("y"));
}

#[test]
fn output_before_fault_is_kept() {
    let result = eval_empty("print(\"first\")\nfail(\"boom\")");
    assert_eq!(result.stdout, "first\n");
    assert_eq!(result.stderr, "boom\n");
}

#[test]
fn undefined_variable_is_a_fault_not_a_panic() {
    let result = eval_empty("missing + 1");
    assert_eq!(result.stderr, "undefined variable: missing\n");
}

// ══════════════════════════════════════════════════════════════════════════════
// Isolation & chaining
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn input_bindings_are_never_mutated() {
    let mut input = Bindings::new();
    input.insert("xs".to_string(), Value::list(vec![Value::Number(1.0)]));

    let result = evaluate("push(xs, 2)\nxs[0] = 9", &input);
    assert_eq!(result.bindings["xs"].repr_string(), "[9, 2]");
    // The caller's list is untouched.
    assert_eq!(input["xs"].repr_string(), "[1]");
}

#[test]
fn cyclic_bindings_survive_snapshot_and_repr() {
    // A self-referential list built with ordinary code must not take
    // down the process: not in the next cell's snapshot, and not when
    // echoed as a single expression.
    let first = eval_empty("xs = [1]\nxs[0] = xs");
    assert_eq!(first.stderr, "");

    let second = evaluate("y = 1", &first.bindings);
    assert_eq!(second.stderr, "");
    assert!(second.bindings.contains_key("xs"));

    let third = evaluate("xs", &second.bindings);
    assert_eq!(third.representation.as_deref(), Some("[[...]]"));
}

#[test]
fn self_push_is_survivable() {
    let first = eval_empty("xs = []\npush(xs, xs)");
    assert_eq!(first.stderr, "");
    let second = evaluate("len(xs)", &first.bindings);
    assert_eq!(second.representation.as_deref(), Some("1"));
}

#[test]
fn large_whole_numbers_render_exactly() {
    let result = eval_empty("20000000000000000000");
    assert_eq!(
        result.representation.as_deref(),
        Some("20000000000000000000")
    );
}

#[test]
fn results_chain_across_evaluations() {
    let first = eval_empty("x = 5");
    let second = evaluate("x + 1", &first.bindings);
    assert_eq!(second.representation.as_deref(), Some("6"));
}

#[test]
fn functions_survive_chaining() {
    let first = eval_empty("fn double(n) {\n  return n * 2\n}");
    assert!(matches!(first.bindings.get("double"), Some(Value::Function(_))));
    let second = evaluate("double(21)", &first.bindings);
    assert_eq!(second.representation.as_deref(), Some("42"));
}

#[test]
fn rebinding_shadows_only_forward() {
    let first = eval_empty("x = 1");
    let second = evaluate("x = x + 1", &first.bindings);
    assert_eq!(second.bindings.get("x"), Some(&Value::Number(2.0)));
    assert_eq!(first.bindings.get("x"), Some(&Value::Number(1.0)));
}

#[test]
fn binding_order_follows_introduction() {
    let result = eval_empty("b = 1\na = 2\nc = 3");
    let names: Vec<&str> = result.bindings.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["b", "a", "c"]);
}

// ══════════════════════════════════════════════════════════════════════════════
// Serialization
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn cell_result_serializes_to_json() {
    let result = eval_empty("x = [1, \"two\"]\nr = { ok: true }");
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["stdout"], "");
    assert_eq!(json["representation"], serde_json::Value::Null);
    assert_eq!(json["bindings"]["x"][1], "two");
    assert_eq!(json["bindings"]["r"]["ok"], true);
}
