//! Parser integration tests.
//!
//! Covers: statement forms, assignment targets (bare names and mutation
//! paths), expression precedence, postfix chains, lambdas vs function
//! declarations, fragment classification, and error recovery.

use quire_lexer::Lexer;
use quire_parser::{ParseResult, Parser};
use quire_types::ast::*;
use quire_types::SourceFile;

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

/// Parse source and return the result (program + errors).
fn parse(source: &str) -> ParseResult {
    let sf = SourceFile::new("test.quire", source);
    let lex = Lexer::new(&sf).lex();
    Parser::new(lex.tokens, &sf).parse()
}

/// Parse source and return the program, panicking if there are errors.
fn parse_ok(source: &str) -> Program {
    let result = parse(source);
    if result.errors.has_errors() {
        for e in result.errors.iter() {
            eprintln!("  ERROR: {e}");
        }
        panic!("unexpected parse errors (see above)");
    }
    result.program.expect("no program returned")
}

/// Parse source and return the error count.
fn error_count(source: &str) -> usize {
    parse(source).errors.len()
}

// ─────────────────────────────────────────────────────────────────────
// Statements
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_assignment_statement() {
    let prog = parse_ok("x = 1");
    assert_eq!(prog.stmts.len(), 1);
    match &prog.stmts[0] {
        Stmt::Assign(assign) => {
            assert_eq!(assign.target.base.name, "x");
            assert!(assign.target.path.is_empty());
        }
        other => panic!("expected assignment, got {other:?}"),
    }
}

#[test]
fn test_newline_separated_statements() {
    let prog = parse_ok("x = 1\ny = 2\n\nz = 3\n");
    assert_eq!(prog.stmts.len(), 3);
}

#[test]
fn test_index_assignment_target() {
    let prog = parse_ok("xs[0] = 9");
    match &prog.stmts[0] {
        Stmt::Assign(assign) => {
            assert_eq!(assign.target.base.name, "xs");
            assert!(matches!(assign.target.path.as_slice(), [AccessSeg::Index(_)]));
        }
        other => panic!("expected assignment, got {other:?}"),
    }
}

#[test]
fn test_nested_assignment_target() {
    let prog = parse_ok("r.xs[1].name = \"z\"");
    match &prog.stmts[0] {
        Stmt::Assign(assign) => {
            assert_eq!(assign.target.base.name, "r");
            assert!(matches!(
                assign.target.path.as_slice(),
                [AccessSeg::Field(_), AccessSeg::Index(_), AccessSeg::Field(_)]
            ));
        }
        other => panic!("expected assignment, got {other:?}"),
    }
}

#[test]
fn test_invalid_assignment_target() {
    assert!(error_count("f() = 1") > 0);
    assert!(error_count("1 = 2") > 0);
}

#[test]
fn test_if_else_if_chain() {
    let prog = parse_ok("if a {\n  x = 1\n} else if b {\n  x = 2\n} else {\n  x = 3\n}");
    match &prog.stmts[0] {
        Stmt::If(if_stmt) => match &if_stmt.else_branch {
            Some(ElseBranch::ElseIf(nested)) => {
                assert!(matches!(nested.else_branch, Some(ElseBranch::Block(_))));
            }
            other => panic!("expected else-if, got {other:?}"),
        },
        other => panic!("expected if, got {other:?}"),
    }
}

#[test]
fn test_while_statement() {
    let prog = parse_ok("while i < 10 {\n  i = i + 1\n}");
    assert!(matches!(prog.stmts[0], Stmt::While(_)));
}

#[test]
fn test_for_statement() {
    let prog = parse_ok("for item in items {\n  print(item)\n}");
    match &prog.stmts[0] {
        Stmt::For(for_stmt) => assert_eq!(for_stmt.item.name, "item"),
        other => panic!("expected for, got {other:?}"),
    }
}

#[test]
fn test_fn_declaration() {
    let prog = parse_ok("fn add(a, b) {\n  return a + b\n}");
    match &prog.stmts[0] {
        Stmt::FnDecl(decl) => {
            assert_eq!(decl.name.name, "add");
            assert_eq!(decl.params.len(), 2);
        }
        other => panic!("expected fn declaration, got {other:?}"),
    }
}

#[test]
fn test_bare_return() {
    let prog = parse_ok("fn f() {\n  return\n}");
    match &prog.stmts[0] {
        Stmt::FnDecl(decl) => match &decl.body.stmts[0] {
            Stmt::Return(ret) => assert!(ret.value.is_none()),
            other => panic!("expected return, got {other:?}"),
        },
        other => panic!("expected fn declaration, got {other:?}"),
    }
}

// ─────────────────────────────────────────────────────────────────────
// Expressions
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_precedence_mul_over_add() {
    let prog = parse_ok("1 + 2 * 3");
    let expr = prog.as_single_expression().expect("single expression");
    match &expr.kind {
        ExprKind::Binary { op, right, .. } => {
            assert_eq!(*op, BinOp::Add);
            assert!(matches!(
                right.kind,
                ExprKind::Binary { op: BinOp::Mul, .. }
            ));
        }
        other => panic!("expected binary, got {other:?}"),
    }
}

#[test]
fn test_comparison_binds_tighter_than_and() {
    let prog = parse_ok("a < b and c < d");
    let expr = prog.as_single_expression().expect("single expression");
    assert!(matches!(
        expr.kind,
        ExprKind::Binary { op: BinOp::And, .. }
    ));
}

#[test]
fn test_chained_comparison_is_an_error() {
    assert!(error_count("a < b < c") > 0);
}

#[test]
fn test_postfix_chain() {
    let prog = parse_ok("r.items[0].done");
    let expr = prog.as_single_expression().expect("single expression");
    assert!(matches!(expr.kind, ExprKind::Field { .. }));
}

#[test]
fn test_call_expression() {
    let prog = parse_ok("f(1, g(2), \"x\")");
    let expr = prog.as_single_expression().expect("single expression");
    match &expr.kind {
        ExprKind::Call { args, .. } => assert_eq!(args.len(), 3),
        other => panic!("expected call, got {other:?}"),
    }
}

#[test]
fn test_list_and_record_literals() {
    let prog = parse_ok("[1, 2, 3]");
    assert!(matches!(
        prog.as_single_expression().unwrap().kind,
        ExprKind::ListLit(_)
    ));

    let prog = parse_ok("{ name: \"a\", done: false }");
    match &prog.as_single_expression().unwrap().kind {
        ExprKind::RecordLit(fields) => assert_eq!(fields.len(), 2),
        other => panic!("expected record literal, got {other:?}"),
    }
}

#[test]
fn test_lambda_expression() {
    let prog = parse_ok("f = fn (a, b) {\n  return a + b\n}");
    match &prog.stmts[0] {
        Stmt::Assign(assign) => match &assign.value.kind {
            ExprKind::Lambda { params, .. } => assert_eq!(params.len(), 2),
            other => panic!("expected lambda, got {other:?}"),
        },
        other => panic!("expected assignment, got {other:?}"),
    }
}

#[test]
fn test_unary_operators() {
    let prog = parse_ok("not -x");
    let expr = prog.as_single_expression().expect("single expression");
    assert!(matches!(
        expr.kind,
        ExprKind::Unary {
            op: UnaryOp::Not,
            ..
        }
    ));
}

// ─────────────────────────────────────────────────────────────────────
// Classification
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_single_expression_fragment() {
    assert!(parse_ok("1 + 2").as_single_expression().is_some());
    assert!(parse_ok("f(x)").as_single_expression().is_some());
}

#[test]
fn test_non_expression_fragments() {
    assert!(parse_ok("x = 1").as_single_expression().is_none());
    assert!(parse_ok("1\n2").as_single_expression().is_none());
    assert!(parse_ok("").as_single_expression().is_none());
    assert!(parse_ok("if x {\n}").as_single_expression().is_none());
}

// ─────────────────────────────────────────────────────────────────────
// Error recovery
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_recovers_to_next_statement() {
    // The bad first line must not swallow the valid statements after it.
    let result = parse("x = \ny = 2\nz = 3");
    assert!(result.errors.has_errors());
}

#[test]
fn test_multiple_errors_collected() {
    assert!(error_count("x = \ny = \n") >= 2);
}

#[test]
fn test_missing_closing_brace() {
    assert!(error_count("if x {\n  y = 1\n") > 0);
}

#[test]
fn test_two_statements_on_one_line() {
    assert!(error_count("x = 1 y = 2") > 0);
}
