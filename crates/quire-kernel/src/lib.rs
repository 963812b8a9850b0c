//! The Quire kernel: evaluate one code fragment against a binding
//! environment and report everything it produced.
//!
//! [`evaluate`] is the whole public contract. It never returns an
//! error: syntax errors and runtime faults are rendered onto the
//! captured error channel, and the [`CellResult`] always carries a
//! usable set of resulting bindings.

mod notebook;
mod result;
mod snapshot;

pub use notebook::{Cell, Notebook};
pub use result::CellResult;
pub use snapshot::snapshot;

use quire_eval::output::CaptureGuard;
use quire_eval::{output, Bindings, Evaluator, Value};
use quire_lexer::Lexer;
use quire_parser::Parser;
use quire_types::{SourceFile, SyntaxErrors};

/// Evaluate a code fragment against the given bindings.
///
/// The input bindings are never mutated: execution runs against a
/// deep-copy [`snapshot`], and the result's bindings are that snapshot
/// after whatever progress the fragment made.
///
/// A fragment that is exactly one bare expression additionally yields
/// the value's textual form in `representation` (unless the value is
/// nil); every other fragment (including an empty one) is executed for
/// its effects only.
pub fn evaluate(code: &str, input_bindings: &Bindings) -> CellResult {
    let source_file = SourceFile::new("cell", code);
    let lex = Lexer::new(&source_file).lex();
    let mut errors = lex.errors;
    let parse = Parser::new(lex.tokens, &source_file).parse();
    errors.extend(parse.errors);

    if errors.has_errors() {
        return CellResult {
            stdout: String::new(),
            stderr: render_syntax_errors(&errors),
            representation: None,
            bindings: snapshot(input_bindings),
        };
    }
    let Some(program) = parse.program else {
        return CellResult {
            stdout: String::new(),
            stderr: String::new(),
            representation: None,
            bindings: snapshot(input_bindings),
        };
    };

    let mut evaluator = Evaluator::with_globals(snapshot(input_bindings));
    let guard = CaptureGuard::install();

    let representation = match program.as_single_expression() {
        Some(expr) => match evaluator.eval_expression(expr) {
            // A nil result is suppressed, so effect-only calls like
            // `print(...)` do not echo a value.
            Ok(Value::Nil) => None,
            Ok(value) => Some(value.repr_string()),
            Err(fault) => {
                output::write_stderr(&format!("{fault}\n"));
                None
            }
        },
        None => {
            if let Err(fault) = evaluator.run(&program) {
                output::write_stderr(&format!("{fault}\n"));
            }
            None
        }
    };

    let (stdout, stderr) = guard.finish();
    CellResult {
        stdout,
        stderr,
        representation,
        bindings: evaluator.into_globals(),
    }
}

/// One line per syntax error, in source order.
fn render_syntax_errors(errors: &SyntaxErrors) -> String {
    let mut out = String::new();
    for error in errors.iter() {
        out.push_str(&error.to_string());
        out.push('\n');
    }
    out
}
