//! Interactive Quire shell.
//!
//! Each submission is one cell: it is evaluated against the bindings
//! produced by the previous submission, and its captured output,
//! representation, and faults are printed. With a file argument the
//! whole file is evaluated as a single cell instead.

use std::fs;
use std::process::ExitCode;

use quire_eval::Bindings;
use quire_kernel::{evaluate, CellResult, Notebook};
use rustyline::{error::ReadlineError, history::MemHistory, Config, Editor};

const PROMPT: &str = ">> ";
const CONTINUATION_PROMPT: &str = ".. ";

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    match args.get(1) {
        Some(path) => run_script(path),
        None => {
            repl();
            ExitCode::SUCCESS
        }
    }
}

/// Evaluate a whole file as one cell.
fn run_script(path: &str) -> ExitCode {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("{path}: {err}");
            return ExitCode::FAILURE;
        }
    };
    let result = evaluate(&source, &Bindings::new());
    print!("{}", result.stdout);
    eprint!("{}", result.stderr);
    if result.stderr.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn repl() {
    let mut rl = Editor::<(), MemHistory>::with_history(Config::default(), MemHistory::new())
        .expect("failed to init rustyline");
    let mut notebook = Notebook::new();

    loop {
        let code = match read_cell(&mut rl) {
            Some(code) => code,
            None => break,
        };
        if code.trim().is_empty() {
            continue;
        }
        if let Err(e) = rl.add_history_entry(&code) {
            eprintln!("History error: {e}");
        }

        let index = notebook.push_cell(code);
        if let Some(result) = notebook.submit(index) {
            print_result(result);
        }
    }
}

/// Read one cell, prompting for continuation lines while braces are
/// open. Returns `None` on end of input or interrupt.
fn read_cell(rl: &mut Editor<(), MemHistory>) -> Option<String> {
    let mut cell = String::new();
    loop {
        let prompt = if cell.is_empty() {
            PROMPT
        } else {
            CONTINUATION_PROMPT
        };
        match rl.readline(prompt) {
            Ok(line) => {
                cell.push_str(&line);
                cell.push('\n');
                if open_braces(&cell) == 0 {
                    return Some(cell);
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                return None;
            }
            Err(ReadlineError::Eof) => return None,
            Err(err) => {
                println!("I/O Error: {err:?}");
                return None;
            }
        }
    }
}

fn print_result(result: &CellResult) {
    print!("{}", result.stdout);
    eprint!("{}", result.stderr);
    if let Some(repr) = &result.representation {
        println!("{repr}");
    }
}

/// Count unclosed braces, ignoring braces inside strings and comments.
/// Never negative: extra closers count as zero so a malformed line is
/// submitted (and rejected by the parser) instead of trapping the user
/// in continuation mode.
fn open_braces(source: &str) -> usize {
    let mut depth: usize = 0;
    let mut chars = source.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            '"' => {
                // Skip the string body, honoring escapes.
                while let Some(ch) = chars.next() {
                    match ch {
                        '\\' => {
                            chars.next();
                        }
                        '"' | '\n' => break,
                        _ => {}
                    }
                }
            }
            '/' if chars.peek() == Some(&'/') => {
                for ch in chars.by_ref() {
                    if ch == '\n' {
                        break;
                    }
                }
            }
            _ => {}
        }
    }
    depth
}

#[cfg(test)]
mod tests {
    use super::open_braces;

    #[test]
    fn test_balanced_line_is_complete() {
        assert_eq!(open_braces("x = 1\n"), 0);
        assert_eq!(open_braces("if x { y = 1 }\n"), 0);
    }

    #[test]
    fn test_open_block_continues() {
        assert_eq!(open_braces("if x {\n"), 1);
        assert_eq!(open_braces("fn f() {\n  if x {\n"), 2);
    }

    #[test]
    fn test_braces_in_strings_are_ignored() {
        assert_eq!(open_braces("s = \"{\"\n"), 0);
        assert_eq!(open_braces("s = \"\\\"{\"\n"), 0);
    }

    #[test]
    fn test_braces_in_comments_are_ignored() {
        assert_eq!(open_braces("x = 1 // {\n"), 0);
    }

    #[test]
    fn test_extra_closers_do_not_go_negative() {
        assert_eq!(open_braces("}\n{\n"), 1);
    }
}
