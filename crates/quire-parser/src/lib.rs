//! Quire parser: converts a token stream into a statement-list AST.

mod parse_expr;
mod parse_stmt;
mod parser;

pub use parser::{ParseResult, Parser};
