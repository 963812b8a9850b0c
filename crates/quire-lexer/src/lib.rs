//! Quire lexer: converts source text into a token stream.

pub mod token;
mod lexer;

pub use lexer::{LexResult, Lexer};
pub use token::{Token, TokenKind};
