use crate::Span;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of syntax errors reported before fail-fast.
pub const MAX_ERRORS: usize = 20;

/// A structured syntax error from the lexer or parser.
///
/// The kernel never surfaces these as a raised fault: they are rendered
/// line-by-line into the error channel of the evaluation result.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{span}: syntax error: {message}")]
pub struct SyntaxError {
    /// Source label (usually `<cell>`).
    pub file: String,
    /// Human-readable error message.
    pub message: String,
    /// Source location.
    pub span: Span,
    /// The exact source line for context.
    pub source_line: String,
    /// Optional fix suggestion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl SyntaxError {
    /// Create a new syntax error.
    pub fn new(
        file: impl Into<String>,
        message: impl Into<String>,
        span: Span,
        source_line: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            message: message.into(),
            span,
            source_line: source_line.into(),
            suggestion: None,
        }
    }

    /// Attach a fix suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Collected syntax errors from one lex/parse pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyntaxErrors {
    pub errors: Vec<SyntaxError>,
}

impl SyntaxErrors {
    /// Create an empty collection.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Append an error.
    pub fn push(&mut self, error: SyntaxError) {
        self.errors.push(error);
    }

    /// Append every error from another collection.
    pub fn extend(&mut self, other: SyntaxErrors) {
        self.errors.extend(other.errors);
    }

    /// Returns `true` if any error was collected.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Number of collected errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns `true` if no error was collected.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Iterate over the collected errors.
    pub fn iter(&self) -> impl Iterator<Item = &SyntaxError> {
        self.errors.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SyntaxError::new("<cell>", "unexpected character '@'", Span::point(1, 3), "1 @ 2");
        assert_eq!(err.to_string(), "1:3: syntax error: unexpected character '@'");
    }

    #[test]
    fn test_suggestion_attach() {
        let err = SyntaxError::new("<cell>", "unexpected character '!'", Span::point(1, 1), "!x")
            .with_suggestion("use 'not' for boolean negation");
        assert_eq!(
            err.suggestion.as_deref(),
            Some("use 'not' for boolean negation")
        );
    }

    #[test]
    fn test_collection() {
        let mut errors = SyntaxErrors::empty();
        assert!(!errors.has_errors());
        errors.push(SyntaxError::new("<cell>", "boom", Span::point(1, 1), ""));
        assert!(errors.has_errors());
        assert_eq!(errors.len(), 1);
    }
}
