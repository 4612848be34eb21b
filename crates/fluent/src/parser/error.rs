//! Parse error types for Fluent resources.

use thiserror::Error;
use winnow::error::{ContextError, ErrMode};

/// An error that occurred during parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A syntax error with location information.
    #[error("syntax error at {line}:{column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    /// Unexpected end of input.
    #[error("unexpected end of input at {line}:{column}")]
    UnexpectedEof { line: usize, column: usize },

    /// Invalid UTF-8 in input.
    #[error("invalid UTF-8 in input")]
    InvalidUtf8,
}

/// Calculate the 1-based line and column of `remaining` within `original`.
///
/// Columns count characters, not bytes.
pub(crate) fn calculate_position(original: &str, remaining: &str) -> (usize, usize) {
    let consumed = &original[..original.len() - remaining.len()];
    let line = consumed.matches('\n').count() + 1;
    let line_start = consumed.rfind('\n').map_or(0, |pos| pos + 1);
    let column = consumed[line_start..].chars().count() + 1;
    (line, column)
}

/// Render a winnow error as a single-line message.
pub(crate) fn describe(error: &ErrMode<ContextError>, fallback: &str) -> String {
    let message = match error {
        ErrMode::Backtrack(inner) | ErrMode::Cut(inner) => inner.to_string(),
        ErrMode::Incomplete(_) => String::new(),
    };
    let message = message
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("; ");
    if message.is_empty() {
        fallback.to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_counts_lines_and_chars() {
        let source = "one\ntwö = x\n";
        assert_eq!(calculate_position(source, source), (1, 1));
        assert_eq!(calculate_position(source, &source[4..]), (2, 1));
        let after_umlaut = source.find(" =").expect("separator");
        assert_eq!(calculate_position(source, &source[after_umlaut..]), (2, 4));
    }
}
