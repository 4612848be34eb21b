//! Miette diagnostics for Fluent parse failures.
//!
//! miette's derive reads the fields in generated code that rustc cannot
//! track, hence the `unused_assignments` expectation.
#![expect(unused_assignments)]

use std::path::Path;

use fluent::parser::{Junk, ParseError};
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// A parse failure located in its source file.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(ftl::syntax))]
pub struct FtlDiagnostic {
    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: SourceSpan,

    message: String,

    #[help]
    help: Option<String>,
}

impl FtlDiagnostic {
    /// Diagnostic for a fatal error from a strict parse.
    pub fn from_parse_error(path: &Path, content: &str, err: &ParseError) -> Self {
        let (line, column, message) = match err {
            ParseError::Syntax {
                line,
                column,
                message,
            } => (*line, *column, message.clone()),
            ParseError::UnexpectedEof { line, column } => {
                (*line, *column, "unexpected end of file".to_string())
            }
            ParseError::InvalidUtf8 => (1, 1, "invalid UTF-8".to_string()),
        };
        Self::at(path, content, line, column, message, None)
    }

    /// Diagnostic for an entry the lenient parser skipped.
    pub fn from_junk(path: &Path, content: &str, junk: &Junk) -> Self {
        let (line, column, detail) = junk.annotations.first().map_or_else(
            || (1, 1, String::from("malformed entry")),
            |annotation| (annotation.line, annotation.column, annotation.message.clone()),
        );
        Self::at(
            path,
            content,
            line,
            column,
            format!("malformed entry: {detail}"),
            Some("the whole entry is ignored; fix it or load with --strict to fail early".into()),
        )
    }

    fn at(
        path: &Path,
        content: &str,
        line: usize,
        column: usize,
        message: String,
        help: Option<String>,
    ) -> Self {
        Self {
            src: NamedSource::new(path.display().to_string(), content.to_string()),
            span: (byte_offset(content, line, column), 1).into(),
            message,
            help,
        }
    }
}

/// Convert a 1-based line and character column to a byte offset, clamped to
/// the content length.
fn byte_offset(content: &str, line: usize, column: usize) -> usize {
    let line_start: usize = content
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    let line_start = line_start.min(content.len());
    let within = content[line_start..]
        .char_indices()
        .nth(column.saturating_sub(1))
        .map_or(content.len() - line_start, |(offset, _)| offset);
    line_start + within
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_count_characters() {
        let content = "a = ü\nbroken = {\n";
        assert_eq!(byte_offset(content, 1, 1), 0);
        assert_eq!(byte_offset(content, 2, 1), 7);
        assert_eq!(byte_offset(content, 2, 10), 16);
        assert_eq!(byte_offset(content, 9, 9), content.len());
    }
}
