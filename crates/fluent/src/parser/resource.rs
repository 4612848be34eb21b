//! Resource (.ftl file) parser using winnow.
//!
//! A resource is a sequence of entries separated by blank lines. Any entry
//! that fails to parse is recovered as [`Junk`]: the failed text runs up to
//! the next line that could begin a new entry, and parsing resumes there.

use std::str::from_utf8;

use winnow::combinator::{alt, cut_err, eof, fail, opt, preceded, repeat, terminated};
use winnow::error::{StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::take_while;

use super::ast::*;
use super::chars::is_junk_boundary;
use super::error::{ParseError, calculate_position, describe};
use super::pattern::{
    blank, identifier, line_end, line_end_or_eof, message_reference, opt_blank_inline, pattern,
};

/// How the parser treats malformed entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// Recover malformed entries as [`Junk`] and keep going.
    #[default]
    Lenient,
    /// Stop at the first malformed entry and report it as
    /// [`ParseError::Syntax`].
    Strict,
}

/// Parse a complete `.ftl` resource.
///
/// A leading byte order mark is skipped. In [`ParseMode::Lenient`] this never
/// fails: malformed entries become [`Entry::Junk`].
///
/// # Example
///
/// ```
/// use fluent::parser::{Entry, ParseMode, parse};
///
/// let resource = parse("hello = Hello, { $name }!\n", ParseMode::Lenient).unwrap();
/// assert!(matches!(resource.body[0], Entry::Message(_)));
/// ```
pub fn parse(input: &str, mode: ParseMode) -> Result<Resource, ParseError> {
    let source = input.strip_prefix('\u{feff}').unwrap_or(input);
    let mut remaining = source;
    let mut body = Vec::new();

    loop {
        skip_blank_lines(&mut remaining);
        if remaining.is_empty() {
            break;
        }

        let start = remaining;
        match entry(&mut remaining) {
            Ok(entry) => body.push(entry),
            Err(err) => {
                let (line, column) = calculate_position(source, remaining);
                let message = describe(&err, "expected a message, term or comment");
                if mode == ParseMode::Strict {
                    return Err(ParseError::Syntax {
                        line,
                        column,
                        message,
                    });
                }
                remaining = start;
                let content = junk(&mut remaining);
                body.push(Entry::Junk(Junk {
                    content: content.to_string(),
                    annotations: vec![Annotation {
                        message,
                        line,
                        column,
                    }],
                }));
            }
        }
    }

    Ok(Resource { body })
}

/// Parse a resource from raw bytes.
///
/// Invalid UTF-8 is a fatal error rather than junk.
pub fn parse_bytes(input: &[u8], mode: ParseMode) -> Result<Resource, ParseError> {
    let text = from_utf8(input).map_err(|_| ParseError::InvalidUtf8)?;
    parse(text, mode)
}

/// Parse a bare pattern, such as the right-hand side of a message.
///
/// The whole input must be consumed.
pub fn parse_pattern(input: &str) -> Result<Pattern, ParseError> {
    parse_complete(input, pattern)
}

/// Parse a message reference of the form `id` or `id.attr`.
pub fn parse_message_reference(input: &str) -> Result<MessageReference, ParseError> {
    parse_complete(input, message_reference)
}

/// Run a single production over the whole input.
fn parse_complete<O>(
    input: &str,
    mut parser: impl FnMut(&mut &str) -> ModalResult<O>,
) -> Result<O, ParseError> {
    if input.is_empty() {
        return Err(ParseError::UnexpectedEof { line: 1, column: 1 });
    }
    let mut remaining = input;
    let result = terminated(|i: &mut &str| parser(i), eof).parse_next(&mut remaining);
    result.map_err(|err| {
        let (line, column) = calculate_position(input, remaining);
        ParseError::Syntax {
            line,
            column,
            message: describe(&err, "unexpected trailing input"),
        }
    })
}

/// Skip blank lines between entries, including trailing spaces at the end
/// of the input.
fn skip_blank_lines(input: &mut &str) {
    while let Some(rest) = blank_line(input) {
        *input = rest;
    }
    if input.chars().all(|c| c == ' ') {
        *input = "";
    }
}

fn blank_line(input: &str) -> Option<&str> {
    let rest = input.trim_start_matches(' ');
    rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'))
}

/// Consume junk: the current line and every following line that cannot
/// start an entry.
fn junk<'i>(input: &mut &'i str) -> &'i str {
    let start = *input;
    skip_line(input);
    while let Some(c) = input.chars().next() {
        if is_junk_boundary(c) {
            break;
        }
        skip_line(input);
    }
    &start[..start.len() - input.len()]
}

fn skip_line(input: &mut &str) {
    *input = input.find('\n').map_or("", |pos| &input[pos + 1..]);
}

/// Parse one entry.
///
/// Comments are tried before messages so that a message comment can be
/// attached to the entry that follows it.
fn entry(input: &mut &str) -> ModalResult<Entry> {
    alt((
        comment_block(CommentLevel::Resource).map(Entry::Comment),
        comment_block(CommentLevel::Group).map(Entry::Comment),
        commented_entry,
        term.map(Entry::Term),
        message.map(Entry::Message),
    ))
    .parse_next(input)
}

/// Parse a message comment and attach it to a directly following message or
/// term. If nothing valid follows, the comment stands alone.
fn commented_entry(input: &mut &str) -> ModalResult<Entry> {
    let comment = comment_block(CommentLevel::Message).parse_next(input)?;
    let after_comment = *input;

    if let Ok(mut term) = term.parse_next(input) {
        term.comment = Some(comment);
        return Ok(Entry::Term(term));
    }
    *input = after_comment;

    if let Ok(mut message) = message.parse_next(input) {
        message.comment = Some(comment);
        return Ok(Entry::Message(message));
    }
    *input = after_comment;

    Ok(Entry::Comment(comment))
}

/// Parse consecutive comment lines of one level.
fn comment_block<'i>(level: CommentLevel) -> impl FnMut(&mut &'i str) -> ModalResult<Comment> {
    move |input: &mut &'i str| {
        let lines: Vec<String> = repeat(1.., comment_line(level.marker())).parse_next(input)?;
        Ok(Comment { level, lines })
    }
}

/// Parse one comment line with the given marker.
///
/// The marker must be followed by a space or the end of the line, so a `#`
/// line never matches a `##` line.
fn comment_line<'i>(mut marker: &'static str) -> impl FnMut(&mut &'i str) -> ModalResult<String> {
    move |input: &mut &'i str| {
        marker.parse_next(input)?;
        let content = opt(preceded(' ', take_while(0.., |c: char| c != '\n')))
            .parse_next(input)?
            .unwrap_or_default();
        line_end_or_eof(input)?;
        Ok(content.strip_suffix('\r').unwrap_or(content).to_string())
    }
}

/// Parse a message: `id = pattern` followed by attributes.
fn message(input: &mut &str) -> ModalResult<Message> {
    let id = identifier(input)?;
    opt_blank_inline(input)?;
    '='.parse_next(input)?;
    opt_blank_inline(input)?;
    let value = opt(pattern).parse_next(input)?;
    let attributes: Vec<Attribute> = repeat(0.., attribute).parse_next(input)?;

    if value.is_none() && attributes.is_empty() {
        return cut_err(fail)
            .context(StrContext::Label("message"))
            .context(StrContext::Expected(StrContextValue::Description(
                "a value or at least one attribute",
            )))
            .parse_next(input);
    }

    entry_end(input)?;
    Ok(Message::new(id, value, attributes, None))
}

/// Parse a term: `-id = pattern` followed by attributes. The value is
/// required.
fn term(input: &mut &str) -> ModalResult<Term> {
    '-'.parse_next(input)?;
    let id = identifier(input)?;
    opt_blank_inline(input)?;
    '='.parse_next(input)?;
    opt_blank_inline(input)?;
    let value = cut_err(pattern)
        .context(StrContext::Label("term"))
        .context(StrContext::Expected(StrContextValue::Description("a value")))
        .parse_next(input)?;
    let attributes: Vec<Attribute> = repeat(0.., attribute).parse_next(input)?;
    entry_end(input)?;
    Ok(Term::new(id, value, attributes, None))
}

/// Parse an attribute on its own line: `.id = pattern`.
fn attribute(input: &mut &str) -> ModalResult<Attribute> {
    line_end(input)?;
    blank(input)?;
    '.'.parse_next(input)?;
    cut_err((identifier, opt_blank_inline, '=', opt_blank_inline, pattern))
        .context(StrContext::Label("attribute"))
        .map(|(id, _, _, _, value)| Attribute {
            id: id.to_string(),
            value,
        })
        .parse_next(input)
}

/// An entry ends at a line break or at the end of the input.
fn entry_end(input: &mut &str) -> ModalResult<()> {
    line_end_or_eof
        .void()
        .context(StrContext::Expected(StrContextValue::Description(
            "end of line",
        )))
        .parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn junk_stops_at_entry_start() {
        let mut input = "}}} broken\n  more\n\nnext = x\n";
        let content = junk(&mut input);
        assert_eq!(content, "}}} broken\n  more\n\n");
        assert_eq!(input, "next = x\n");
    }

    #[test]
    fn blank_lines_are_skipped() {
        let mut input = "  \n\r\n\nkey = v";
        skip_blank_lines(&mut input);
        assert_eq!(input, "key = v");

        let mut input = "\n   ";
        skip_blank_lines(&mut input);
        assert_eq!(input, "");
    }

    #[test]
    fn comment_line_markers_are_exact() {
        let mut input = "## group\n";
        assert!(comment_line("#").parse_next(&mut input).is_err());

        let mut input = "#\n";
        assert_eq!(comment_line("#").parse_next(&mut input).ok(), Some(String::new()));

        let mut input = "# text\r\n";
        assert_eq!(
            comment_line("#").parse_next(&mut input).ok(),
            Some("text".to_string())
        );
    }
}
