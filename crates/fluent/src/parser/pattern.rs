//! Pattern and expression grammar using winnow.
//!
//! Handles:
//! - Inline text and indented block text
//! - Inline and block placeables, with nested placeables flattened
//! - String, number, variable, message and term expressions
//! - Select expressions with their variant lists
//!
//! Alternatives are tried in a fixed order because several productions share
//! a prefix: block constructs start with the same whitespace as inline text,
//! and a leading `-` is a negative number only when a digit follows.
//!
//! Placeables and select expressions recurse into each other, so every
//! production on that cycle carries its nesting depth. Nesting past
//! [`MAX_NESTING`] is a syntax error.

use winnow::ascii::digit1;
use winnow::combinator::{alt, cut_err, delimited, eof, fail, opt, preceded, repeat};
use winnow::error::{StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{any, one_of, take_while};

use super::ast::*;
use super::chars::{
    is_blank_inline, is_identifier_char, is_identifier_start, is_indented_char, is_text_char,
};

/// Parse one or more spaces.
pub(super) fn blank_inline<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., is_blank_inline).parse_next(input)
}

/// Parse zero or more spaces.
pub(super) fn opt_blank_inline<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(0.., is_blank_inline).parse_next(input)
}

/// Parse a line break: `\n` or `\r\n`.
pub(super) fn line_end<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    alt(("\r\n", "\n")).parse_next(input)
}

/// Parse a line break or the end of input.
pub(super) fn line_end_or_eof<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    alt((line_end, eof)).parse_next(input)
}

/// Parse one or more lines that hold nothing but spaces.
pub(super) fn blank_block<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    repeat::<_, _, (), _, _>(1.., (opt_blank_inline, line_end))
        .take()
        .parse_next(input)
}

/// Parse any mix of spaces and line breaks.
pub(super) fn blank<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    repeat::<_, _, (), _, _>(0.., alt((blank_inline, line_end)))
        .take()
        .parse_next(input)
}

/// Parse an identifier: `[A-Za-z_][A-Za-z0-9_-]*`.
pub(super) fn identifier<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (one_of(is_identifier_start), take_while(0.., is_identifier_char))
        .take()
        .parse_next(input)
}

/// Deepest placeable nesting accepted inside one pattern.
pub const MAX_NESTING: usize = 32;

/// Parse a top-level pattern: one or more pattern elements.
pub(super) fn pattern(input: &mut &str) -> ModalResult<Pattern> {
    nested_pattern(input, 0)
}

fn nested_pattern(input: &mut &str, depth: usize) -> ModalResult<Pattern> {
    let chunks: Vec<Vec<PatternElement>> =
        repeat(1.., |i: &mut &str| pattern_element(i, depth)).parse_next(input)?;
    Ok(Pattern::from_source(chunks.into_iter().flatten().collect()))
}

/// Parse a single pattern element.
///
/// Block constructs come first since they begin with the same whitespace
/// that would otherwise end the pattern.
fn pattern_element(input: &mut &str, depth: usize) -> ModalResult<Vec<PatternElement>> {
    alt((
        block_text.map(|text| vec![PatternElement::Text(text.to_string())]),
        |i: &mut &str| block_placeable(i, depth),
        (|i: &mut &str| placeable(i, depth))
            .map(|expression| vec![PatternElement::Placeable(expression)]),
        inline_text.map(|text| vec![PatternElement::Text(text.to_string())]),
    ))
    .parse_next(input)
}

/// Parse a run of text characters.
fn inline_text<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., is_text_char).parse_next(input)
}

/// Parse an indented continuation line.
///
/// The captured text keeps the line breaks and indentation so that the
/// pattern can compute its common indentation later.
fn block_text<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        blank_block,
        blank_inline,
        one_of(is_indented_char),
        take_while(0.., is_text_char),
    )
        .take()
        .parse_next(input)
}

/// Parse a placeable that starts its own line.
///
/// The preceding line breaks and indentation are kept as a text element.
fn block_placeable(input: &mut &str, depth: usize) -> ModalResult<Vec<PatternElement>> {
    let prefix = (blank_block, opt_blank_inline).take().parse_next(input)?;
    let expression = placeable(input, depth)?;
    Ok(vec![
        PatternElement::Text(prefix.to_string()),
        PatternElement::Placeable(expression),
    ])
}

/// Parse a placeable `{ expression }` sitting `depth` placeables deep.
fn placeable(input: &mut &str, depth: usize) -> ModalResult<Expression> {
    '{'.parse_next(input)?;
    if depth >= MAX_NESTING {
        return cut_err(fail)
            .context(StrContext::Label("placeable"))
            .context(StrContext::Expected(StrContextValue::Description(
                "less deeply nested placeables",
            )))
            .parse_next(input);
    }
    cut_err(delimited(
        blank,
        |i: &mut &str| placeable_expression(i, depth + 1),
        (blank, '}'),
    ))
    .context(StrContext::Label("placeable"))
    .context(StrContext::Expected(StrContextValue::CharLiteral('}')))
    .parse_next(input)
}

/// Parse the contents of a placeable. Nested placeables are flattened.
fn placeable_expression(input: &mut &str, depth: usize) -> ModalResult<Expression> {
    alt((
        (|i: &mut &str| select_expression(i, depth)).map(Expression::Select),
        inline_expression.map(Expression::Inline),
        |i: &mut &str| placeable(i, depth),
    ))
    .parse_next(input)
}

/// Parse an inline expression.
///
/// The order matters: a `"` always starts a string literal, and a `-` is
/// tried as a number before it is tried as a term reference.
pub(super) fn inline_expression(input: &mut &str) -> ModalResult<InlineExpression> {
    alt((
        string_literal.map(InlineExpression::StringLiteral),
        number_literal.map(InlineExpression::NumberLiteral),
        message_reference.map(InlineExpression::MessageReference),
        term_reference.map(InlineExpression::TermReference),
        variable_reference.map(InlineExpression::VariableReference),
    ))
    .parse_next(input)
}

/// Parse a string literal, applying escape sequences.
fn string_literal(input: &mut &str) -> ModalResult<String> {
    '"'.parse_next(input)?;
    let mut value = String::new();
    loop {
        let c = cut_err(any)
            .context(StrContext::Expected(StrContextValue::CharLiteral('"')))
            .parse_next(input)?;
        match c {
            '"' => return Ok(value),
            '\\' => value.push(cut_err(escape_sequence).parse_next(input)?),
            '\n' => {
                return cut_err(fail)
                    .context(StrContext::Label("string literal"))
                    .context(StrContext::Expected(StrContextValue::Description(
                        "closing quote before the end of the line",
                    )))
                    .parse_next(input);
            }
            other => value.push(other),
        }
    }
}

/// Parse the part of an escape sequence after the backslash.
fn escape_sequence(input: &mut &str) -> ModalResult<char> {
    alt((
        one_of(['"', '\\']),
        preceded('u', take_while(4, |c: char| c.is_ascii_hexdigit())).verify_map(code_point),
        preceded('U', take_while(6, |c: char| c.is_ascii_hexdigit())).verify_map(code_point),
    ))
    .context(StrContext::Label("escape sequence"))
    .parse_next(input)
}

/// Convert hex digits to a character, rejecting surrogates and
/// out-of-range values.
fn code_point(hex: &str) -> Option<char> {
    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}

/// Parse a number literal: `-?digits(.digits)?`.
///
/// A `-` that is not followed by a digit fails here so that the input can be
/// retried as a term reference.
pub(super) fn number_literal(input: &mut &str) -> ModalResult<NumberLiteral> {
    (opt('-'), digit1, opt(('.', digit1)))
        .take()
        .map(NumberLiteral::new)
        .parse_next(input)
}

/// Parse `.attribute` following a message or term identifier.
fn attribute_accessor<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    preceded('.', identifier).parse_next(input)
}

/// Parse a message reference: `id` or `id.attr`.
pub(super) fn message_reference(input: &mut &str) -> ModalResult<MessageReference> {
    (identifier, opt(attribute_accessor))
        .map(|(id, attribute)| MessageReference {
            id: id.to_string(),
            attribute: attribute.map(ToString::to_string),
        })
        .parse_next(input)
}

/// Parse a term reference: `-id` or `-id.attr`.
fn term_reference(input: &mut &str) -> ModalResult<TermReference> {
    preceded('-', (identifier, opt(attribute_accessor)))
        .map(|(id, attribute)| TermReference {
            id: id.to_string(),
            attribute: attribute.map(ToString::to_string),
        })
        .parse_next(input)
}

/// Parse a variable reference: `$name`.
fn variable_reference(input: &mut &str) -> ModalResult<String> {
    preceded(
        '$',
        cut_err(identifier).context(StrContext::Label("variable name")),
    )
    .map(ToString::to_string)
    .parse_next(input)
}

/// Parse a select expression: `selector -> variants`.
///
/// Fails without consuming input when no `->` follows the selector, so the
/// placeable can be retried as a plain inline expression.
fn select_expression(input: &mut &str, depth: usize) -> ModalResult<SelectExpression> {
    let selector = inline_expression(input)?;
    blank(input)?;
    "->".parse_next(input)?;
    opt_blank_inline(input)?;

    let variants = cut_err(
        repeat::<_, _, Vec<(bool, Variant)>, _, _>(0.., |i: &mut &str| variant(i, depth)).verify(
            |variants: &Vec<(bool, Variant)>| {
                variants.iter().filter(|(default, _)| *default).count() == 1
            },
        ),
    )
    .context(StrContext::Label("variant list"))
    .context(StrContext::Expected(StrContextValue::Description(
        "exactly one default variant",
    )))
    .parse_next(input)?;

    cut_err(line_end)
        .context(StrContext::Expected(StrContextValue::Description(
            "line break after the last variant",
        )))
        .parse_next(input)?;

    let default_index = variants
        .iter()
        .position(|(default, _)| *default)
        .unwrap_or_default();
    Ok(SelectExpression {
        selector,
        variants: variants.into_iter().map(|(_, variant)| variant).collect(),
        default_index,
    })
}

/// Parse a variant on its own line: `[key] pattern` or `*[key] pattern`.
///
/// Returns whether the variant is the default one.
fn variant(input: &mut &str, depth: usize) -> ModalResult<(bool, Variant)> {
    line_end(input)?;
    blank(input)?;
    let default = opt('*').parse_next(input)?.is_some();
    let key = variant_key(input)?;
    opt_blank_inline(input)?;
    let value = cut_err(|i: &mut &str| nested_pattern(i, depth))
        .context(StrContext::Label("variant value"))
        .parse_next(input)?;
    Ok((default, Variant { key, value }))
}

/// Parse a variant key: `[one]` or `[0]`.
fn variant_key(input: &mut &str) -> ModalResult<VariantKey> {
    preceded(
        '[',
        cut_err(delimited(
            blank,
            alt((
                number_literal.map(VariantKey::Number),
                identifier.map(|name| VariantKey::Identifier(name.to_string())),
            )),
            (blank, ']'),
        ))
        .context(StrContext::Label("variant key")),
    )
    .parse_next(input)
}

#[cfg(test)]
mod tests {
    use winnow::error::ErrMode;

    use super::*;

    fn parse_ok<O>(
        mut parser: impl FnMut(&mut &str) -> ModalResult<O>,
        source: &str,
    ) -> (O, String) {
        let mut input = source;
        let output = parser(&mut input).expect("parser should succeed");
        (output, input.to_string())
    }

    #[test]
    fn number_literal_takes_precedence_over_term() {
        let (expression, rest) = parse_ok(inline_expression, "-5 }");
        assert_eq!(
            expression,
            InlineExpression::NumberLiteral(NumberLiteral::new("-5"))
        );
        assert_eq!(rest, " }");

        let (expression, _) = parse_ok(inline_expression, "-brand");
        assert_eq!(
            expression,
            InlineExpression::TermReference(TermReference {
                id: "brand".to_string(),
                attribute: None,
            })
        );
    }

    #[test]
    fn string_literal_escapes() {
        let (value, _) = parse_ok(string_literal, r#""a\"b\\cA\U01F602""#);
        assert_eq!(value, "a\"b\\cA\u{1F602}");
    }

    #[test]
    fn string_literal_rejects_newline() {
        let mut input = "\"abc\ndef\"";
        assert!(string_literal(&mut input).is_err());
    }

    #[test]
    fn block_text_requires_indent() {
        let mut input = "\nFoo";
        assert!(block_text(&mut input).is_err());

        let mut input = "\n\n    Foo bar\nnext";
        let text = block_text(&mut input).expect("indented line");
        assert_eq!(text, "\n\n    Foo bar");
        assert_eq!(input, "\nnext");
    }

    #[test]
    fn block_text_rejects_reserved_chars() {
        for source in ["\n    [one] x", "\n    *[other] x", "\n    .attr = x"] {
            let mut input = source;
            assert!(block_text(&mut input).is_err(), "{source:?}");
        }
    }

    #[test]
    fn identifiers_allow_dash_and_underscore() {
        let mut input = "login-button_2.attr";
        let id = identifier(&mut input).expect("identifier");
        assert_eq!(id, "login-button_2");
        assert_eq!(input, ".attr");
    }

    #[test]
    fn nesting_limit_is_a_cut_error() {
        let at_limit = format!("{}$x{}", "{".repeat(MAX_NESTING), "}".repeat(MAX_NESTING));
        let (parsed, rest) = parse_ok(pattern, &at_limit);
        assert_eq!(parsed.elements().len(), 1);
        assert!(rest.is_empty());

        let past = format!("{}$x{}", "{".repeat(MAX_NESTING + 1), "}".repeat(MAX_NESTING + 1));
        let mut input = past.as_str();
        assert!(matches!(pattern(&mut input), Err(ErrMode::Cut(_))));
    }
}
