//! Whitespace normalization applied when a [`Pattern`](super::ast::Pattern) is built.
//!
//! The parser hands over text fragments exactly as captured, including the
//! line breaks and indentation that precede block text and block
//! placeables. Indentation is relative to the pattern: the smallest indent of
//! any continuation line that carries content is removed from every
//! continuation line. The inline first line, after `=` or `]`, never counts.

use super::ast::PatternElement;

/// Merge, dedent and trim a raw element list.
pub(super) fn normalize(elements: Vec<PatternElement>) -> Vec<PatternElement> {
    let merged = merge_text(elements);
    let indent = common_indent(&merged);
    let mut result = strip_indent(merged, indent);
    trim_ends(&mut result);
    drop_empty_text(&mut result);
    result
}

/// Merge adjacent text and convert line endings, leaving whitespace alone.
pub(super) fn coalesce(elements: Vec<PatternElement>) -> Vec<PatternElement> {
    let mut result = merge_text(elements);
    drop_empty_text(&mut result);
    result
}

fn drop_empty_text(elements: &mut Vec<PatternElement>) {
    elements.retain(|element| !matches!(element, PatternElement::Text(text) if text.is_empty()));
}

/// Merge adjacent text elements and convert CRLF line endings to LF.
fn merge_text(elements: Vec<PatternElement>) -> Vec<PatternElement> {
    let mut result: Vec<PatternElement> = Vec::with_capacity(elements.len());

    for element in elements {
        match element {
            PatternElement::Text(text) => {
                if let Some(PatternElement::Text(prev)) = result.last_mut() {
                    prev.push_str(&text);
                } else {
                    result.push(PatternElement::Text(text));
                }
            }
            other @ PatternElement::Placeable(_) => result.push(other),
        }
    }

    for element in &mut result {
        if let PatternElement::Text(text) = element
            && text.contains('\r')
        {
            *text = text.replace("\r\n", "\n");
        }
    }

    result
}

/// A line of a text element, classified for indentation purposes.
struct Line<'a> {
    text: &'a str,
    /// The line begins at the start of a source line rather than after a
    /// placeable on the same line.
    starts_line: bool,
    /// The line contributes to the common indentation.
    significant: bool,
}

/// Split a text element into lines, tracking whether each one starts a
/// source line and whether its indentation counts.
fn lines<'a>(text: &'a str, at_line_start: bool, followed_by_placeable: bool) -> Vec<Line<'a>> {
    let count = text.split('\n').count();
    text.split('\n')
        .enumerate()
        .map(|(index, line)| {
            let starts_line = index > 0 || at_line_start;
            let blank = leading_spaces(line) == line.len();
            let last = index + 1 == count;
            Line {
                text: line,
                starts_line,
                significant: starts_line && (!blank || (last && followed_by_placeable)),
            }
        })
        .collect()
}

/// Smallest indentation of any significant line in the pattern.
fn common_indent(elements: &[PatternElement]) -> usize {
    let mut min: Option<usize> = None;
    let mut at_line_start = false;

    for (index, element) in elements.iter().enumerate() {
        match element {
            PatternElement::Text(text) => {
                let followed = index + 1 < elements.len();
                for line in lines(text, at_line_start, followed) {
                    if line.significant {
                        let indent = leading_spaces(line.text);
                        min = Some(min.map_or(indent, |m| m.min(indent)));
                    }
                }
                at_line_start = text.ends_with('\n');
            }
            PatternElement::Placeable(_) => {
                if at_line_start {
                    min = Some(0);
                }
                at_line_start = false;
            }
        }
    }

    min.unwrap_or(0)
}

/// Remove up to `indent` leading spaces from every line start.
fn strip_indent(elements: Vec<PatternElement>, indent: usize) -> Vec<PatternElement> {
    let count = elements.len();
    let mut at_line_start = false;
    let mut result = Vec::with_capacity(count);

    for (index, element) in elements.into_iter().enumerate() {
        match element {
            PatternElement::Text(text) => {
                let followed = index + 1 < count;
                let stripped: Vec<&str> = lines(&text, at_line_start, followed)
                    .into_iter()
                    .map(|line| {
                        if !line.starts_line {
                            line.text
                        } else if line.significant {
                            let own = leading_spaces(line.text);
                            &line.text[own.min(indent)..]
                        } else {
                            line.text.trim_start_matches(' ')
                        }
                    })
                    .collect();
                at_line_start = text.ends_with('\n');
                result.push(PatternElement::Text(stripped.join("\n")));
            }
            placeable @ PatternElement::Placeable(_) => {
                at_line_start = false;
                result.push(placeable);
            }
        }
    }

    result
}

/// Drop leading blank lines of the first element and trailing whitespace of
/// the last one. A trailing `\r` is left over from a CRLF that ended the
/// pattern.
fn trim_ends(elements: &mut [PatternElement]) {
    if let Some(PatternElement::Text(first)) = elements.first_mut() {
        let trimmed = strip_leading_blank_lines(first);
        if trimmed.len() != first.len() {
            *first = trimmed.to_string();
        }
    }
    if let Some(PatternElement::Text(last)) = elements.last_mut() {
        let trimmed = last.trim_end_matches([' ', '\r', '\n']);
        if trimmed.len() != last.len() {
            *last = trimmed.to_string();
        }
    }
}

fn strip_leading_blank_lines(text: &str) -> &str {
    let mut rest = text;
    while let Some(pos) = rest.find('\n') {
        if rest[..pos].chars().all(|c| c == ' ') {
            rest = &rest[pos + 1..];
        } else {
            break;
        }
    }
    rest
}

fn leading_spaces(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::{Expression, InlineExpression};

    fn text(s: &str) -> PatternElement {
        PatternElement::Text(s.to_string())
    }

    fn var(name: &str) -> PatternElement {
        PatternElement::Placeable(Expression::Inline(InlineExpression::VariableReference(
            name.to_string(),
        )))
    }

    #[test]
    fn merges_adjacent_text() {
        assert_eq!(normalize(vec![text("a"), text("b"), text("c")]), vec![text("abc")]);
    }

    #[test]
    fn block_text_keeps_relative_indent() {
        let result = normalize(vec![text("\n    Foo"), text("\n        Bar")]);
        assert_eq!(result, vec![text("Foo\n    Bar")]);
    }

    #[test]
    fn crlf_becomes_lf() {
        let result = normalize(vec![text("\r\n    Foo"), text("\r\n    Bar")]);
        assert_eq!(result, vec![text("Foo\nBar")]);
    }

    #[test]
    fn inline_first_line_is_excluded_from_indent() {
        let result = normalize(vec![text("Foo"), text("\n    Bar")]);
        assert_eq!(result, vec![text("Foo\nBar")]);

        let result = normalize(vec![text("Foo"), text("\n    Bar"), text("\n      Baz")]);
        assert_eq!(result, vec![text("Foo\nBar\n  Baz")]);
    }

    #[test]
    fn blank_lines_after_inline_start_are_kept() {
        let result = normalize(vec![text("a"), text("\n\n\n    b")]);
        assert_eq!(result, vec![text("a\n\n\nb")]);
    }

    #[test]
    fn blank_lines_inside_pattern_survive() {
        let result = normalize(vec![text("\n    Foo"), text("\n\n    Bar")]);
        assert_eq!(result, vec![text("Foo\n\nBar")]);
    }

    #[test]
    fn block_placeable_indent_counts() {
        let result = normalize(vec![text("\n    Foo"), text("\n    "), var("x"), text(" end  ")]);
        assert_eq!(result, vec![text("Foo\n"), var("x"), text(" end")]);
    }

    #[test]
    fn inline_placeable_first_line_is_excluded_from_indent() {
        let result = normalize(vec![var("x"), text("\n    Bar")]);
        assert_eq!(result, vec![var("x"), text("\nBar")]);
    }

    #[test]
    fn block_placeable_at_column_zero_pins_indent() {
        let result = normalize(vec![text("\n"), var("x"), text("\n    Bar")]);
        assert_eq!(result, vec![var("x"), text("\n    Bar")]);
    }

    #[test]
    fn leading_block_placeable_drops_blank_prefix() {
        let result = normalize(vec![text("\n    "), var("x"), text("\n    Bar")]);
        assert_eq!(result, vec![var("x"), text("\nBar")]);
    }

    #[test]
    fn text_after_placeable_on_same_line_is_untouched() {
        let result = normalize(vec![var("x"), text("   tail")]);
        assert_eq!(result, vec![var("x"), text("   tail")]);
    }

    #[test]
    fn coalescing_normalized_output_is_a_no_op() {
        let inputs = vec![
            vec![text("\n    Foo"), text("\n        Bar")],
            vec![text("\n    "), var("x"), text("\n    Bar\n")],
            vec![text("Foo "), var("x"), text("\n      Bar")],
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(coalesce(once.clone()), once);
        }
    }

    #[test]
    fn coalesce_keeps_whitespace() {
        let result = coalesce(vec![text("  a"), text("\r\n    b  "), text("")]);
        assert_eq!(result, vec![text("  a\n    b  ")]);
    }
}
