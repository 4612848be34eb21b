//! Character classes of the Fluent grammar.

/// Any character that may appear in inline text: everything except `{`,
/// `}` and line breaks.
pub fn is_text_char(c: char) -> bool {
    !matches!(c, '{' | '}' | '\n')
}

/// A text character that may begin an indented continuation line.
///
/// `[`, `*` and `.` are reserved because such lines start variants, default
/// variants and attributes.
pub fn is_indented_char(c: char) -> bool {
    is_text_char(c) && !matches!(c, '[' | '*' | '.')
}

/// Inline whitespace. Tabs are not blank in Fluent.
pub fn is_blank_inline(c: char) -> bool {
    c == ' '
}

/// First character of an identifier.
pub fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Subsequent characters of an identifier.
pub fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// A line beginning with this character may start a new entry, so junk
/// stops in front of it.
pub fn is_junk_boundary(c: char) -> bool {
    c == '#' || c == '-' || c.is_ascii_alphabetic()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_chars_exclude_braces_and_newline() {
        assert!(is_text_char('a'));
        assert!(is_text_char('\r'));
        assert!(is_text_char('['));
        assert!(!is_text_char('{'));
        assert!(!is_text_char('}'));
        assert!(!is_text_char('\n'));
    }

    #[test]
    fn indented_chars_exclude_markers() {
        assert!(is_indented_char('F'));
        assert!(!is_indented_char('['));
        assert!(!is_indented_char('*'));
        assert!(!is_indented_char('.'));
    }

    #[test]
    fn identifiers() {
        assert!(is_identifier_start('_'));
        assert!(!is_identifier_start('-'));
        assert!(!is_identifier_start('1'));
        assert!(is_identifier_char('-'));
        assert!(is_identifier_char('9'));
        assert!(!is_identifier_char('.'));
    }

    #[test]
    fn junk_boundaries() {
        assert!(is_junk_boundary('#'));
        assert!(is_junk_boundary('-'));
        assert!(is_junk_boundary('k'));
        assert!(!is_junk_boundary(' '));
        assert!(!is_junk_boundary('}'));
        assert!(!is_junk_boundary('_'));
    }
}
