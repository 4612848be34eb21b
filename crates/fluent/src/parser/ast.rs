//! Public AST types for Fluent resources.
//!
//! These types are public to enable external tooling (linters, formatters, etc.).
//! A [`Resource`] is produced once by the parser and is immutable afterwards.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use fixed_decimal::Decimal;

use super::indent::{coalesce, normalize};

/// A parsed `.ftl` file: an ordered list of entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resource {
    pub body: Vec<Entry>,
}

impl Resource {
    /// Iterate over the messages of this resource, in source order.
    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.body.iter().filter_map(|entry| match entry {
            Entry::Message(message) => Some(message),
            Entry::Term(_) | Entry::Comment(_) | Entry::Junk(_) => None,
        })
    }

    /// Iterate over the terms of this resource, in source order.
    pub fn terms(&self) -> impl Iterator<Item = &Term> {
        self.body.iter().filter_map(|entry| match entry {
            Entry::Term(term) => Some(term),
            Entry::Message(_) | Entry::Comment(_) | Entry::Junk(_) => None,
        })
    }

    /// Iterate over the junk entries of this resource.
    pub fn junk(&self) -> impl Iterator<Item = &Junk> {
        self.body.iter().filter_map(|entry| match entry {
            Entry::Junk(junk) => Some(junk),
            Entry::Message(_) | Entry::Term(_) | Entry::Comment(_) => None,
        })
    }
}

/// A top-level unit of a resource.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Message(Message),
    Term(Term),
    Comment(Comment),
    Junk(Junk),
}

/// How many `#` characters introduced a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentLevel {
    /// `#`: attaches to the message or term that follows it.
    Message,
    /// `##`: a section heading.
    Group,
    /// `###`: describes the whole resource.
    Resource,
}

impl CommentLevel {
    /// The marker that starts each line of a comment at this level.
    pub fn marker(self) -> &'static str {
        match self {
            CommentLevel::Message => "#",
            CommentLevel::Group => "##",
            CommentLevel::Resource => "###",
        }
    }
}

/// A comment block, one string per source line without the `#` prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub level: CommentLevel,
    pub lines: Vec<String>,
}

impl Comment {
    /// The comment text with lines joined by `\n`.
    pub fn content(&self) -> String {
        self.lines.join("\n")
    }
}

/// Unparseable source text kept in place of a malformed entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Junk {
    /// The raw text of the malformed entry, including its trailing newline.
    pub content: String,
    /// Why the entry failed to parse.
    pub annotations: Vec<Annotation>,
}

/// A parse failure recorded on a [`Junk`] entry.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Annotation {
    pub message: String,
    /// 1-based line of the failure in the source resource.
    pub line: usize,
    /// 1-based column of the failure in the source resource.
    pub column: usize,
}

/// A named, user-facing localizable string.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: String,
    /// `None` when the message only has attributes.
    pub value: Option<Pattern>,
    pub attributes: Vec<Attribute>,
    pub comment: Option<Comment>,
}

impl Message {
    /// Build a message, resolving duplicate attributes (the last one wins).
    pub fn new(
        id: impl Into<String>,
        value: Option<Pattern>,
        attributes: Vec<Attribute>,
        comment: Option<Comment>,
    ) -> Self {
        Self {
            id: id.into(),
            value,
            attributes: dedup_attributes(attributes),
            comment,
        }
    }

    /// Look up an attribute by name.
    pub fn attribute(&self, id: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attr| attr.id == id)
    }
}

/// An internal message, referenced from other entries as `-id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    /// Identifier without the leading `-`.
    pub id: String,
    pub value: Pattern,
    pub attributes: Vec<Attribute>,
    pub comment: Option<Comment>,
}

impl Term {
    /// Build a term, resolving duplicate attributes (the last one wins).
    pub fn new(
        id: impl Into<String>,
        value: Pattern,
        attributes: Vec<Attribute>,
        comment: Option<Comment>,
    ) -> Self {
        Self {
            id: id.into(),
            value,
            attributes: dedup_attributes(attributes),
            comment,
        }
    }

    /// Look up an attribute by name.
    pub fn attribute(&self, id: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attr| attr.id == id)
    }
}

/// A named sub-pattern of a message or term, e.g. `.aria-label = ...`.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub id: String,
    pub value: Pattern,
}

/// Keep one attribute per id: the value of the last definition at the
/// position of the first.
fn dedup_attributes(attributes: Vec<Attribute>) -> Vec<Attribute> {
    let mut result: Vec<Attribute> = Vec::with_capacity(attributes.len());
    for attribute in attributes {
        if let Some(existing) = result.iter_mut().find(|a| a.id == attribute.id) {
            existing.value = attribute.value;
        } else {
            result.push(attribute);
        }
    }
    result
}

/// An ordered sequence of text and placeables.
///
/// Adjacent text is always merged and CRLF becomes LF. Patterns read from a
/// resource additionally have their common indentation removed and their
/// leading blank lines and trailing whitespace trimmed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pattern {
    elements: Vec<PatternElement>,
}

impl Pattern {
    /// Build a pattern from elements, merging adjacent text.
    ///
    /// Whitespace is kept as given, so rebuilding a pattern from its own
    /// elements yields the same pattern.
    pub fn new(elements: Vec<PatternElement>) -> Self {
        Self {
            elements: coalesce(elements),
        }
    }

    /// Build a pattern from raw parser fragments, normalizing whitespace.
    pub(super) fn from_source(elements: Vec<PatternElement>) -> Self {
        Self {
            elements: normalize(elements),
        }
    }

    /// A pattern holding a single run of text, used verbatim.
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            return Self::default();
        }
        Self {
            elements: vec![PatternElement::Text(value)],
        }
    }

    pub fn elements(&self) -> &[PatternElement] {
        &self.elements
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Return the text if the pattern holds nothing but literal text.
    pub fn as_text(&self) -> Option<&str> {
        match self.elements.as_slice() {
            [] => Some(""),
            [PatternElement::Text(text)] => Some(text),
            _ => None,
        }
    }
}

/// One element of a [`Pattern`].
#[derive(Debug, Clone, PartialEq)]
pub enum PatternElement {
    /// Literal text.
    Text(String),
    /// A `{ ... }` expression.
    Placeable(Expression),
}

/// The contents of a placeable.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Inline(InlineExpression),
    Select(SelectExpression),
}

/// Expressions that may appear inline and as select expression selectors.
#[derive(Debug, Clone, PartialEq)]
pub enum InlineExpression {
    /// `{ "text" }`, stored with escapes already applied.
    StringLiteral(String),
    /// `{ -1.50 }`
    NumberLiteral(NumberLiteral),
    /// `{ $name }`
    VariableReference(String),
    /// `{ message }` or `{ message.attr }`
    MessageReference(MessageReference),
    /// `{ -term }` or `{ -term.attr }`
    TermReference(TermReference),
}

/// A reference to a message, optionally to one of its attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageReference {
    pub id: String,
    pub attribute: Option<String>,
}

impl Display for MessageReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match &self.attribute {
            Some(attribute) => write!(f, "{}.{attribute}", self.id),
            None => write!(f, "{}", self.id),
        }
    }
}

/// A reference to a term, optionally to one of its attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermReference {
    /// Identifier without the leading `-`.
    pub id: String,
    pub attribute: Option<String>,
}

impl Display for TermReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match &self.attribute {
            Some(attribute) => write!(f, "-{}.{attribute}", self.id),
            None => write!(f, "-{}", self.id),
        }
    }
}

/// A number as written in the source.
///
/// The raw text is kept so that `0010` and `10` stay distinct literals and
/// `1.50` keeps its two fraction digits when formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberLiteral {
    raw: String,
}

impl NumberLiteral {
    /// Wrap literal text. The parser guarantees the `-?digits(.digits)?` shape.
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// The literal exactly as written.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Numeric value used for equality against selectors.
    pub fn as_f64(&self) -> f64 {
        self.raw.parse().unwrap_or(f64::NAN)
    }

    /// Number of digits written after the decimal point.
    pub fn fraction_digits(&self) -> usize {
        self.raw.split_once('.').map_or(0, |(_, frac)| frac.len())
    }

    /// The literal without redundant leading integer zeros.
    ///
    /// `0010` becomes `10`, `-00.50` becomes `-0.50`.
    pub fn normalized(&self) -> String {
        let (sign, unsigned) = match self.raw.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", self.raw.as_str()),
        };
        let (int, frac) = match unsigned.split_once('.') {
            Some((int, frac)) => (int, Some(frac)),
            None => (unsigned, None),
        };
        let int = int.trim_start_matches('0');
        let int = if int.is_empty() { "0" } else { int };
        match frac {
            Some(frac) => format!("{sign}{int}.{frac}"),
            None => format!("{sign}{int}"),
        }
    }

    /// Decimal representation preserving the fraction digits.
    pub fn to_decimal(&self) -> Option<Decimal> {
        Decimal::from_str(&self.normalized()).ok()
    }
}

impl Display for NumberLiteral {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.raw)
    }
}

/// A placeable that chooses between variants based on a selector.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectExpression {
    pub selector: InlineExpression,
    /// Variants in source order.
    pub variants: Vec<Variant>,
    /// Index into `variants` of the `*[...]` variant.
    pub default_index: usize,
}

impl SelectExpression {
    /// The variant marked with `*`.
    pub fn default_variant(&self) -> Option<&Variant> {
        self.variants.get(self.default_index)
    }
}

/// One `[key] pattern` branch of a select expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    pub key: VariantKey,
    pub value: Pattern,
}

/// The discriminant of a [`Variant`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantKey {
    /// A tag such as `one`, `other` or `masculine`.
    Identifier(String),
    /// A number such as `0` or `1.5`.
    Number(NumberLiteral),
}

impl Display for VariantKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            VariantKey::Identifier(name) => write!(f, "{name}"),
            VariantKey::Number(number) => write!(f, "{number}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_literal_normalizes_leading_zeros() {
        assert_eq!(NumberLiteral::new("0010").normalized(), "10");
        assert_eq!(NumberLiteral::new("-00.50").normalized(), "-0.50");
        assert_eq!(NumberLiteral::new("0").normalized(), "0");
        assert_eq!(NumberLiteral::new("1.50").normalized(), "1.50");
    }

    #[test]
    fn number_literal_fraction_digits() {
        assert_eq!(NumberLiteral::new("1.50").fraction_digits(), 2);
        assert_eq!(NumberLiteral::new("10").fraction_digits(), 0);
        assert_eq!(NumberLiteral::new("-3.25").as_f64(), -3.25);
    }

    #[test]
    fn duplicate_attributes_keep_last_value() {
        let message = Message::new(
            "m",
            None,
            vec![
                Attribute {
                    id: "a".to_string(),
                    value: Pattern::text("first"),
                },
                Attribute {
                    id: "b".to_string(),
                    value: Pattern::text("b"),
                },
                Attribute {
                    id: "a".to_string(),
                    value: Pattern::text("second"),
                },
            ],
            None,
        );
        assert_eq!(message.attributes.len(), 2);
        assert_eq!(message.attributes[0].id, "a");
        assert_eq!(
            message.attribute("a").and_then(|a| a.value.as_text()),
            Some("second")
        );
    }
}
