//! Fluent pattern resolver.
//!
//! This module evaluates a parsed [`Pattern`] against runtime arguments and
//! produces a string. It resolves message and term references through a
//! [`Lookup`], picks select-expression variants (including CLDR plural
//! categories) and formats numbers for the locale.
//!
//! A missing argument aborts the format call with a [`FormatError`]. Broken
//! references do not: they are written as a visible placeholder such as
//! `{missing-id}` and reported as [`ResolverError`]s.

mod error;
mod number;
mod plural;
mod scope;
mod value;

use std::marker::PhantomData;

pub use error::{FormatError, ResolverError};
pub use number::format_number;
pub use plural::plural_category;
pub use scope::Scope;
pub use value::{FluentArgs, Value};

use crate::parser::ast::{Message, Pattern, Term};

/// Default limit on nested message and term references.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Resolves message and term identifiers during formatting.
///
/// Lookups must be side-effect free. A bundle answers from its own entries;
/// the loader answers by walking a locale fallback chain.
pub trait Lookup {
    /// Find a message by identifier.
    fn message(&self, id: &str) -> Option<&Message>;

    /// Find a term by identifier, without the leading `-`.
    fn term(&self, id: &str) -> Option<&Term>;
}

/// A [`Lookup`] built from two closures.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
///
/// use fluent::parser::{Message, Term, parse_pattern};
/// use fluent::resolver::{FnLookup, format_pattern};
///
/// let messages: HashMap<String, Message> = HashMap::new();
/// let lookup = FnLookup::new(|id: &str| messages.get(id), |_: &str| None::<&Term>);
/// let pattern = parse_pattern("Hello").unwrap();
/// assert_eq!(format_pattern(&pattern, &HashMap::new(), "en", &lookup).unwrap(), "Hello");
/// ```
pub struct FnLookup<'a, M, T> {
    messages: M,
    terms: T,
    marker: PhantomData<&'a ()>,
}

impl<'a, M, T> FnLookup<'a, M, T>
where
    M: Fn(&str) -> Option<&'a Message>,
    T: Fn(&str) -> Option<&'a Term>,
{
    /// Wrap a message closure and a term closure.
    pub fn new(messages: M, terms: T) -> Self {
        Self {
            messages,
            terms,
            marker: PhantomData,
        }
    }
}

impl<'a, M, T> Lookup for FnLookup<'a, M, T>
where
    M: Fn(&str) -> Option<&'a Message>,
    T: Fn(&str) -> Option<&'a Term>,
{
    fn message(&self, id: &str) -> Option<&Message> {
        (self.messages)(id)
    }

    fn term(&self, id: &str) -> Option<&Term> {
        (self.terms)(id)
    }
}

/// A formatted string together with the soft errors hit while producing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatted {
    pub value: String,
    pub errors: Vec<ResolverError>,
}

/// Format a pattern.
///
/// Soft errors are dropped; use [`format_pattern_with_errors`] or a
/// [`Scope`] to inspect them.
pub fn format_pattern(
    pattern: &Pattern,
    args: &FluentArgs,
    locale: &str,
    lookup: &dyn Lookup,
) -> Result<String, FormatError> {
    Scope::new(locale, lookup).format(pattern, args)
}

/// Format a pattern and return the soft errors alongside the text.
pub fn format_pattern_with_errors(
    pattern: &Pattern,
    args: &FluentArgs,
    locale: &str,
    lookup: &dyn Lookup,
) -> Result<Formatted, FormatError> {
    let mut scope = Scope::new(locale, lookup);
    let value = scope.format(pattern, args)?;
    Ok(Formatted {
        value,
        errors: scope.take_errors(),
    })
}
