//! Per-locale message store.

use std::collections::HashMap;

use log::{debug, warn};

use crate::error::LoadWarning;
use crate::parser::ast::{Entry, Message, Pattern, Resource, Term};
use crate::parser::parse_message_reference;
use crate::resolver::{
    FluentArgs, FormatError, Formatted, Lookup, Scope, format_pattern_with_errors,
};

/// The messages and terms of one locale.
///
/// Identifiers are unique within a bundle: adding an entry with an existing
/// identifier replaces the earlier one. A bundle is typically filled once and
/// then only read; reads take `&self` and never mutate.
///
/// # Example
///
/// ```
/// use fluent::parser::{ParseMode, parse};
/// use fluent::{FluentBundle, args};
///
/// let mut bundle = FluentBundle::new("en");
/// let resource = parse("greeting = Hello, { $name }!\n", ParseMode::Lenient).unwrap();
/// assert!(bundle.add_resource(resource).is_empty());
///
/// let text = bundle.format_message("greeting", &args! { "name" => "Ana" }).unwrap();
/// assert_eq!(text.as_deref(), Some("Hello, Ana!"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FluentBundle {
    locale: String,
    messages: HashMap<String, Message>,
    terms: HashMap<String, Term>,
}

impl FluentBundle {
    /// Create an empty bundle for a locale.
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            messages: HashMap::new(),
            terms: HashMap::new(),
        }
    }

    /// The locale tag of this bundle.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Insert a message, returning the one it replaced.
    pub fn add_message(&mut self, message: Message) -> Option<Message> {
        self.messages.insert(message.id.clone(), message)
    }

    /// Insert a term, returning the one it replaced.
    pub fn add_term(&mut self, term: Term) -> Option<Term> {
        self.terms.insert(term.id.clone(), term)
    }

    pub fn get_message(&self, id: &str) -> Option<&Message> {
        self.messages.get(id)
    }

    /// Look up a term by identifier, without the leading `-`.
    pub fn get_term(&self, id: &str) -> Option<&Term> {
        self.terms.get(id)
    }

    pub fn has_message(&self, id: &str) -> bool {
        self.messages.contains_key(id)
    }

    /// All message identifiers, sorted.
    pub fn message_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.messages.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Number of messages in the bundle.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.terms.is_empty()
    }

    /// Add every message and term of a parsed resource.
    ///
    /// Comments are discarded. Junk entries and redefined identifiers are
    /// returned as warnings; the later definition of an identifier wins.
    pub fn add_resource(&mut self, resource: Resource) -> Vec<LoadWarning> {
        let mut warnings = Vec::new();
        let mut message_count = 0;
        let mut term_count = 0;

        for entry in resource.body {
            match entry {
                Entry::Message(message) => {
                    message_count += 1;
                    let id = message.id.clone();
                    if self.add_message(message).is_some() {
                        warnings.push(LoadWarning::DuplicateMessage {
                            id,
                            locale: self.locale.clone(),
                        });
                    }
                }
                Entry::Term(term) => {
                    term_count += 1;
                    let id = term.id.clone();
                    if self.add_term(term).is_some() {
                        warnings.push(LoadWarning::DuplicateTerm {
                            id,
                            locale: self.locale.clone(),
                        });
                    }
                }
                Entry::Junk(junk) => {
                    let (line, column, message) = junk.annotations.first().map_or_else(
                        || (0, 0, String::from("malformed entry")),
                        |annotation| {
                            (annotation.line, annotation.column, annotation.message.clone())
                        },
                    );
                    warnings.push(LoadWarning::Junk {
                        locale: self.locale.clone(),
                        line,
                        column,
                        message,
                        content: junk.content,
                    });
                }
                Entry::Comment(_) => {}
            }
        }

        for warning in &warnings {
            warn!("{warning}");
        }
        debug!(
            "added resource to '{}': {message_count} messages, {term_count} terms",
            self.locale
        );
        warnings
    }

    /// Format a pattern against this bundle's messages and terms.
    pub fn format_pattern(
        &self,
        pattern: &Pattern,
        args: &FluentArgs,
    ) -> Result<Formatted, FormatError> {
        format_pattern_with_errors(pattern, args, &self.locale, self)
    }

    /// Format a message or `message.attribute` by identifier.
    ///
    /// Returns `Ok(None)` when the message, or the requested attribute, does
    /// not exist here.
    pub fn format_message(
        &self,
        id: &str,
        args: &FluentArgs,
    ) -> Result<Option<String>, FormatError> {
        let Ok(reference) = parse_message_reference(id) else {
            return Ok(None);
        };
        let Some(message) = self.get_message(&reference.id) else {
            return Ok(None);
        };
        let pattern = match &reference.attribute {
            Some(name) => message.attribute(name).map(|attribute| &attribute.value),
            None => message.value.as_ref(),
        };
        let Some(pattern) = pattern else {
            return Ok(None);
        };
        Scope::new(&self.locale, self)
            .format_entry(&reference.to_string(), pattern, args)
            .map(Some)
    }
}

impl Lookup for FluentBundle {
    fn message(&self, id: &str) -> Option<&Message> {
        self.get_message(id)
    }

    fn term(&self, id: &str) -> Option<&Term> {
        self.get_term(id)
    }
}
