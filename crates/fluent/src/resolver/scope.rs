//! Formatting scope: the state carried through recursive pattern resolution.

use std::mem;

use fixed_decimal::Decimal;
use log::debug;

use super::error::{FormatError, ResolverError};
use super::number::try_format_number;
use super::plural::plural_category;
use super::value::{FluentArgs, Value};
use super::{DEFAULT_MAX_DEPTH, Lookup};
use crate::parser::ast::{
    Expression, InlineExpression, MessageReference, NumberLiteral, Pattern, PatternElement,
    SelectExpression, TermReference, Variant, VariantKey,
};

/// A resolved selector value.
enum Selector {
    Text(String),
    Number { value: f64, decimal: Option<Decimal> },
}

/// State carried through one format call.
///
/// The scope tracks:
/// - The locale used for numbers and plural rules
/// - The lookup that resolves message and term references
/// - A call stack of references being resolved, for cycle detection
/// - Soft errors collected along the way
pub struct Scope<'a> {
    locale: &'a str,
    lookup: &'a dyn Lookup,
    /// References currently being resolved, as `id`, `-id` or `id.attr`.
    call_stack: Vec<String>,
    max_depth: usize,
    errors: Vec<ResolverError>,
}

impl<'a> Scope<'a> {
    /// Create a scope for a locale and a reference lookup.
    pub fn new(locale: &'a str, lookup: &'a dyn Lookup) -> Self {
        Self {
            locale,
            lookup,
            call_stack: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            errors: Vec::new(),
        }
    }

    /// Limit how deeply references may nest.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// The locale this scope formats for.
    pub fn locale(&self) -> &str {
        self.locale
    }

    /// Soft errors collected so far.
    pub fn errors(&self) -> &[ResolverError] {
        &self.errors
    }

    /// Drain the collected soft errors.
    pub fn take_errors(&mut self) -> Vec<ResolverError> {
        mem::take(&mut self.errors)
    }

    /// Format a pattern with the given arguments.
    pub fn format(&mut self, pattern: &Pattern, args: &FluentArgs) -> Result<String, FormatError> {
        let mut out = String::new();
        self.write_pattern(&mut out, pattern, Some(args))?;
        Ok(out)
    }

    /// Format the pattern of a top-level message or attribute.
    ///
    /// `key` is placed on the call stack first, so a message that refers back
    /// to itself is reported as a cycle.
    pub fn format_entry(
        &mut self,
        key: &str,
        pattern: &Pattern,
        args: &FluentArgs,
    ) -> Result<String, FormatError> {
        let mut out = String::new();
        if let Err(error) = self.push_call(key) {
            self.record(error);
            out.push_str(&format!("{{{key}}}"));
            return Ok(out);
        }
        let result = self.write_pattern(&mut out, pattern, Some(args));
        self.pop_call();
        result.map(|()| out)
    }

    fn record(&mut self, error: ResolverError) {
        debug!("{error}");
        if !self.errors.contains(&error) {
            self.errors.push(error);
        }
    }

    fn push_call(&mut self, key: &str) -> Result<(), ResolverError> {
        if self.call_stack.iter().any(|entry| entry == key) {
            let mut chain = self.call_stack.clone();
            chain.push(key.to_string());
            return Err(ResolverError::CyclicReference { chain });
        }
        if self.call_stack.len() >= self.max_depth {
            return Err(ResolverError::MaxDepthExceeded);
        }
        self.call_stack.push(key.to_string());
        Ok(())
    }

    fn pop_call(&mut self) {
        self.call_stack.pop();
    }

    /// `args` is `None` inside terms, which never see the caller's arguments.
    fn write_pattern(
        &mut self,
        out: &mut String,
        pattern: &Pattern,
        args: Option<&FluentArgs>,
    ) -> Result<(), FormatError> {
        for element in pattern.elements() {
            match element {
                PatternElement::Text(text) => out.push_str(text),
                PatternElement::Placeable(expression) => {
                    self.write_expression(out, expression, args)?;
                }
            }
        }
        Ok(())
    }

    fn write_expression(
        &mut self,
        out: &mut String,
        expression: &Expression,
        args: Option<&FluentArgs>,
    ) -> Result<(), FormatError> {
        match expression {
            Expression::Inline(inline) => self.write_inline(out, inline, args),
            Expression::Select(select) => match self.select_variant(select, args)? {
                Some(variant) => self.write_pattern(out, &variant.value, args),
                None => Ok(()),
            },
        }
    }

    fn write_inline(
        &mut self,
        out: &mut String,
        expression: &InlineExpression,
        args: Option<&FluentArgs>,
    ) -> Result<(), FormatError> {
        match expression {
            InlineExpression::StringLiteral(value) => out.push_str(value),
            InlineExpression::NumberLiteral(literal) => {
                let text = self.format_literal(literal);
                out.push_str(&text);
            }
            InlineExpression::VariableReference(name) => {
                let value = argument(args, name)?;
                let text = self.format_value(value);
                out.push_str(&text);
            }
            InlineExpression::MessageReference(reference) => {
                self.write_message_reference(out, reference, args)?;
            }
            InlineExpression::TermReference(reference) => {
                self.write_term_reference(out, reference)?;
            }
        }
        Ok(())
    }

    fn write_message_reference(
        &mut self,
        out: &mut String,
        reference: &MessageReference,
        args: Option<&FluentArgs>,
    ) -> Result<(), FormatError> {
        let lookup = self.lookup;
        let key = reference.to_string();

        let Some(message) = lookup.message(&reference.id) else {
            self.record(ResolverError::UnknownMessage {
                id: reference.id.clone(),
            });
            out.push_str(&format!("{{{key}}}"));
            return Ok(());
        };

        let pattern = match &reference.attribute {
            Some(name) => message.attribute(name).map(|attribute| &attribute.value),
            None => message.value.as_ref(),
        };
        let Some(pattern) = pattern else {
            self.record(match &reference.attribute {
                Some(name) => ResolverError::UnknownAttribute {
                    id: reference.id.clone(),
                    attribute: name.clone(),
                },
                None => ResolverError::NoValue {
                    id: reference.id.clone(),
                },
            });
            out.push_str(&format!("{{{key}}}"));
            return Ok(());
        };

        self.write_nested(out, &key, pattern, args)
    }

    fn write_term_reference(
        &mut self,
        out: &mut String,
        reference: &TermReference,
    ) -> Result<(), FormatError> {
        let lookup = self.lookup;
        let key = reference.to_string();

        let Some(term) = lookup.term(&reference.id) else {
            self.record(ResolverError::UnknownTerm {
                id: reference.id.clone(),
            });
            out.push_str(&format!("{{{key}}}"));
            return Ok(());
        };

        let pattern = match &reference.attribute {
            Some(name) => match term.attribute(name) {
                Some(attribute) => &attribute.value,
                None => {
                    self.record(ResolverError::UnknownAttribute {
                        id: format!("-{}", reference.id),
                        attribute: name.clone(),
                    });
                    out.push_str(&format!("{{{key}}}"));
                    return Ok(());
                }
            },
            None => &term.value,
        };

        self.write_nested(out, &key, pattern, None)
    }

    /// Resolve a referenced pattern with `key` on the call stack.
    fn write_nested(
        &mut self,
        out: &mut String,
        key: &str,
        pattern: &Pattern,
        args: Option<&FluentArgs>,
    ) -> Result<(), FormatError> {
        if let Err(error) = self.push_call(key) {
            self.record(error);
            out.push_str(&format!("{{{key}}}"));
            return Ok(());
        }
        let result = self.write_pattern(out, pattern, args);
        self.pop_call();
        result
    }

    /// Pick the variant of a select expression.
    ///
    /// Strings match identifier keys exactly. Numbers first match numeric
    /// keys by value, then identifier keys by plural category. Anything
    /// unmatched falls back to the default variant.
    fn select_variant<'s>(
        &mut self,
        select: &'s SelectExpression,
        args: Option<&FluentArgs>,
    ) -> Result<Option<&'s Variant>, FormatError> {
        let selected = match self.resolve_selector(&select.selector, args)? {
            Selector::Text(text) => select.variants.iter().find(|variant| {
                matches!(&variant.key, VariantKey::Identifier(key) if *key == text)
            }),
            Selector::Number { value, decimal } => select
                .variants
                .iter()
                .find(|variant| {
                    matches!(&variant.key, VariantKey::Number(key) if key.as_f64() == value)
                })
                .or_else(|| {
                    let category = decimal
                        .as_ref()
                        .map_or("other", |decimal| plural_category(self.locale, decimal));
                    select.variants.iter().find(|variant| {
                        matches!(&variant.key, VariantKey::Identifier(key) if key == category)
                    })
                }),
        };
        Ok(selected.or_else(|| select.default_variant()))
    }

    fn resolve_selector(
        &mut self,
        selector: &InlineExpression,
        args: Option<&FluentArgs>,
    ) -> Result<Selector, FormatError> {
        Ok(match selector {
            InlineExpression::StringLiteral(value) => Selector::Text(value.clone()),
            InlineExpression::NumberLiteral(literal) => Selector::Number {
                value: literal.as_f64(),
                decimal: literal.to_decimal(),
            },
            InlineExpression::VariableReference(name) => {
                let value = argument(args, name)?;
                match value {
                    Value::String(text) => Selector::Text(text.clone()),
                    Value::Integer(n) => Selector::Number {
                        value: *n as f64,
                        decimal: Some(Decimal::from(*n)),
                    },
                    Value::Float(f) => Selector::Number {
                        value: *f,
                        decimal: value.to_decimal(),
                    },
                }
            }
            InlineExpression::MessageReference(_) | InlineExpression::TermReference(_) => {
                let mut text = String::new();
                self.write_inline(&mut text, selector, args)?;
                Selector::Text(text)
            }
        })
    }

    /// Format a number literal, keeping its fraction digits.
    fn format_literal(&mut self, literal: &NumberLiteral) -> String {
        literal
            .to_decimal()
            .and_then(|decimal| try_format_number(self.locale, &decimal))
            .unwrap_or_else(|| {
                self.record(ResolverError::NumberFormat {
                    value: literal.raw().to_string(),
                });
                literal.normalized()
            })
    }

    fn format_value(&mut self, value: &Value) -> String {
        match value {
            Value::String(text) => text.clone(),
            Value::Integer(_) | Value::Float(_) => value
                .to_decimal()
                .and_then(|decimal| try_format_number(self.locale, &decimal))
                .unwrap_or_else(|| {
                    self.record(ResolverError::NumberFormat {
                        value: value.to_string(),
                    });
                    value.to_string()
                }),
        }
    }
}

fn argument<'v>(args: Option<&'v FluentArgs>, name: &str) -> Result<&'v Value, FormatError> {
    args.and_then(|args| args.get(name))
        .ok_or_else(|| FormatError::MissingArgument {
            name: name.to_string(),
        })
}
