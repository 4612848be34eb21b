//! AST presentation in the Fluent JSON tree format.
//!
//! Every node is an object with a `type` discriminator, following the schema
//! used by the reference tooling's fixtures. String literal values are
//! written unescaped and junk annotations are written as an empty list.

use serde_json::{Value, json};

use crate::parser::ast::{
    Attribute, Comment, CommentLevel, Entry, Expression, InlineExpression, Junk, Message,
    MessageReference, NumberLiteral, Pattern, PatternElement, Resource, SelectExpression, Term,
    TermReference, Variant, VariantKey,
};

/// Convert a resource to its JSON tree.
pub fn to_json(resource: &Resource) -> Value {
    json!({
        "type": "Resource",
        "body": resource.body.iter().map(entry).collect::<Vec<_>>(),
    })
}

/// Convert a resource to pretty-printed JSON text.
pub fn to_json_string_pretty(resource: &Resource) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&to_json(resource))
}

fn entry(entry: &Entry) -> Value {
    match entry {
        Entry::Message(message_entry) => message(message_entry),
        Entry::Term(term_entry) => term(term_entry),
        Entry::Comment(comment_entry) => comment(comment_entry),
        Entry::Junk(junk_entry) => junk(junk_entry),
    }
}

fn identifier(name: &str) -> Value {
    json!({ "type": "Identifier", "name": name })
}

fn message(message: &Message) -> Value {
    json!({
        "type": "Message",
        "id": identifier(&message.id),
        "value": message.value.as_ref().map(pattern),
        "attributes": message.attributes.iter().map(attribute).collect::<Vec<_>>(),
        "comment": message.comment.as_ref().map(comment),
    })
}

fn term(term: &Term) -> Value {
    json!({
        "type": "Term",
        "id": identifier(&term.id),
        "value": pattern(&term.value),
        "attributes": term.attributes.iter().map(attribute).collect::<Vec<_>>(),
        "comment": term.comment.as_ref().map(comment),
    })
}

fn attribute(attribute: &Attribute) -> Value {
    json!({
        "type": "Attribute",
        "id": identifier(&attribute.id),
        "value": pattern(&attribute.value),
    })
}

fn comment(comment: &Comment) -> Value {
    let kind = match comment.level {
        CommentLevel::Message => "Comment",
        CommentLevel::Group => "GroupComment",
        CommentLevel::Resource => "ResourceComment",
    };
    json!({ "type": kind, "content": comment.content() })
}

fn junk(junk: &Junk) -> Value {
    json!({ "type": "Junk", "annotations": [], "content": junk.content })
}

fn pattern(pattern: &Pattern) -> Value {
    let elements: Vec<Value> = pattern
        .elements()
        .iter()
        .map(|element| match element {
            PatternElement::Text(text) => json!({ "type": "TextElement", "value": text }),
            PatternElement::Placeable(placeable) => json!({
                "type": "Placeable",
                "expression": expression(placeable),
            }),
        })
        .collect();
    json!({ "type": "Pattern", "elements": elements })
}

fn expression(expression: &Expression) -> Value {
    match expression {
        Expression::Inline(inline) => inline_expression(inline),
        Expression::Select(select) => select_expression(select),
    }
}

fn inline_expression(expression: &InlineExpression) -> Value {
    match expression {
        InlineExpression::StringLiteral(value) => {
            json!({ "type": "StringLiteral", "value": value })
        }
        InlineExpression::NumberLiteral(literal) => number_literal(literal),
        InlineExpression::VariableReference(name) => {
            json!({ "type": "VariableReference", "id": identifier(name) })
        }
        InlineExpression::MessageReference(reference) => message_reference(reference),
        InlineExpression::TermReference(reference) => term_reference(reference),
    }
}

fn number_literal(literal: &NumberLiteral) -> Value {
    json!({ "type": "NumberLiteral", "value": literal.raw() })
}

fn message_reference(reference: &MessageReference) -> Value {
    json!({
        "type": "MessageReference",
        "id": identifier(&reference.id),
        "attribute": reference.attribute.as_deref().map(identifier),
    })
}

fn term_reference(reference: &TermReference) -> Value {
    json!({
        "type": "TermReference",
        "id": identifier(&reference.id),
        "attribute": reference.attribute.as_deref().map(identifier),
        "arguments": null,
    })
}

fn select_expression(select: &SelectExpression) -> Value {
    let variants: Vec<Value> = select
        .variants
        .iter()
        .enumerate()
        .map(|(index, item)| variant(item, index == select.default_index))
        .collect();
    json!({
        "type": "SelectExpression",
        "selector": inline_expression(&select.selector),
        "variants": variants,
    })
}

fn variant(variant: &Variant, default: bool) -> Value {
    let key = match &variant.key {
        VariantKey::Identifier(name) => identifier(name),
        VariantKey::Number(literal) => number_literal(literal),
    };
    json!({
        "type": "Variant",
        "key": key,
        "value": pattern(&variant.value),
        "default": default,
    })
}
