//! Fluent (.ftl) parser.
//!
//! This module turns Fluent source text into an immutable [`Resource`]. The
//! parser is lenient by default: malformed entries are kept as [`Junk`] with
//! an annotation describing the failure, and parsing resumes at the next line
//! that can start an entry.

pub mod ast;
pub mod chars;
pub mod error;
mod indent;
mod pattern;
mod resource;

pub use ast::*;
pub use error::ParseError;
pub use pattern::MAX_NESTING;
pub use resource::{ParseMode, parse, parse_bytes, parse_message_reference, parse_pattern};
