//! Error types for the resolver.

use thiserror::Error;

/// A hard failure that aborts a format call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// A variable referenced by the pattern was not supplied.
    #[error("missing argument '${name}'")]
    MissingArgument { name: String },
}

/// A soft failure recorded while formatting.
///
/// The formatter keeps going and writes a visible placeholder such as
/// `{missing-id}` where the failed reference would have been.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolverError {
    /// A referenced message does not exist.
    #[error("unknown message '{id}'")]
    UnknownMessage { id: String },

    /// A referenced term does not exist.
    #[error("unknown term '-{id}'")]
    UnknownTerm { id: String },

    /// A referenced attribute does not exist on its message or term.
    #[error("unknown attribute '{attribute}' on '{id}'")]
    UnknownAttribute { id: String, attribute: String },

    /// A referenced message has attributes but no value.
    #[error("message '{id}' has no value")]
    NoValue { id: String },

    /// Messages or terms reference each other in a loop.
    #[error("cyclic reference detected: {}", chain.join(" -> "))]
    CyclicReference { chain: Vec<String> },

    /// References are nested deeper than the configured limit.
    #[error("maximum reference depth exceeded")]
    MaxDepthExceeded,

    /// The locale's number formatter could not format a value.
    #[error("could not format number '{value}'")]
    NumberFormat { value: String },
}
