// ⚠️ Error types
//
// CommandError is user-facing: its Display text is what the console prints,
// and the session carries on. Everything fatal travels as anyhow::Error.

use thiserror::Error;

/// A command that could not run; printed verbatim, nothing was mutated
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("** class name missing **")]
    MissingClassName,

    #[error("** class doesn't exist **")]
    UnknownClass,

    #[error("** instance id missing **")]
    MissingIdentifier,

    #[error("** no instance found **")]
    InstanceNotFound,

    #[error("** attribute name missing **")]
    MissingAttributeName,

    #[error("** value missing **")]
    MissingAttributeValue,

    #[error("** invalid syntax **")]
    InvalidJsonPayload,

    #[error("*** Unknown syntax: {0}")]
    UnknownSyntax(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("cannot register a {kind} without an id")]
    MissingIdentity { kind: String },
}

/// Why a persisted dict could not be turned back into an entity
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityError {
    #[error("missing or empty \"id\"")]
    MissingId,

    #[error("missing timestamp \"{field}\"")]
    MissingTimestamp { field: &'static str },

    #[error("invalid timestamp \"{field}\": {value}")]
    InvalidTimestamp { field: &'static str, value: String },
}
