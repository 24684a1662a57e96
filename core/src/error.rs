//! Error types for parsing, generation, and model manipulation.
//!
//! None of these are fatal to a caller: a failed parse leaves the
//! [`ExecutionContext`](crate::ExecutionContext) reset, and a failed
//! generation simply means there is no usable parameter string yet.

use thiserror::Error;

/// Reasons a parameter string was rejected.
///
/// Any of these aborts the whole parse; the context is reset to its empty
/// state rather than keeping whatever was consumed before the failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input was empty or whitespace-only.
    #[error("parameter string is empty")]
    Empty,
    /// The leading token is not a command of a dialect that requires one.
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    /// A token matched no flag in a dialect that rejects unknown tokens.
    #[error("unrecognized token: {0}")]
    UnknownToken(String),
    /// The flag exists in the catalog but is not legal for the command.
    #[error("flag {flag} is not supported by command {command}")]
    UnsupportedFlag {
        /// Flag identifier.
        flag: String,
        /// Active command, `<none>` for the empty command.
        command: String,
    },
    /// A flag that requires a value was followed by nothing or by another flag.
    #[error("missing value for {0}")]
    MissingValue(String),
    /// A required positional parameter of the command was absent.
    #[error("missing positional parameter {name} for command {command}")]
    MissingPositional {
        /// Positional parameter identifier.
        name: String,
        /// Command that requires it.
        command: String,
    },
    /// The value could not be decoded as the flag's kind.
    #[error("invalid value {value:?} for {flag}")]
    InvalidValue {
        /// Flag identifier.
        flag: String,
        /// Raw value text.
        value: String,
    },
    /// The decoded number falls outside the flag's bounds.
    #[error("value {value} for {flag} is outside {min}..={max}")]
    OutOfRange {
        /// Flag identifier.
        flag: String,
        /// Decoded value.
        value: i64,
        /// Inclusive lower bound.
        min: i64,
        /// Inclusive upper bound.
        max: i64,
    },
    /// The string value is not one of the flag's allowed choices.
    #[error("{value:?} is not an allowed value for {flag}")]
    InvalidChoice {
        /// Flag identifier.
        flag: String,
        /// Rejected value.
        value: String,
    },
    /// A `key=value` token did not split into exactly two segments.
    #[error("malformed key=value token: {0}")]
    MalformedKeyValue(String),
}

/// Reasons a context could not produce a parameter string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    /// No command and no flags are set.
    #[error("nothing to generate")]
    Empty,
    /// A flag the active command requires has no value.
    #[error("command {command} requires a value for {flag}")]
    MissingRequired {
        /// Flag identifier.
        flag: String,
        /// Active command, `<none>` for the empty command.
        command: String,
    },
}

/// Misuse of the programmatic setters on a context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// The dialect has no flag with this identifier.
    #[error("unknown flag: {0}")]
    UnknownFlag(String),
    /// The dialect has no command with this identifier.
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    /// The flag has fewer value slots than the index given.
    #[error("flag {flag} has no value slot {slot}")]
    NoSuchSlot {
        /// Flag identifier.
        flag: String,
        /// Requested slot index.
        slot: usize,
    },
    /// The value does not satisfy the slot's kind, bounds, or choices.
    #[error(transparent)]
    Rejected(#[from] ParseError),
}

/// Display name for an optional command, used in error messages.
pub(crate) fn command_label(command: Option<&str>) -> String {
    command.unwrap_or("<none>").to_string()
}
