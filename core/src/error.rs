//! Error types for parsing and schema construction.
//!
//! Two families live here. [`ParseError`] values describe problems with the
//! *input* and are collected into ordered lists; they are never panics.
//! [`SchemaError`] and [`SettingsError`] describe programmer mistakes found
//! while building a schema or loading settings, and are returned from the
//! corresponding `build`/`load` calls.

use serde::Serialize;
use thiserror::Error;

use crate::types::ArgKind;

/// Closed set of parse error codes.
///
/// Codes are grouped by argument kind so a presentation layer can tell a
/// missing option from a missing positional value without parsing messages.
///
/// # Examples
///
/// ```
/// use verbline_core::{ArgKind, ErrorCode};
///
/// assert_eq!(ErrorCode::missing_required(ArgKind::Value), ErrorCode::MissingRequiredValue);
/// assert_eq!(
///     ErrorCode::conversion_failure(ArgKind::Option),
///     ErrorCode::OptionConversionFailure,
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorCode {
    /// A required option was not supplied and has no default.
    MissingRequiredOption,
    /// A required switch was not supplied and has no default.
    MissingRequiredSwitch,
    /// A required positional value was not supplied.
    MissingRequiredValue,
    /// A required multi-value collected no tokens.
    MissingRequiredMultiValue,
    /// More positional tokens than declared values.
    TooManyValues,
    /// An option appeared more than once.
    DuplicateOption,
    /// A switch appeared more than once.
    DuplicateSwitch,
    /// A token that fits nowhere in the schema.
    UnexpectedArgument,
    /// An option was the last token and has no value.
    UnexpectedEndOfArguments,
    /// An option value was rejected by its converter.
    OptionConversionFailure,
    /// A switch value was rejected by its converter.
    SwitchConversionFailure,
    /// A positional value was rejected by its converter.
    ValueConversionFailure,
    /// A multi-value element was rejected by its converter.
    MultiValueConversionFailure,
    /// The first token names no registered verb.
    InvalidVerb,
    /// No tokens were given, so no verb could be selected.
    NoVerbFound,
    /// A help switch was found; callers render help instead of errors.
    HelpRequested,
    /// An option was supplied although other state forbids it.
    OptionMustNotBeProvided,
    /// A switch was supplied although other state forbids it.
    SwitchMustNotBeProvided,
    /// A positional value was supplied although other state forbids it.
    ValueMustNotBeProvided,
    /// Multi-value tokens were supplied although other state forbids them.
    MultiValueMustNotBeProvided,
}

impl ErrorCode {
    /// The missing-required code for an argument kind.
    pub fn missing_required(kind: ArgKind) -> Self {
        match kind {
            ArgKind::Option => Self::MissingRequiredOption,
            ArgKind::Switch => Self::MissingRequiredSwitch,
            ArgKind::Value => Self::MissingRequiredValue,
            ArgKind::MultiValue => Self::MissingRequiredMultiValue,
        }
    }

    /// The conversion-failure code for an argument kind.
    pub fn conversion_failure(kind: ArgKind) -> Self {
        match kind {
            ArgKind::Option => Self::OptionConversionFailure,
            ArgKind::Switch => Self::SwitchConversionFailure,
            ArgKind::Value => Self::ValueConversionFailure,
            ArgKind::MultiValue => Self::MultiValueConversionFailure,
        }
    }

    /// The must-not-be-provided code for an argument kind.
    pub fn must_not_be_provided(kind: ArgKind) -> Self {
        match kind {
            ArgKind::Option => Self::OptionMustNotBeProvided,
            ArgKind::Switch => Self::SwitchMustNotBeProvided,
            ArgKind::Value => Self::ValueMustNotBeProvided,
            ArgKind::MultiValue => Self::MultiValueMustNotBeProvided,
        }
    }
}

/// One problem found while parsing a token sequence.
///
/// `show_to_user` is `false` only for [`ErrorCode::HelpRequested`], which is
/// an expected outcome rather than a mistake.
///
/// # Examples
///
/// ```
/// use verbline_core::{ErrorCode, ParseError};
///
/// let err = ParseError::new(ErrorCode::DuplicateSwitch, "switch '--verbose' given twice");
/// assert!(err.show_to_user);
/// assert_eq!(err.to_string(), "switch '--verbose' given twice");
///
/// assert!(!ParseError::help_requested().show_to_user);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{message}")]
pub struct ParseError {
    /// Machine-readable classification.
    pub code: ErrorCode,
    /// Human-readable description.
    pub message: String,
    /// Whether a front end should print this error.
    pub show_to_user: bool,
}

impl ParseError {
    /// Creates an error; every code except `HelpRequested` is user-facing.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            show_to_user: code != ErrorCode::HelpRequested,
        }
    }

    /// The single error reported when a help switch short-circuits parsing.
    pub fn help_requested() -> Self {
        Self::new(ErrorCode::HelpRequested, "help requested")
    }

    /// Returns `true` for [`ErrorCode::HelpRequested`].
    pub fn is_help(&self) -> bool {
        self.code == ErrorCode::HelpRequested
    }
}

/// Mistakes in a verb or parser definition, reported at build time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// An option or switch has neither a short nor a long name.
    #[error("argument '{0}' must define a short or long name")]
    MissingArgumentName(String),
    /// Short name does not look like `-x`.
    #[error("invalid short name format: {0}")]
    InvalidShortName(String),
    /// Long name does not look like `--name`.
    #[error("invalid long name format: {0}")]
    InvalidLongName(String),
    /// Two options or switches of one verb share a name.
    #[error("duplicate argument name in verb: {0}")]
    DuplicateArgumentName(String),
    /// A verb mixes ordered values with a multi-value, or has two multi-values.
    #[error("verb '{0}' may declare either positional values or one multi-value, not both")]
    ValuesAndMultiValue(String),
    /// Verb name or alias is empty or contains whitespace.
    #[error("verb names must be non-empty and contain no whitespace: {0:?}")]
    EmptyVerbName(String),
    /// Two verbs share a name or alias.
    #[error("duplicate verb: {0}")]
    DuplicateVerb(String),
    /// A verb name equals a help switch.
    #[error("verb '{0}' collides with a help switch")]
    VerbCollidesWithHelp(String),
    /// An option or switch name equals a help switch.
    #[error("argument '{name}' of verb '{verb}' collides with a help switch")]
    ArgumentCollidesWithHelp {
        /// Verb declaring the argument.
        verb: String,
        /// Offending option or switch name.
        name: String,
    },
    /// A dispatcher was built without verbs.
    #[error("a parser needs at least one verb; use Verb::parse for verbless programs")]
    NoVerbs,
    /// A configured help switch is empty or contains whitespace.
    #[error("invalid help switch: {0:?}")]
    InvalidHelpSwitch(String),
}

/// Errors from loading, saving or validating [`ParserSettings`](crate::ParserSettings).
#[derive(Debug, Error)]
pub enum SettingsError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Help switch is empty or contains whitespace.
    #[error("invalid help switch: {0:?}")]
    InvalidHelpSwitch(String),
}

/// Convenience alias for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;
