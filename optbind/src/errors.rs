/*!
Error types for each stage of binding a command line: validating
declarations, converting strings, scanning arguments, and running the
command.

[`DeclarationError`] is structural: it describes a broken set of declarations
and should be caught during development. [`ParseError`] describes a bad
command line. Both end up in the top-level [`Error`], alongside failures raised
by the command's own code.
 */

use std::error::Error as StdError;

/// Errors raised by command code: construction, actions, and the entry point.
/// Anything that implements [`std::error::Error`] converts into this, as does
/// [`anyhow::Error`](https://docs.rs/anyhow).
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// A set of option declarations is malformed. These are programming errors,
/// detected before any argument is looked at.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DeclarationError {
    #[error("an option needs a short name, a long name, or both")]
    Unnamed,

    #[error("option -{short} can never match: short names must be an ASCII letter or digit")]
    InvalidShort { short: char },

    #[error("option --{long} can never match: long names must start with an ASCII letter or digit")]
    InvalidLong { long: &'static str },

    #[error("option {option} is missing a description")]
    MissingDescription { option: String },

    #[error("option {option} isn't bound to an action")]
    MissingAction { option: String },

    #[error("duplicate option with short name -{short}")]
    DuplicateShort { short: char },

    #[error("duplicate option with long name --{long}")]
    DuplicateLong { long: &'static str },

    #[error("argument pattern is invalid for {option}: {pattern}")]
    InvalidPattern {
        option: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error(
        "argument pattern for {option} has {groups} capture groups, \
         but its action takes {parameters} parameters"
    )]
    PatternArity {
        option: String,
        groups: usize,
        parameters: usize,
    },
}

/// A string couldn't be converted into the requested type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ConversionError {
    /// The string isn't a valid representation of the type
    #[error("failed to parse {value:?} as {type_name}: {message}")]
    Format {
        value: String,
        type_name: &'static str,
        message: String,
    },

    /// No converter in the registry can produce this type
    #[error("unsupported type: {type_name}")]
    Unsupported { type_name: &'static str },

    /// A converter produced a value of a different type than it was
    /// registered for
    #[error("converter produced a value that isn't a {type_name}")]
    TypeMismatch { type_name: &'static str },
}

impl ConversionError {
    /// Build a [`ConversionError::Format`] for a value of type `T`
    pub fn format<T: ?Sized>(value: &str, message: impl std::fmt::Display) -> Self {
        Self::Format {
            value: value.to_owned(),
            type_name: std::any::type_name::<T>(),
            message: message.to_string(),
        }
    }
}

/// An option's argument couldn't be turned into the values its action takes
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ArgumentError {
    #[error("it doesn't match the pattern {pattern}")]
    Mismatch { pattern: String },

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

/// The command line doesn't fit the declared options
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The token is neither `--long` nor `-s`
    #[error("malformed option: {token:?}")]
    Malformed { token: String },

    #[error("unknown option: {token}")]
    UnknownOption { token: String },

    /// An option that isn't marked as multiple appeared more than once
    #[error("duplicate option: {token}")]
    Duplicate { token: String },

    #[error("missing an argument for option {token}")]
    MissingArgument { token: String },

    #[error("invalid argument {argument:?} for option {token}: {error}")]
    Argument {
        token: String,
        argument: String,
        error: ArgumentError,
    },

    #[error("missing required option: {option}")]
    MissingRequired { option: String },
}

/// Everything that can go wrong while binding and running a command
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Declaration(#[from] DeclarationError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("failed to create the command")]
    Construction(#[source] BoxError),

    #[error("option {option} failed")]
    Action {
        option: String,
        #[source]
        source: BoxError,
    },

    #[error("command failed")]
    Run(#[source] BoxError),
}

impl Error {
    /// True if this error was caused by the command line itself, as opposed
    /// to the declarations or the command's code. Hosts usually print usage
    /// alongside these.
    #[must_use]
    pub fn is_input(&self) -> bool {
        matches!(self, Self::Parse(_))
    }

    /// The first [`Failure`] in this error's cause chain, if any
    #[must_use]
    pub fn failure(&self) -> Option<&Failure> {
        std::iter::successors(Some(self as &(dyn StdError + 'static)), |&error| {
            error.source()
        })
        .find_map(|error| error.downcast_ref::<Failure>())
    }

    /// The process exit code for this error. A [`Failure`] anywhere in the
    /// cause chain decides the code; otherwise it comes from `codes`.
    #[must_use]
    pub fn exit_code(&self, codes: &ExitCodes) -> i32 {
        match self.failure() {
            Some(failure) => failure.code(),
            None if self.is_input() => codes.input,
            None => codes.failure,
        }
    }
}

/**
A failure with a chosen process exit code. Actions and entry points can
return this (directly, or as the source of another error) to control the exit
code that [`Error::exit_code`] reports.
 */
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct Failure {
    code: i32,
    message: String,
}

impl Failure {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    #[inline]
    #[must_use]
    pub fn code(&self) -> i32 {
        self.code
    }

    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Exit codes used by [`Error::exit_code`] when no [`Failure`] says otherwise
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCodes {
    /// Used for [`ParseError`]s: a bad command line
    pub input: i32,

    /// Used for everything else
    pub failure: i32,
}

impl Default for ExitCodes {
    fn default() -> Self {
        Self {
            input: 100,
            failure: 1,
        }
    }
}
