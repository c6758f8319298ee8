//! The two-tier error model: configuration errors and user-facing signals.
//!
//! [`BuildError`] covers construction-time mistakes (programmer bugs) and is
//! never shown to end users; nothing in the library catches it.
//! [`UsageError`] covers bad input to a parse pass and is caught only at the
//! [`main`](crate::Command::main) boundary. [`Termination`] is not an error
//! at all: it is the intentional early exit raised by eager parameters such
//! as help and version.

use thiserror::Error;

/// A mistake in how a command was declared.
///
/// Raised by [`CommandBuilder::build`](crate::CommandBuilder::build) and
/// deliberately left uncaught everywhere else: these indicate a programming
/// error, not user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A parameter was declared with no names.
    #[error("parameter declares no names")]
    MissingName,
    /// A name starts with neither `-` nor `--`.
    #[error("parameter name must start with '-' or '--': {0}")]
    InvalidName(String),
    /// A long name is `--` followed by nothing, or by another dash.
    #[error("invalid long option name: {0}")]
    InvalidLongName(String),
    /// A short name is not a dash plus exactly one character.
    #[error("invalid short option name: {0}")]
    InvalidShortName(String),
    /// Two parameters of one command share a name.
    #[error("duplicate parameter name: {0}")]
    DuplicateName(String),
    /// Two exposed parameters of one command bind the same value key.
    #[error("duplicate value binding: {0}")]
    DuplicateValueKey(String),
    /// Two subcommands of one command share a name or alias.
    #[error("duplicate subcommand: {0}")]
    DuplicateSubcommand(String),
    /// An option was declared with arity zero (that is what flags are for).
    #[error("option {0} must consume at least one value")]
    InvalidArity(String),
    /// A version flag was declared but the command carries no version
    /// string and the flag no custom message.
    #[error("command '{0}' declares a version flag but no version")]
    MissingVersion(String),
}

/// Bad input to a parse pass.
///
/// Raised immediately on detection, never batched; each variant carries the
/// parameter name or offending token needed for a one-line diagnostic.
/// Propagates unmodified out of [`Command::run`](crate::Command::run) and is
/// converted to printed output plus exit code 2 only by
/// [`Command::main`](crate::Command::main).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    /// An option-looking token matched no declared name.
    #[error("no such option: {name}")]
    NoSuchOption { name: String },
    /// The first unclaimed positional matched no subcommand.
    #[error("no such command: {name}")]
    NoSuchSubcommand { name: String },
    /// A command with subcommands was invoked without one.
    #[error("'{command}' requires a subcommand")]
    MissingSubcommand { command: String },
    /// The token stream ran dry while collecting an option's values.
    #[error("option {name} requires {expected} value(s) but got {found}")]
    MissingValues {
        name: String,
        expected: usize,
        found: usize,
    },
    /// A flag was given an inline `=value`.
    #[error("option {name} does not take a value")]
    UnexpectedValue { name: String },
    /// Too few positional tokens for a fixed-arity argument.
    #[error("argument {name} takes {expected} value(s) but got {found}")]
    WrongArgumentCount {
        name: String,
        expected: usize,
        found: usize,
    },
    /// A required parameter never occurred and has no default.
    #[error("missing required parameter: {name}")]
    MissingParameter { name: String },
    /// A raw token failed its parameter's typed conversion.
    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },
    /// Positional tokens claimed by no argument or subcommand.
    #[error("unexpected extra arguments: {}", .args.join(" "))]
    UnexpectedArguments { args: Vec<String> },
    /// Free-form failure raised by a command target.
    #[error("{0}")]
    Message(String),
}

/// An intentional early exit: help or a message-and-exit parameter.
///
/// Not an error — it represents a successful, deliberate termination and
/// carries the text to print plus the process exit code (0 unless
/// configured otherwise).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Termination {
    /// Text printed at the `main` boundary.
    pub message: String,
    /// Process exit code implied by this termination.
    pub code: i32,
}

impl Termination {
    /// A message-and-exit termination with exit code 0.
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            message: text.into(),
            code: 0,
        }
    }
}

/// How a successful [`run`](crate::Command::run) ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every target along the dispatch chain ran to completion.
    Completed,
    /// An eager parameter ended the run early, bypassing all remaining
    /// validation and dispatch.
    Halted(Termination),
}

/// Internal short-circuit for the scan loop: either tier, one `?`.
#[derive(Debug)]
pub(crate) enum Interrupt {
    Usage(UsageError),
    Halt(Termination),
}

impl From<UsageError> for Interrupt {
    fn from(err: UsageError) -> Self {
        Interrupt::Usage(err)
    }
}
