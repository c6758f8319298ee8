//! Typed command-line parameters, declared programmatically.
//!
//! This crate lets a program declare its options, flags, and positional
//! arguments as values, then parses raw process arguments into typed
//! values before a supplied target routine runs:
//!
//! - [`Opt`], [`Flag`], [`Arg`] — immutable parameter descriptors with
//!   aliases, arity, defaults, and typed conversion ([`ValueType`]).
//! - [`Command`] — aggregates parameters, subcommands, and a target;
//!   validated once at build time, immutable thereafter.
//! - [`Context`] — per-invocation tree node with parent links and a
//!   type-keyed object registry shared down the dispatch chain.
//! - The parse pass handles grouped short flags (`-xyz`), counted flags,
//!   inline values (`--name=value`), the `--` positionals terminator, and
//!   eager parameters (help, version) that halt everything else.
//!
//! # Example
//!
//! ```
//! use argot_core::{Arg, Command, Flag, Opt, Outcome, Value, ValueType};
//!
//! let cmd = Command::builder("repeat")
//!     .about("Print a message a few times")
//!     .param(
//!         Opt::new(["-c", "--count"])
//!             .value_type(ValueType::Int)
//!             .default_value(Value::Int(1)),
//!     )
//!     .param(Flag::new(["-v", "--verbose"]).counted())
//!     .param(Arg::new("message"))
//!     .target(|inv| {
//!         let count = inv.int_value("count").unwrap_or(1);
//!         let message = inv.str_value("message").unwrap_or_default();
//!         for _ in 0..count {
//!             let _ = message;
//!         }
//!         Ok(())
//!     })
//!     .build()
//!     .unwrap();
//!
//! let outcome = cmd.run(["-vv", "--count", "3", "hello"]).unwrap();
//! assert_eq!(outcome, Outcome::Completed);
//! ```
//!
//! # Error tiers
//!
//! Structural mistakes surface at [`CommandBuilder::build`] as
//! [`BuildError`] and are never caught by the library. Bad user input
//! surfaces from [`Command::run`] as [`UsageError`]; help and version
//! requests surface as [`Outcome::Halted`] — an intentional early exit,
//! not an error. [`Command::main`] is the only place either is converted
//! to printed output and an exit code.

mod command;
mod context;
mod error;
mod help;
mod param;
mod parser;
mod value;

pub use command::{Command, CommandBuilder, Invocation, Target};
pub use context::{Context, ContextSettings};
pub use error::{BuildError, Outcome, Termination, UsageError};
pub use help::{HelpEntry, HelpPage, help_page, render_help};
pub use param::{Arg, Arity, Flag, FlagAction, Opt, Param};
pub use value::{Value, ValueType};
