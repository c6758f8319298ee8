//! The parameter model: options, flags, and positional arguments.
//!
//! A parameter is an immutable descriptor built up with chainable methods
//! and handed to a command builder. Structural validation (name formats,
//! collisions, arity) happens once, when the owning command is built.

use serde::Serialize;

use crate::value::{Value, ValueType};

/// A named parameter that consumes one or more value tokens per occurrence.
///
/// Options are matched by any of their declared aliases (`-o`, `--output`,
/// `--output=FILE`). Long names must start with `--`; short names are a
/// single dash plus one character.
///
/// # Examples
///
/// ```
/// use argot_core::{Opt, Value, ValueType};
///
/// let count = Opt::new(["-c", "--count"])
///     .value_type(ValueType::Int)
///     .default_value(Value::Int(5))
///     .help("How many times to run");
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Opt {
    pub(crate) names: Vec<String>,
    pub(crate) nargs: usize,
    pub(crate) value_type: ValueType,
    pub(crate) default: Option<Value>,
    pub(crate) required: bool,
    pub(crate) multiple: bool,
    pub(crate) eager: bool,
    pub(crate) expose: bool,
    pub(crate) hidden: bool,
    pub(crate) metavar: Option<String>,
    pub(crate) help: Option<String>,
}

impl Opt {
    /// Creates an option with the given aliases, consuming one string value.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            nargs: 1,
            value_type: ValueType::Str,
            default: None,
            required: false,
            multiple: false,
            eager: false,
            expose: true,
            hidden: false,
            metavar: None,
            help: None,
        }
    }

    /// Sets the conversion applied to each value token.
    pub fn value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    /// Number of value tokens one occurrence consumes (default 1).
    pub fn nargs(mut self, nargs: usize) -> Self {
        self.nargs = nargs;
        self
    }

    /// Value bound when the option never occurs.
    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Makes absence (with no default) a usage error.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Accumulates every occurrence into a list.
    ///
    /// Without this, a repeated option binds its last occurrence only.
    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    /// Processes this option the moment it is seen during the scan.
    pub fn eager(mut self) -> Self {
        self.eager = true;
        self
    }

    /// Excludes this option from the bound-value map.
    pub fn unexposed(mut self) -> Self {
        self.expose = false;
        self
    }

    /// Hides this option from help output.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Placeholder shown in help output instead of the type-derived one.
    pub fn metavar(mut self, metavar: impl Into<String>) -> Self {
        self.metavar = Some(metavar.into());
        self
    }

    /// Help text shown for this option.
    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.help = Some(text.into());
        self
    }
}

/// What recording an occurrence of a [`Flag`] means.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FlagAction {
    /// Presence binds `Bool(true)`.
    Set,
    /// Occurrences are counted; binds `Int(n)`.
    Count,
    /// Eager: terminate the parse with rendered help.
    Help,
    /// Eager: terminate the parse with a version message.
    ///
    /// `None` renders `"<name>, version <version>"` from the root command.
    Version { message: Option<String> },
}

/// A named parameter of arity zero: its presence alone carries meaning.
///
/// # Examples
///
/// ```
/// use argot_core::Flag;
///
/// let verbose = Flag::new(["-v", "--verbose"]).counted();
/// let version = Flag::version_flag(["-V", "--version"]);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Flag {
    pub(crate) names: Vec<String>,
    pub(crate) action: FlagAction,
    pub(crate) default: Option<Value>,
    pub(crate) eager: bool,
    pub(crate) expose: bool,
    pub(crate) hidden: bool,
    pub(crate) help: Option<String>,
}

impl Flag {
    /// Creates a boolean flag: absent binds `Bool(false)`, present `Bool(true)`.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            action: FlagAction::Set,
            default: None,
            eager: false,
            expose: true,
            hidden: false,
            help: None,
        }
    }

    /// Creates an eager flag that terminates the parse with a version line.
    ///
    /// Building a command with this flag fails unless the command declares a
    /// version string or [`version_message`](Self::version_message) is set.
    pub fn version_flag<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            action: FlagAction::Version { message: None },
            eager: true,
            expose: false,
            ..Self::new(names)
        }
    }

    /// Creates an eager flag that terminates the parse with rendered help.
    ///
    /// Commands already answer their context's help aliases (`-h`, `--help`
    /// by default) without declaring this; declare it to give the help flag
    /// custom help text or extra aliases of its own.
    pub fn help_flag<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            action: FlagAction::Help,
            eager: true,
            expose: false,
            ..Self::new(names)
        }
    }

    /// Binds the number of occurrences instead of a boolean.
    pub fn counted(mut self) -> Self {
        self.action = FlagAction::Count;
        self
    }

    /// Value bound when the flag never occurs (`Bool(false)` or `Int(0)`
    /// otherwise).
    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Exact message emitted by a version flag, replacing the default line.
    pub fn version_message(mut self, message: impl Into<String>) -> Self {
        if let FlagAction::Version { .. } = self.action {
            self.action = FlagAction::Version {
                message: Some(message.into()),
            };
        }
        self
    }

    /// Processes this flag the moment it is seen during the scan.
    pub fn eager(mut self) -> Self {
        self.eager = true;
        self
    }

    /// Excludes this flag from the bound-value map.
    pub fn unexposed(mut self) -> Self {
        self.expose = false;
        self
    }

    /// Hides this flag from help output.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Help text shown for this flag.
    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.help = Some(text.into());
        self
    }
}

/// How many positional tokens an [`Arg`] claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Arity {
    /// Exactly this many tokens.
    Exact(usize),
    /// Every remaining token not reserved by later required arguments.
    Rest,
}

/// A positional parameter, matched by position rather than by name.
///
/// Arguments are required by default; [`optional`](Self::optional),
/// [`default_value`](Self::default_value), and [`rest`](Self::rest) relax
/// that.
///
/// # Examples
///
/// ```
/// use argot_core::Arg;
///
/// let source = Arg::new("source");
/// let extras = Arg::new("extras").rest();
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Arg {
    pub(crate) name: String,
    pub(crate) arity: Arity,
    pub(crate) value_type: ValueType,
    pub(crate) default: Option<Value>,
    pub(crate) required: bool,
    pub(crate) expose: bool,
    pub(crate) hidden: bool,
    pub(crate) help: Option<String>,
}

impl Arg {
    /// Creates a required single-token argument with the given display name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arity: Arity::Exact(1),
            value_type: ValueType::Str,
            default: None,
            required: true,
            expose: true,
            hidden: false,
            help: None,
        }
    }

    /// Claims exactly `n` positional tokens, binding a list when `n > 1`.
    pub fn nargs(mut self, n: usize) -> Self {
        self.arity = Arity::Exact(n);
        self
    }

    /// Claims all remaining positional tokens not reserved by later
    /// required arguments. Implies optional; binds a (possibly empty) list.
    pub fn rest(mut self) -> Self {
        self.arity = Arity::Rest;
        self.required = false;
        self
    }

    /// Sets the conversion applied to each claimed token.
    pub fn value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    /// Value bound when no token is claimed. Implies optional.
    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self.required = false;
        self
    }

    /// Makes absence bind nothing instead of raising a usage error.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Excludes this argument from the bound-value map.
    pub fn unexposed(mut self) -> Self {
        self.expose = false;
        self
    }

    /// Hides this argument from help output.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Help text shown for this argument.
    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.help = Some(text.into());
        self
    }
}

/// Any declared parameter of a command.
#[derive(Debug, Clone, Serialize)]
pub enum Param {
    Opt(Opt),
    Flag(Flag),
    Arg(Arg),
}

impl Param {
    /// All names this parameter answers to (empty for arguments).
    pub(crate) fn names(&self) -> &[String] {
        match self {
            Param::Opt(o) => &o.names,
            Param::Flag(f) => &f.names,
            Param::Arg(_) => &[],
        }
    }

    pub(crate) fn is_positional(&self) -> bool {
        matches!(self, Param::Arg(_))
    }

    pub(crate) fn eager(&self) -> bool {
        match self {
            Param::Opt(o) => o.eager,
            Param::Flag(f) => f.eager,
            Param::Arg(_) => false,
        }
    }

    pub(crate) fn expose(&self) -> bool {
        match self {
            Param::Opt(o) => o.expose,
            Param::Flag(f) => f.expose,
            Param::Arg(a) => a.expose,
        }
    }

    pub(crate) fn hidden(&self) -> bool {
        match self {
            Param::Opt(o) => o.hidden,
            Param::Flag(f) => f.hidden,
            Param::Arg(a) => a.hidden,
        }
    }

    /// The name used in diagnostics: first long alias, else first alias,
    /// else the argument's display name.
    pub(crate) fn preferred_name(&self) -> &str {
        match self {
            Param::Arg(a) => &a.name,
            _ => {
                let names = self.names();
                names
                    .iter()
                    .find(|n| n.starts_with("--"))
                    .or_else(|| names.first())
                    .map(String::as_str)
                    .unwrap_or_default()
            }
        }
    }

    /// The key this parameter binds its value under.
    ///
    /// Derived from the preferred name with dashes stripped and interior
    /// `-` turned into `_`; must be unique among a command's exposed
    /// parameters.
    pub(crate) fn value_key(&self) -> String {
        self.preferred_name()
            .trim_start_matches('-')
            .replace('-', "_")
    }
}

impl From<Opt> for Param {
    fn from(opt: Opt) -> Self {
        Param::Opt(opt)
    }
}

impl From<Flag> for Param {
    fn from(flag: Flag) -> Self {
        Param::Flag(flag)
    }
}

impl From<Arg> for Param {
    fn from(arg: Arg) -> Self {
        Param::Arg(arg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_key_prefers_long_name() {
        let p: Param = Opt::new(["-n", "--dry-run"]).into();
        assert_eq!(p.value_key(), "dry_run");
        assert_eq!(p.preferred_name(), "--dry-run");
    }

    #[test]
    fn test_value_key_falls_back_to_short_name() {
        let p: Param = Flag::new(["-x"]).into();
        assert_eq!(p.value_key(), "x");
    }

    #[test]
    fn test_argument_key_is_its_name() {
        let p: Param = Arg::new("input-file").into();
        assert_eq!(p.value_key(), "input_file");
    }

    #[test]
    fn test_version_flag_is_eager_and_unexposed() {
        let flag = Flag::version_flag(["--version"]);
        assert!(flag.eager);
        assert!(!flag.expose);
        assert_eq!(flag.action, FlagAction::Version { message: None });
    }

    #[test]
    fn test_rest_argument_is_optional() {
        let arg = Arg::new("files").rest();
        assert_eq!(arg.arity, Arity::Rest);
        assert!(!arg.required);
    }

    #[test]
    fn test_default_value_relaxes_required() {
        let arg = Arg::new("name").default_value(Value::Str("world".into()));
        assert!(!arg.required);
    }
}
