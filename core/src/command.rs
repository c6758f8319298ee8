//! Command aggregation and dispatch.
//!
//! A [`Command`] owns its parameter list, its subcommands, and the target
//! invoked with bound values. It is built once through a validating builder
//! and immutable thereafter; every structural mistake surfaces at
//! [`CommandBuilder::build`] as a [`BuildError`], never at parse time.

use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

use tracing::debug;

use crate::context::{Context, ContextSettings};
use crate::error::{BuildError, Interrupt, Outcome, UsageError};
use crate::help;
use crate::param::{Arg, Arity, FlagAction, Param};
use crate::parser;
use crate::value::{Value, ValueType};

/// The routine a command invokes once its parameters are bound.
pub type Target = Box<dyn Fn(&Invocation<'_>) -> Result<(), UsageError>>;

/// Bound values plus the execution context, handed to a command target.
///
/// Values are looked up under each parameter's value key: the preferred
/// name with dashes stripped and `-` turned into `_` (`--dry-run` binds
/// under `dry_run`). A parameter that never occurred and has neither a
/// default nor an implied zero-value binds nothing.
pub struct Invocation<'a> {
    ctx: Rc<Context<'a>>,
    values: HashMap<String, Value>,
}

impl<'a> Invocation<'a> {
    /// The context this command executes under.
    pub fn context(&self) -> &Rc<Context<'a>> {
        &self.ctx
    }

    /// The bound value for a key, if any.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Shorthand for a bound string value.
    pub fn str_value(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Shorthand for a bound integer value.
    pub fn int_value(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_int)
    }

    /// Shorthand for a bound float value.
    pub fn float_value(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_float)
    }

    /// Shorthand for a bound boolean value.
    pub fn bool_value(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    /// Shorthand for a bound list value.
    pub fn list_value(&self, key: &str) -> Option<&[Value]> {
        self.get(key).and_then(Value::as_list)
    }

    /// The full key → value map.
    pub fn values(&self) -> &HashMap<String, Value> {
        &self.values
    }
}

/// An executable command: parameters, subcommands, and a target.
///
/// # Examples
///
/// ```
/// use argot_core::{Command, Flag, Outcome};
///
/// let cmd = Command::builder("greet")
///     .param(Flag::new(["-l", "--loud"]))
///     .target(|inv| {
///         let _loud = inv.bool_value("loud").unwrap_or(false);
///         Ok(())
///     })
///     .build()
///     .unwrap();
///
/// let outcome = cmd.run(["--loud"]).unwrap();
/// assert_eq!(outcome, Outcome::Completed);
/// ```
pub struct Command {
    name: String,
    about: Option<String>,
    version: Option<String>,
    aliases: Vec<String>,
    params: Vec<Param>,
    subcommands: Vec<Command>,
    allow_interspersed: bool,
    invoke_without_subcommand: bool,
    help_names: Vec<String>,
    target: Option<Target>,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("about", &self.about)
            .field("version", &self.version)
            .field("aliases", &self.aliases)
            .field("params", &self.params)
            .field("subcommands", &self.subcommands)
            .field("allow_interspersed", &self.allow_interspersed)
            .field("invoke_without_subcommand", &self.invoke_without_subcommand)
            .field("help_names", &self.help_names)
            .field("target", &self.target.as_ref().map(|_| "<target>"))
            .finish()
    }
}

impl Command {
    /// Starts building a command with the given name.
    pub fn builder(name: impl Into<String>) -> CommandBuilder {
        CommandBuilder {
            name: name.into(),
            about: None,
            version: None,
            aliases: Vec::new(),
            params: Vec::new(),
            subcommands: Vec::new(),
            allow_interspersed: true,
            invoke_without_subcommand: false,
            help_names: vec!["-h".to_string(), "--help".to_string()],
            target: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn about(&self) -> Option<&str> {
        self.about.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Alternate names this command answers to as a subcommand.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn subcommands(&self) -> &[Command] {
        &self.subcommands
    }

    /// Default help aliases, used when the context carries no override.
    pub fn help_names(&self) -> &[String] {
        &self.help_names
    }

    pub fn allow_interspersed(&self) -> bool {
        self.allow_interspersed
    }

    pub fn has_subcommands(&self) -> bool {
        !self.subcommands.is_empty()
    }

    /// Finds a subcommand by name or alias.
    pub fn find_subcommand(&self, name: &str) -> Option<&Command> {
        self.subcommands
            .iter()
            .find(|sub| sub.name == name || sub.aliases.iter().any(|alias| alias == name))
    }

    /// Parses tokens, binds values, and invokes targets down the
    /// subcommand chain.
    ///
    /// Every signal propagates unmodified: usage errors as `Err`, eager
    /// terminations as [`Outcome::Halted`]. This is the entry point for
    /// programmatic embedding and tests; executables usually go through
    /// [`main`](Self::main).
    pub fn run<I, S>(&self, args: I) -> Result<Outcome, UsageError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.run_node(args.into_iter().map(Into::into).collect(), None, None)
    }

    /// Like [`run`](Self::run), with seed state for the root context.
    pub fn run_with<I, S>(&self, args: I, settings: ContextSettings) -> Result<Outcome, UsageError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.run_node(
            args.into_iter().map(Into::into).collect(),
            None,
            Some(settings),
        )
    }

    /// The process boundary: runs, prints, and returns an exit code.
    ///
    /// Terminations print their message to stdout and return their code
    /// (0 for help and version). Usage errors print a usage line and a
    /// one-line diagnostic to stderr and return 2. Configuration errors
    /// never reach this point — they surface from
    /// [`CommandBuilder::build`].
    pub fn main<I, S>(&self, args: I) -> i32
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match self.run(args) {
            Ok(Outcome::Completed) => 0,
            Ok(Outcome::Halted(termination)) => {
                println!("{}", termination.message);
                termination.code
            }
            Err(err) => {
                eprintln!("{}", help::usage_line(self, &self.name));
                eprintln!("Error: {err}");
                2
            }
        }
    }

    fn run_node<'a>(
        &'a self,
        args: Vec<String>,
        parent: Option<Rc<Context<'a>>>,
        settings: Option<ContextSettings>,
    ) -> Result<Outcome, UsageError> {
        let ctx = Context::new(self, parent, settings);

        let parser::ScanResult {
            mut occurrences,
            positionals,
        } = match parser::scan(self, &ctx, &args) {
            Ok(result) => result,
            Err(Interrupt::Halt(termination)) => return Ok(Outcome::Halted(termination)),
            Err(Interrupt::Usage(err)) => return Err(err),
        };

        let (claims, leftover) = self.distribute_positionals(positionals)?;
        let mut claim_iter = claims.into_iter();
        for (idx, param) in self.params.iter().enumerate() {
            if param.is_positional()
                && let Some(claim) = claim_iter.next()
                && !claim.is_empty()
            {
                occurrences[idx].push(claim);
            }
        }

        let mut dispatch: Option<(&Command, Vec<String>)> = None;
        if self.has_subcommands() {
            let mut rest = leftover;
            if rest.is_empty() {
                if !self.invoke_without_subcommand {
                    return Err(UsageError::MissingSubcommand {
                        command: self.name.clone(),
                    });
                }
            } else {
                let name = rest.remove(0);
                match self.find_subcommand(&name) {
                    Some(sub) => dispatch = Some((sub, rest)),
                    None => return Err(UsageError::NoSuchSubcommand { name }),
                }
            }
        } else if !leftover.is_empty() {
            return Err(UsageError::UnexpectedArguments { args: leftover });
        }

        let values = self.bind_values(&occurrences)?;

        // The parent target runs first so it can register context objects
        // the subcommand looks up.
        if let Some(target) = &self.target {
            let invocation = Invocation {
                ctx: Rc::clone(&ctx),
                values,
            };
            target(&invocation)?;
        }

        if let Some((sub, tail)) = dispatch {
            debug!(command = %self.name, subcommand = %sub.name, "dispatching subcommand");
            return sub.run_node(tail, Some(ctx), None);
        }

        Ok(Outcome::Completed)
    }

    /// Hands positional tokens to positional parameters in declaration
    /// order; returns per-argument claims plus the unclaimed remainder.
    fn distribute_positionals(
        &self,
        positionals: Vec<String>,
    ) -> Result<(Vec<Vec<String>>, Vec<String>), UsageError> {
        let arg_params: Vec<&Arg> = self
            .params
            .iter()
            .filter_map(|p| match p {
                Param::Arg(a) => Some(a),
                _ => None,
            })
            .collect();

        // Required arguments after a variadic one reserve tokens it may
        // not take.
        let mut reserve_after = vec![0usize; arg_params.len()];
        let mut reserved = 0usize;
        for (i, arg) in arg_params.iter().enumerate().rev() {
            reserve_after[i] = reserved;
            if arg.required {
                reserved += match arg.arity {
                    Arity::Exact(n) => n,
                    Arity::Rest => 1,
                };
            }
        }

        let mut queue: VecDeque<String> = positionals.into();
        let mut claims = Vec::with_capacity(arg_params.len());
        for (i, arg) in arg_params.iter().enumerate() {
            match arg.arity {
                Arity::Exact(n) => {
                    if queue.len() >= n {
                        claims.push(queue.drain(..n).collect());
                    } else if queue.is_empty() {
                        // Binding decides between default and
                        // missing-required.
                        claims.push(Vec::new());
                    } else {
                        return Err(UsageError::WrongArgumentCount {
                            name: arg.name.clone(),
                            expected: n,
                            found: queue.len(),
                        });
                    }
                }
                Arity::Rest => {
                    if self.has_subcommands() {
                        // Subcommands take priority over variadic
                        // arguments; the tail is theirs.
                        claims.push(Vec::new());
                    } else {
                        let take = queue.len().saturating_sub(reserve_after[i]);
                        claims.push(queue.drain(..take).collect());
                    }
                }
            }
        }

        Ok((claims, queue.into_iter().collect()))
    }

    /// Converts accumulated occurrences into the bound-value map.
    fn bind_values(
        &self,
        occurrences: &[Vec<Vec<String>>],
    ) -> Result<HashMap<String, Value>, UsageError> {
        let mut values = HashMap::new();

        for (param, groups) in self.params.iter().zip(occurrences) {
            if !param.expose() {
                continue;
            }
            let key = param.value_key();
            match param {
                Param::Flag(flag) => {
                    let count = groups.len();
                    let bound = match flag.action {
                        FlagAction::Set => {
                            if count > 0 {
                                Value::Bool(true)
                            } else {
                                flag.default.clone().unwrap_or(Value::Bool(false))
                            }
                        }
                        FlagAction::Count => {
                            if count > 0 {
                                Value::Int(count as i64)
                            } else {
                                flag.default.clone().unwrap_or(Value::Int(0))
                            }
                        }
                        // Terminating actions never bind; they halt the
                        // scan long before this point.
                        FlagAction::Help | FlagAction::Version { .. } => continue,
                    };
                    values.insert(key, bound);
                }
                Param::Opt(opt) => {
                    let name = param.preferred_name();
                    if groups.is_empty() {
                        if let Some(default) = &opt.default {
                            values.insert(key, default.clone());
                        } else if opt.required {
                            return Err(UsageError::MissingParameter {
                                name: name.to_string(),
                            });
                        }
                    } else if opt.multiple {
                        let mut items = Vec::with_capacity(groups.len());
                        for group in groups {
                            items.push(convert_group(&opt.value_type, group, name)?);
                        }
                        values.insert(key, Value::List(items));
                    } else if let Some(group) = groups.last() {
                        // A repeated option binds its last occurrence.
                        values.insert(key, convert_group(&opt.value_type, group, name)?);
                    }
                }
                Param::Arg(arg) => match groups.first() {
                    None => {
                        if let Some(default) = &arg.default {
                            values.insert(key, default.clone());
                        } else if arg.required {
                            return Err(UsageError::MissingParameter {
                                name: arg.name.clone(),
                            });
                        } else if matches!(arg.arity, Arity::Rest) {
                            values.insert(key, Value::List(Vec::new()));
                        }
                    }
                    Some(tokens) => {
                        let bound = match arg.arity {
                            Arity::Rest => {
                                convert_list(&arg.value_type, tokens, &arg.name)?
                            }
                            Arity::Exact(_) => {
                                convert_group(&arg.value_type, tokens, &arg.name)?
                            }
                        };
                        values.insert(key, bound);
                    }
                },
            }
        }

        Ok(values)
    }
}

/// One occurrence's tokens: a scalar for single-token groups, a list
/// otherwise.
fn convert_group(
    value_type: &ValueType,
    tokens: &[String],
    name: &str,
) -> Result<Value, UsageError> {
    match tokens {
        [single] => value_type.convert(single).map_err(|reason| {
            UsageError::InvalidValue {
                name: name.to_string(),
                reason,
            }
        }),
        _ => convert_list(value_type, tokens, name),
    }
}

fn convert_list(
    value_type: &ValueType,
    tokens: &[String],
    name: &str,
) -> Result<Value, UsageError> {
    let mut items = Vec::with_capacity(tokens.len());
    for token in tokens {
        items.push(value_type.convert(token).map_err(|reason| {
            UsageError::InvalidValue {
                name: name.to_string(),
                reason,
            }
        })?);
    }
    Ok(Value::List(items))
}

/// Builds a [`Command`], validating its structure once at the end.
pub struct CommandBuilder {
    name: String,
    about: Option<String>,
    version: Option<String>,
    aliases: Vec<String>,
    params: Vec<Param>,
    subcommands: Vec<Command>,
    allow_interspersed: bool,
    invoke_without_subcommand: bool,
    help_names: Vec<String>,
    target: Option<Target>,
}

impl CommandBuilder {
    /// One-line description shown in help output.
    pub fn about(mut self, text: impl Into<String>) -> Self {
        self.about = Some(text.into());
        self
    }

    /// Version string rendered by a declared version flag.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Alternate name this command answers to as a subcommand.
    pub fn alias(mut self, name: impl Into<String>) -> Self {
        self.aliases.push(name.into());
        self
    }

    /// Declares a parameter. Declaration order is positional order for
    /// arguments.
    pub fn param(mut self, param: impl Into<Param>) -> Self {
        self.params.push(param.into());
        self
    }

    /// Declares a subcommand (already built, unique by name and alias).
    pub fn subcommand(mut self, command: Command) -> Self {
        self.subcommands.push(command);
        self
    }

    /// Whether options may follow positional tokens (default true).
    ///
    /// Commands with subcommands always scan as if this were false, so the
    /// subcommand's argv passes through untouched.
    pub fn allow_interspersed(mut self, allow: bool) -> Self {
        self.allow_interspersed = allow;
        self
    }

    /// Lets a command with subcommands run its own target when no
    /// subcommand token is given (default: that is a usage error).
    pub fn invoke_without_subcommand(mut self, allow: bool) -> Self {
        self.invoke_without_subcommand = allow;
        self
    }

    /// Replaces the default `-h`, `--help` aliases for this command.
    pub fn help_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.help_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// The routine invoked with bound values.
    pub fn target(
        mut self,
        target: impl Fn(&Invocation<'_>) -> Result<(), UsageError> + 'static,
    ) -> Self {
        self.target = Some(Box::new(target));
        self
    }

    /// Validates the declared structure and produces the command.
    ///
    /// # Examples
    ///
    /// ```
    /// use argot_core::{BuildError, Command, Flag};
    ///
    /// let err = Command::builder("app")
    ///     .param(Flag::new(["--verbose"]))
    ///     .param(Flag::new(["--verbose"]))
    ///     .build()
    ///     .unwrap_err();
    /// assert_eq!(err, BuildError::DuplicateName("--verbose".to_string()));
    /// ```
    pub fn build(self) -> Result<Command, BuildError> {
        let mut seen_names: HashSet<&str> = HashSet::new();
        let mut seen_keys: HashSet<String> = HashSet::new();

        for param in &self.params {
            match param {
                Param::Opt(opt) => {
                    if opt.names.is_empty() {
                        return Err(BuildError::MissingName);
                    }
                    if opt.nargs == 0 {
                        return Err(BuildError::InvalidArity(
                            param.preferred_name().to_string(),
                        ));
                    }
                }
                Param::Flag(flag) => {
                    if flag.names.is_empty() {
                        return Err(BuildError::MissingName);
                    }
                    if let FlagAction::Version { message } = &flag.action
                        && message.is_none()
                        && self.version.is_none()
                    {
                        return Err(BuildError::MissingVersion(self.name.clone()));
                    }
                }
                Param::Arg(arg) => {
                    if arg.name.is_empty() {
                        return Err(BuildError::MissingName);
                    }
                }
            }

            for name in param.names() {
                validate_name(name)?;
                if !seen_names.insert(name.as_str()) {
                    return Err(BuildError::DuplicateName(name.clone()));
                }
            }
            if param.expose() && !seen_keys.insert(param.value_key()) {
                return Err(BuildError::DuplicateValueKey(param.value_key()));
            }
        }

        let mut seen_subs: HashSet<&str> = HashSet::new();
        for sub in &self.subcommands {
            let names =
                std::iter::once(sub.name.as_str()).chain(sub.aliases.iter().map(String::as_str));
            for name in names {
                if !seen_subs.insert(name) {
                    return Err(BuildError::DuplicateSubcommand(name.to_string()));
                }
            }
        }

        Ok(Command {
            name: self.name,
            about: self.about,
            version: self.version,
            aliases: self.aliases,
            params: self.params,
            subcommands: self.subcommands,
            allow_interspersed: self.allow_interspersed,
            invoke_without_subcommand: self.invoke_without_subcommand,
            help_names: self.help_names,
            target: self.target,
        })
    }
}

fn validate_name(name: &str) -> Result<(), BuildError> {
    if let Some(rest) = name.strip_prefix("--") {
        if rest.is_empty() || rest.starts_with('-') {
            return Err(BuildError::InvalidLongName(name.to_string()));
        }
    } else if let Some(rest) = name.strip_prefix('-') {
        if rest.chars().count() != 1 {
            return Err(BuildError::InvalidShortName(name.to_string()));
        }
    } else {
        return Err(BuildError::InvalidName(name.to_string()));
    }
    Ok(())
}
