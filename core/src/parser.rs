//! The argv scan engine.
//!
//! One left-to-right pass over the raw tokens with a single token of
//! lookahead for value consumption. The scan only *collects* raw
//! occurrences; typed conversion and required-parameter checks happen
//! afterwards, in the binding step — except for eager parameters, which are
//! processed the moment their occurrence is recorded and may halt the whole
//! pass before any later validation runs.

use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;

use crate::command::Command;
use crate::context::Context;
use crate::error::{Interrupt, Termination, UsageError};
use crate::help;
use crate::param::{FlagAction, Param};

/// Raw occurrences collected by one scan, indexed by parameter position.
/// Each occurrence is the group of value tokens it consumed (empty for
/// flags).
#[derive(Debug)]
pub(crate) struct ScanResult {
    pub(crate) occurrences: Vec<Vec<Vec<String>>>,
    pub(crate) positionals: Vec<String>,
}

/// What a long or short name resolves to.
#[derive(Debug, Clone, Copy)]
enum Named {
    Opt { idx: usize, nargs: usize },
    Flag(usize),
    /// The context's help aliases, injected where no declared name wins.
    Help,
}

pub(crate) fn scan(
    cmd: &Command,
    ctx: &Rc<Context<'_>>,
    args: &[String],
) -> Result<ScanResult, Interrupt> {
    let params = cmd.params();
    let (longs, shorts) = name_tables(cmd, ctx);
    // Subcommand argv must pass through untouched, so the presence of
    // subcommands freezes the scan at the first positional.
    let interspersed = cmd.allow_interspersed() && !cmd.has_subcommands();

    let mut occurrences: Vec<Vec<Vec<String>>> = params.iter().map(|_| Vec::new()).collect();
    let mut positionals = Vec::new();
    let mut positional_only = false;

    debug!(command = %cmd.name(), count = args.len(), "scanning tokens");

    let mut i = 0;
    while i < args.len() {
        let token = args[i].as_str();
        i += 1;

        if positional_only || token == "-" || !token.starts_with('-') {
            positionals.push(token.to_string());
            if !interspersed {
                // Everything after the first positional passes through
                // verbatim, option-looking or not.
                positionals.extend(args[i..].iter().cloned());
                break;
            }
            continue;
        }

        if token == "--" {
            positional_only = true;
            continue;
        }

        if let Some(body) = token.strip_prefix("--") {
            let (name_part, inline) = match body.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (body, None),
            };
            let display_name = format!("--{name_part}");
            let Some(&named) = longs.get(display_name.as_str()) else {
                return Err(UsageError::NoSuchOption { name: display_name }.into());
            };
            match named {
                Named::Help => {
                    if inline.is_some() {
                        return Err(UsageError::UnexpectedValue { name: display_name }.into());
                    }
                    return Err(Interrupt::Halt(help_termination(ctx)));
                }
                Named::Flag(idx) => {
                    if inline.is_some() {
                        return Err(UsageError::UnexpectedValue { name: display_name }.into());
                    }
                    occurrences[idx].push(Vec::new());
                    process_eager(cmd, ctx, &params[idx])?;
                }
                Named::Opt { idx, nargs } => {
                    let mut values = Vec::with_capacity(nargs);
                    if let Some(value) = inline {
                        values.push(value.to_string());
                    }
                    while values.len() < nargs {
                        if i < args.len() {
                            values.push(args[i].clone());
                            i += 1;
                        } else {
                            return Err(UsageError::MissingValues {
                                name: display_name,
                                expected: nargs,
                                found: values.len(),
                            }
                            .into());
                        }
                    }
                    debug!(option = %display_name, values = ?values, "matched long option");
                    occurrences[idx].push(values);
                    process_eager(cmd, ctx, &params[idx])?;
                }
            }
            continue;
        }

        // Grouped short names: each character is looked up in turn; a
        // value-taking option ends the group and the rest of the token (if
        // any) becomes its first value.
        let body = &token[1..];
        for (pos, ch) in body.char_indices() {
            let display_name = format!("-{ch}");
            let Some(&named) = shorts.get(&ch) else {
                return Err(UsageError::NoSuchOption { name: display_name }.into());
            };
            match named {
                Named::Help => {
                    return Err(Interrupt::Halt(help_termination(ctx)));
                }
                Named::Flag(idx) => {
                    occurrences[idx].push(Vec::new());
                    process_eager(cmd, ctx, &params[idx])?;
                }
                Named::Opt { idx, nargs } => {
                    let rest = &body[pos + ch.len_utf8()..];
                    let mut values = Vec::with_capacity(nargs);
                    if !rest.is_empty() {
                        values.push(rest.to_string());
                    }
                    while values.len() < nargs {
                        if i < args.len() {
                            values.push(args[i].clone());
                            i += 1;
                        } else {
                            return Err(UsageError::MissingValues {
                                name: display_name,
                                expected: nargs,
                                found: values.len(),
                            }
                            .into());
                        }
                    }
                    debug!(option = %display_name, values = ?values, "matched short option");
                    occurrences[idx].push(values);
                    process_eager(cmd, ctx, &params[idx])?;
                    break;
                }
            }
        }
    }

    Ok(ScanResult {
        occurrences,
        positionals,
    })
}

/// Builds the long-name and short-character lookup tables.
///
/// The first parameter registered with a name wins; the context's help
/// aliases are injected last so a declared parameter shadows them.
fn name_tables<'c>(
    cmd: &'c Command,
    ctx: &'c Context<'_>,
) -> (HashMap<&'c str, Named>, HashMap<char, Named>) {
    let mut longs: HashMap<&str, Named> = HashMap::new();
    let mut shorts: HashMap<char, Named> = HashMap::new();

    for (idx, param) in cmd.params().iter().enumerate() {
        let named = match param {
            Param::Opt(o) => Named::Opt { idx, nargs: o.nargs },
            Param::Flag(_) => Named::Flag(idx),
            Param::Arg(_) => continue,
        };
        for name in param.names() {
            if name.starts_with("--") {
                longs.entry(name.as_str()).or_insert(named);
            } else if let Some(ch) = short_char(name) {
                shorts.entry(ch).or_insert(named);
            }
        }
    }

    for name in ctx.resolved_help_names() {
        if name.starts_with("--") {
            longs.entry(name.as_str()).or_insert(Named::Help);
        } else if let Some(ch) = short_char(name) {
            shorts.entry(ch).or_insert(Named::Help);
        }
    }

    (longs, shorts)
}

fn short_char(name: &str) -> Option<char> {
    let rest = name.strip_prefix('-')?;
    let mut chars = rest.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(ch),
        _ => None,
    }
}

/// Runs an eager parameter's processor immediately after its occurrence is
/// recorded. Help and version terminate the scan on the spot, bypassing
/// everything that would normally still be validated.
fn process_eager(
    cmd: &Command,
    ctx: &Rc<Context<'_>>,
    param: &Param,
) -> Result<(), Interrupt> {
    if !param.eager() {
        return Ok(());
    }
    if let Param::Flag(flag) = param {
        match &flag.action {
            FlagAction::Help => {
                debug!(command = %cmd.name(), "eager help flag halted the scan");
                return Err(Interrupt::Halt(help_termination(ctx)));
            }
            FlagAction::Version { message } => {
                let text = message.clone().unwrap_or_else(|| {
                    let root = ctx.root();
                    format!(
                        "{}, version {}",
                        root.command().name(),
                        cmd.version().unwrap_or_default()
                    )
                });
                debug!(command = %cmd.name(), "eager version flag halted the scan");
                return Err(Interrupt::Halt(Termination {
                    message: text,
                    code: 0,
                }));
            }
            FlagAction::Set | FlagAction::Count => {}
        }
    }
    Ok(())
}

fn help_termination(ctx: &Context<'_>) -> Termination {
    Termination {
        message: help::render_help(&help::help_page(ctx)),
        code: 0,
    }
}
