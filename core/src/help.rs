//! Help records and plain-text rendering.
//!
//! The help model is deliberately thin: one record per visible parameter
//! and one per subcommand, grouped into two sections, plus a usage line
//! derived from the context's command path. [`render_help`] turns a page
//! into the text carried by the help termination; embedders can serialize
//! the page itself instead and render it however they like.

use serde::Serialize;

use crate::command::Command;
use crate::context::Context;
use crate::param::{Arity, Param};

/// One row of a help section: display names, optional value placeholder,
/// and the help string.
#[derive(Debug, Clone, Serialize)]
pub struct HelpEntry {
    pub names: String,
    pub metavar: Option<String>,
    pub help: String,
}

/// Everything a renderer needs to produce help text for one command.
#[derive(Debug, Clone, Serialize)]
pub struct HelpPage {
    pub usage: String,
    pub about: Option<String>,
    pub parameters: Vec<HelpEntry>,
    pub subcommands: Vec<HelpEntry>,
}

/// Builds the help page for the command this context executes.
pub fn help_page(ctx: &Context<'_>) -> HelpPage {
    let command = ctx.command();
    let mut parameters = Vec::new();

    for param in command.params() {
        if param.hidden() {
            continue;
        }
        parameters.push(param_entry(param));
    }

    // The context's help aliases act as an implicit flag; list whichever
    // of them no declared parameter already answers to.
    let declared: Vec<&str> = command
        .params()
        .iter()
        .flat_map(|p| p.names().iter().map(String::as_str))
        .collect();
    let implicit: Vec<&str> = ctx
        .resolved_help_names()
        .iter()
        .map(String::as_str)
        .filter(|name| !declared.contains(name))
        .collect();
    if !implicit.is_empty() {
        parameters.push(HelpEntry {
            names: implicit.join(", "),
            metavar: None,
            help: "Show this message and exit.".to_string(),
        });
    }

    let subcommands = command
        .subcommands()
        .iter()
        .map(|sub| {
            let mut names = vec![sub.name()];
            names.extend(sub.aliases().iter().map(String::as_str));
            HelpEntry {
                names: names.join(", "),
                metavar: None,
                help: sub.about().unwrap_or_default().to_string(),
            }
        })
        .collect();

    HelpPage {
        usage: usage_line(command, &ctx.command_path()),
        about: command.about().map(str::to_string),
        parameters,
        subcommands,
    }
}

fn param_entry(param: &Param) -> HelpEntry {
    match param {
        Param::Opt(o) => {
            let metavar = o
                .metavar
                .clone()
                .unwrap_or_else(|| o.value_type.metavar());
            let metavar = if o.nargs > 1 {
                vec![metavar; o.nargs].join(" ")
            } else {
                metavar
            };
            HelpEntry {
                names: o.names.join(", "),
                metavar: Some(metavar),
                help: o.help.clone().unwrap_or_default(),
            }
        }
        Param::Flag(f) => HelpEntry {
            names: f.names.join(", "),
            metavar: None,
            help: f.help.clone().unwrap_or_default(),
        },
        Param::Arg(a) => HelpEntry {
            names: argument_placeholder(a.name.as_str(), a.arity, a.required),
            metavar: None,
            help: a.help.clone().unwrap_or_default(),
        },
    }
}

fn argument_placeholder(name: &str, arity: Arity, required: bool) -> String {
    let upper = name.to_ascii_uppercase().replace('-', "_");
    match (arity, required) {
        (Arity::Rest, _) => format!("[{upper}]..."),
        (Arity::Exact(n), true) if n > 1 => vec![format!("<{upper}>"); n].join(" "),
        (Arity::Exact(_), true) => format!("<{upper}>"),
        (Arity::Exact(_), false) => format!("[{upper}]"),
    }
}

/// Builds the usage line shown in help output and usage-error diagnostics.
pub(crate) fn usage_line(command: &Command, path: &str) -> String {
    let mut line = format!("Usage: {path} [OPTIONS]");
    for param in command.params() {
        if let Param::Arg(a) = param {
            if a.hidden {
                continue;
            }
            line.push(' ');
            line.push_str(&argument_placeholder(&a.name, a.arity, a.required));
        }
    }
    if !command.subcommands().is_empty() {
        line.push_str(" COMMAND [ARGS]...");
    }
    line
}

/// Renders a help page as plain text: usage line, about text, then the
/// parameters and subcommands sections in two aligned columns.
pub fn render_help(page: &HelpPage) -> String {
    let mut out = String::new();
    out.push_str(&page.usage);
    out.push('\n');

    if let Some(about) = &page.about {
        out.push('\n');
        out.push_str(about);
        out.push('\n');
    }

    let width = page
        .parameters
        .iter()
        .chain(&page.subcommands)
        .map(|entry| left_column(entry).len())
        .max()
        .unwrap_or(0);

    if !page.parameters.is_empty() {
        out.push_str("\nParameters:\n");
        for entry in &page.parameters {
            push_row(&mut out, entry, width);
        }
    }

    if !page.subcommands.is_empty() {
        out.push_str("\nSubcommands:\n");
        for entry in &page.subcommands {
            push_row(&mut out, entry, width);
        }
    }

    out
}

fn left_column(entry: &HelpEntry) -> String {
    match &entry.metavar {
        Some(metavar) => format!("{} {metavar}", entry.names),
        None => entry.names.clone(),
    }
}

fn push_row(out: &mut String, entry: &HelpEntry, width: usize) {
    let left = left_column(entry);
    if entry.help.is_empty() {
        out.push_str(&format!("  {left}\n"));
    } else {
        out.push_str(&format!("  {left:<width$}  {}\n", entry.help));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::param::{Arg, Flag, Opt};
    use crate::value::ValueType;

    fn sample() -> Command {
        Command::builder("pack")
            .about("Bundle inputs into an archive.")
            .param(
                Opt::new(["-o", "--output"])
                    .help("Where to write the archive"),
            )
            .param(Flag::new(["-v", "--verbose"]).help("Chatty output"))
            .param(Arg::new("inputs").rest().help("Files to include"))
            .subcommand(
                Command::builder("list")
                    .about("List archive contents")
                    .alias("ls")
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_page_groups_parameters_and_subcommands() {
        let cmd = sample();
        let ctx = crate::context::Context::new(&cmd, None, None);
        let page = help_page(&ctx);

        assert_eq!(page.usage, "Usage: pack [OPTIONS] [INPUTS]... COMMAND [ARGS]...");
        // Declared params plus the implicit help row.
        assert_eq!(page.parameters.len(), 4);
        assert_eq!(page.parameters[3].names, "-h, --help");
        assert_eq!(page.subcommands.len(), 1);
        assert_eq!(page.subcommands[0].names, "list, ls");
    }

    #[test]
    fn test_render_contains_sections_and_rows() {
        let cmd = sample();
        let ctx = crate::context::Context::new(&cmd, None, None);
        let text = render_help(&help_page(&ctx));

        assert!(text.starts_with("Usage: pack [OPTIONS]"));
        assert!(text.contains("Parameters:"));
        assert!(text.contains("Subcommands:"));
        assert!(text.contains("-o, --output TEXT"));
        assert!(text.contains("list, ls"));
    }

    #[test]
    fn test_hidden_parameters_are_omitted() {
        let cmd = Command::builder("app")
            .param(Flag::new(["--secret"]).hidden())
            .param(
                Opt::new(["--mode"])
                    .value_type(ValueType::choice(["fast", "slow"])),
            )
            .build()
            .unwrap();
        let ctx = crate::context::Context::new(&cmd, None, None);
        let page = help_page(&ctx);

        assert!(page.parameters.iter().all(|e| e.names != "--secret"));
        assert!(
            page.parameters
                .iter()
                .any(|e| e.metavar.as_deref() == Some("[fast|slow]"))
        );
    }

    #[test]
    fn test_declared_help_flag_suppresses_implicit_row() {
        let cmd = Command::builder("app")
            .param(Flag::help_flag(["-h", "--help"]).help("Custom help text"))
            .build()
            .unwrap();
        let ctx = crate::context::Context::new(&cmd, None, None);
        let page = help_page(&ctx);

        let help_rows: Vec<_> = page
            .parameters
            .iter()
            .filter(|e| e.names.contains("--help"))
            .collect();
        assert_eq!(help_rows.len(), 1);
        assert_eq!(help_rows[0].help, "Custom help text");
    }
}
