//! A nested command tree with aliases.
//!
//! Builds a `store` command with `put`/`get` subcommands and drives it
//! programmatically, showing dispatch, aliases, and the usage errors a bad
//! invocation produces.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p argot-examples --example subcommands
//! ```

use argot_core::{Arg, Command, Flag, Outcome, UsageError};

fn build() -> Command {
    let put = Command::builder("put")
        .about("Store a value under a key")
        .param(Arg::new("key"))
        .param(Arg::new("value"))
        .param(Flag::new(["--overwrite"]).help("Replace an existing entry"))
        .target(|inv| {
            println!(
                "put {} = {} (overwrite: {})",
                inv.str_value("key").unwrap_or_default(),
                inv.str_value("value").unwrap_or_default(),
                inv.bool_value("overwrite").unwrap_or(false),
            );
            Ok(())
        })
        .build()
        .expect("valid put command");

    let get = Command::builder("get")
        .alias("show")
        .about("Look up a key")
        .param(Arg::new("key"))
        .target(|inv| {
            println!("get {}", inv.str_value("key").unwrap_or_default());
            Ok(())
        })
        .build()
        .expect("valid get command");

    Command::builder("store")
        .about("A tiny key-value front end")
        .subcommand(put)
        .subcommand(get)
        .build()
        .expect("valid store command")
}

fn main() {
    let store = build();

    let runs: &[&[&str]] = &[
        &["put", "color", "teal", "--overwrite"],
        &["show", "color"],
        &["drop", "color"],
        &[],
    ];

    for argv in runs {
        println!("$ store {}", argv.join(" "));
        match store.run(argv.iter().copied()) {
            Ok(Outcome::Completed) => {}
            Ok(Outcome::Halted(t)) => println!("{}", t.message),
            Err(UsageError::NoSuchSubcommand { name }) => {
                println!("  -> no such command: {name}");
            }
            Err(err) => println!("  -> usage error: {err}"),
        }
        println!();
    }
}
