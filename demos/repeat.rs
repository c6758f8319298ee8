//! A minimal end-to-end command.
//!
//! Declares an option, a counted flag, and a positional argument, then
//! hands the real process arguments to `main`.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p argot-examples --example repeat -- --count 3 hello
//! cargo run -p argot-examples --example repeat -- -vv hello
//! cargo run -p argot-examples --example repeat -- --help
//! ```

use argot_core::{Arg, Command, Flag, Opt, Value, ValueType};

fn main() {
    let cmd = Command::builder("repeat")
        .about("Print a message a few times.")
        .version("0.1.0")
        .param(
            Opt::new(["-c", "--count"])
                .value_type(ValueType::Int)
                .default_value(Value::Int(1))
                .help("How many times to print"),
        )
        .param(
            Flag::new(["-v", "--verbose"])
                .counted()
                .help("Increase chattiness (repeatable)"),
        )
        .param(Flag::version_flag(["-V", "--version"]))
        .param(Arg::new("message").help("What to print"))
        .target(|inv| {
            let count = inv.int_value("count").unwrap_or(1);
            let verbosity = inv.int_value("verbose").unwrap_or(0);
            let message = inv.str_value("message").unwrap_or_default();

            if verbosity > 0 {
                eprintln!("printing {count} time(s)");
            }
            for _ in 0..count {
                println!("{message}");
            }
            Ok(())
        })
        .build()
        .expect("command structure is valid");

    std::process::exit(cmd.main(std::env::args().skip(1)));
}
