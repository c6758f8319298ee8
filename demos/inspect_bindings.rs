//! Dumping bound values as JSON.
//!
//! Bound values serialize with serde, which makes it easy to inspect what a
//! given argv actually binds — handy while iterating on a parameter set.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p argot-examples --example inspect_bindings
//! ```

use argot_core::{Arg, Command, Flag, Opt, Value, ValueType};

fn main() {
    let cmd = Command::builder("convert")
        .about("Convert media files")
        .param(
            Opt::new(["-f", "--format"])
                .value_type(ValueType::choice(["png", "jpeg", "webp"]))
                .default_value(Value::Str("png".to_string())),
        )
        .param(
            Opt::new(["--size"])
                .value_type(ValueType::Int)
                .nargs(2)
                .metavar("PX"),
        )
        .param(Flag::new(["-v", "--verbose"]).counted())
        .param(Arg::new("inputs").rest())
        .target(|inv| {
            let json = serde_json::to_string_pretty(inv.values())
                .unwrap_or_else(|_| "{}".to_string());
            println!("{json}");
            Ok(())
        })
        .build()
        .expect("valid convert command");

    for argv in [
        vec!["a.png", "b.png", "--size", "640", "480", "-vv"],
        vec!["--format=webp", "c.tiff"],
        vec!["--format", "gif", "d.png"],
    ] {
        println!("$ convert {}", argv.join(" "));
        if let Err(err) = cmd.run(argv) {
            println!("usage error: {err}");
        }
        println!();
    }
}
