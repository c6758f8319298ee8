//! Passing shared state down the context chain.
//!
//! The root command's target registers a session object; subcommand targets
//! look it up through their context's ancestor walk instead of threading it
//! through function arguments.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p argot-examples --example shared_context
//! ```

use argot_core::{Command, Flag, Opt, UsageError};

#[derive(Debug)]
struct Session {
    endpoint: String,
    dry_run: bool,
}

fn main() {
    let deploy = Command::builder("deploy")
        .about("Ship the current build")
        .target(|inv| {
            let session = inv
                .context()
                .find_object::<Session>()
                .ok_or_else(|| UsageError::Message("no session registered".to_string()))?;
            if session.dry_run {
                println!("dry run: would deploy to {}", session.endpoint);
            } else {
                println!("deploying to {}", session.endpoint);
            }
            Ok(())
        })
        .build()
        .expect("valid deploy command");

    let app = Command::builder("ops")
        .about("Operations toolbox")
        .param(
            Opt::new(["--endpoint"])
                .default_value(argot_core::Value::Str("https://prod.internal".to_string()))
                .help("Where to operate"),
        )
        .param(Flag::new(["-n", "--dry-run"]).help("Describe actions without running them"))
        .subcommand(deploy)
        .target(|inv| {
            // Runs before the subcommand parses; children find this object
            // by walking their parent links.
            inv.context().register(Session {
                endpoint: inv.str_value("endpoint").unwrap_or_default().to_string(),
                dry_run: inv.bool_value("dry_run").unwrap_or(false),
            });
            Ok(())
        })
        .build()
        .expect("valid ops command");

    for argv in [
        vec!["deploy"],
        vec!["--dry-run", "--endpoint", "https://staging.internal", "deploy"],
    ] {
        println!("$ ops {}", argv.join(" "));
        if let Err(err) = app.run(argv) {
            println!("  -> usage error: {err}");
        }
        println!();
    }
}
