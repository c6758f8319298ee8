use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use argot_core::{
    Arg, Command, ContextSettings, Flag, Opt, Outcome, UsageError, Value, ValueType,
};

/// Shared sink a target writes its bound values into, so tests can inspect
/// what an invocation saw.
fn value_sink() -> Rc<RefCell<HashMap<String, Value>>> {
    Rc::new(RefCell::new(HashMap::new()))
}

fn capture_target(
    sink: &Rc<RefCell<HashMap<String, Value>>>,
) -> impl Fn(&argot_core::Invocation<'_>) -> Result<(), UsageError> + 'static {
    let sink = Rc::clone(sink);
    move |inv: &argot_core::Invocation<'_>| {
        *sink.borrow_mut() = inv.values().clone();
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Eager help
// ---------------------------------------------------------------------------

#[test]
fn help_halts_even_with_later_malformed_tokens() {
    let cmd = Command::builder("app")
        .param(Opt::new(["--name"]).required())
        .build()
        .unwrap();

    let outcome = cmd.run(["--help", "--no-such-option", "junk"]).unwrap();
    match outcome {
        Outcome::Halted(t) => {
            assert_eq!(t.code, 0);
            assert!(t.message.starts_with("Usage: app"));
        }
        Outcome::Completed => panic!("expected a help termination"),
    }
}

#[test]
fn help_bypasses_required_parameter_checks() {
    let cmd = Command::builder("app")
        .param(Arg::new("input"))
        .param(Opt::new(["--mode"]).required())
        .build()
        .unwrap();

    // Without help this is a missing-parameter error...
    assert!(matches!(
        cmd.run(Vec::<String>::new()),
        Err(UsageError::MissingParameter { .. })
    ));
    // ...with help anywhere, validation never runs.
    assert!(matches!(
        cmd.run(["--help"]).unwrap(),
        Outcome::Halted(_)
    ));
}

#[test]
fn help_override_disables_default_aliases() {
    let cmd = Command::builder("app").build().unwrap();
    let settings = ContextSettings::default().help_names(["-x"]);

    let err = cmd
        .run_with(["--help"], ContextSettings::default().help_names(["-x"]))
        .unwrap_err();
    assert_eq!(
        err,
        UsageError::NoSuchOption {
            name: "--help".to_string()
        }
    );

    assert!(matches!(
        cmd.run_with(["-x"], settings).unwrap(),
        Outcome::Halted(_)
    ));
}

#[test]
fn declared_parameter_shadows_help_alias() {
    let sink = value_sink();
    let cmd = Command::builder("app")
        .param(Flag::new(["-h"]))
        .target(capture_target(&sink))
        .build()
        .unwrap();

    let outcome = cmd.run(["-h"]).unwrap();
    assert_eq!(outcome, Outcome::Completed);
    assert_eq!(sink.borrow().get("h"), Some(&Value::Bool(true)));

    // The long alias still answers as help.
    assert!(matches!(cmd.run(["--help"]).unwrap(), Outcome::Halted(_)));
}

// ---------------------------------------------------------------------------
// Version flag
// ---------------------------------------------------------------------------

#[test]
fn version_flag_renders_name_and_version() {
    let cmd = Command::builder("app")
        .version("1.2.3")
        .param(Flag::version_flag(["-V", "--version"]))
        .build()
        .unwrap();

    match cmd.run(["--version"]).unwrap() {
        Outcome::Halted(t) => {
            assert_eq!(t.message, "app, version 1.2.3");
            assert_eq!(t.code, 0);
        }
        Outcome::Completed => panic!("expected a version termination"),
    }
}

#[test]
fn version_flag_uses_exact_configured_message() {
    let cmd = Command::builder("app")
        .param(Flag::version_flag(["--version"]).version_message("app (nightly)"))
        .build()
        .unwrap();

    match cmd.run(["--version"]).unwrap() {
        Outcome::Halted(t) => assert_eq!(t.message, "app (nightly)"),
        Outcome::Completed => panic!("expected a version termination"),
    }
}

// ---------------------------------------------------------------------------
// Flags and options
// ---------------------------------------------------------------------------

#[test]
fn grouped_short_flags_equal_separate_occurrences() {
    let run = |tokens: &[&str]| {
        let sink = value_sink();
        let cmd = Command::builder("app")
            .param(Flag::new(["-a"]))
            .param(Flag::new(["-b"]))
            .param(Flag::new(["-c"]).counted())
            .target(capture_target(&sink))
            .build()
            .unwrap();
        cmd.run(tokens.iter().copied()).unwrap();
        let values = sink.borrow().clone();
        values
    };

    let grouped = run(&["-abcc"]);
    let separate = run(&["-a", "-b", "-c", "-c"]);
    assert_eq!(grouped, separate);
    assert_eq!(grouped.get("a"), Some(&Value::Bool(true)));
    assert_eq!(grouped.get("c"), Some(&Value::Int(2)));
}

#[test]
fn counted_flag_binds_occurrence_count() {
    let sink = value_sink();
    let cmd = Command::builder("app")
        .param(Flag::new(["-v", "--verbose"]).counted())
        .target(capture_target(&sink))
        .build()
        .unwrap();

    cmd.run(["-v", "--verbose", "-v"]).unwrap();
    assert_eq!(sink.borrow().get("verbose"), Some(&Value::Int(3)));

    cmd.run(Vec::<String>::new()).unwrap();
    assert_eq!(sink.borrow().get("verbose"), Some(&Value::Int(0)));
}

#[test]
fn counted_flag_zero_times_uses_configured_default() {
    let sink = value_sink();
    let cmd = Command::builder("app")
        .param(
            Flag::new(["-v"])
                .counted()
                .default_value(Value::Int(2)),
        )
        .target(capture_target(&sink))
        .build()
        .unwrap();

    cmd.run(Vec::<String>::new()).unwrap();
    assert_eq!(sink.borrow().get("v"), Some(&Value::Int(2)));
}

#[test]
fn int_option_with_default() {
    let sink = value_sink();
    let cmd = Command::builder("app")
        .param(
            Opt::new(["--count"])
                .value_type(ValueType::Int)
                .default_value(Value::Int(5)),
        )
        .target(capture_target(&sink))
        .build()
        .unwrap();

    cmd.run(Vec::<String>::new()).unwrap();
    assert_eq!(sink.borrow().get("count"), Some(&Value::Int(5)));

    cmd.run(["--count", "7"]).unwrap();
    assert_eq!(sink.borrow().get("count"), Some(&Value::Int(7)));

    let err = cmd.run(["--count"]).unwrap_err();
    assert_eq!(
        err,
        UsageError::MissingValues {
            name: "--count".to_string(),
            expected: 1,
            found: 0,
        }
    );
}

#[test]
fn invalid_typed_value_names_the_parameter() {
    let cmd = Command::builder("app")
        .param(Opt::new(["--count"]).value_type(ValueType::Int))
        .build()
        .unwrap();

    match cmd.run(["--count", "many"]).unwrap_err() {
        UsageError::InvalidValue { name, reason } => {
            assert_eq!(name, "--count");
            assert!(reason.contains("many"));
        }
        other => panic!("expected InvalidValue, got {other:?}"),
    }
}

#[test]
fn inline_equals_matches_spaced_value() {
    let sink = value_sink();
    let cmd = Command::builder("app")
        .param(Opt::new(["--name"]))
        .target(capture_target(&sink))
        .build()
        .unwrap();

    cmd.run(["--name=inline"]).unwrap();
    assert_eq!(
        sink.borrow().get("name"),
        Some(&Value::Str("inline".to_string()))
    );

    cmd.run(["--name", "inline"]).unwrap();
    assert_eq!(
        sink.borrow().get("name"),
        Some(&Value::Str("inline".to_string()))
    );
}

#[test]
fn flag_with_inline_value_is_a_usage_error() {
    let cmd = Command::builder("app")
        .param(Flag::new(["--force"]))
        .build()
        .unwrap();

    assert_eq!(
        cmd.run(["--force=yes"]).unwrap_err(),
        UsageError::UnexpectedValue {
            name: "--force".to_string()
        }
    );
}

#[test]
fn repeated_option_binds_last_occurrence_unless_multiple() {
    let sink = value_sink();
    let cmd = Command::builder("app")
        .param(Opt::new(["--tag"]))
        .target(capture_target(&sink))
        .build()
        .unwrap();
    cmd.run(["--tag", "one", "--tag", "two"]).unwrap();
    assert_eq!(sink.borrow().get("tag"), Some(&Value::Str("two".to_string())));

    let sink = value_sink();
    let cmd = Command::builder("app")
        .param(Opt::new(["--tag"]).multiple())
        .target(capture_target(&sink))
        .build()
        .unwrap();
    cmd.run(["--tag", "one", "--tag", "two"]).unwrap();
    assert_eq!(
        sink.borrow().get("tag"),
        Some(&Value::List(vec![
            Value::Str("one".to_string()),
            Value::Str("two".to_string()),
        ]))
    );
}

// ---------------------------------------------------------------------------
// Positional arguments
// ---------------------------------------------------------------------------

#[test]
fn required_argument_missing_and_present() {
    let sink = value_sink();
    let cmd = Command::builder("app")
        .param(Arg::new("name"))
        .target(capture_target(&sink))
        .build()
        .unwrap();

    assert_eq!(
        cmd.run(Vec::<String>::new()).unwrap_err(),
        UsageError::MissingParameter {
            name: "name".to_string()
        }
    );

    cmd.run(["hello"]).unwrap();
    assert_eq!(
        sink.borrow().get("name"),
        Some(&Value::Str("hello".to_string()))
    );
}

#[test]
fn rest_argument_reserves_for_later_required_arguments() {
    let sink = value_sink();
    let cmd = Command::builder("app")
        .param(Arg::new("inputs").rest())
        .param(Arg::new("dest"))
        .target(capture_target(&sink))
        .build()
        .unwrap();

    cmd.run(["a", "b", "out"]).unwrap();
    let values = sink.borrow();
    assert_eq!(
        values.get("inputs"),
        Some(&Value::List(vec![
            Value::Str("a".to_string()),
            Value::Str("b".to_string()),
        ]))
    );
    assert_eq!(values.get("dest"), Some(&Value::Str("out".to_string())));
}

#[test]
fn empty_rest_argument_binds_an_empty_list() {
    let sink = value_sink();
    let cmd = Command::builder("app")
        .param(Arg::new("extras").rest())
        .target(capture_target(&sink))
        .build()
        .unwrap();

    cmd.run(Vec::<String>::new()).unwrap();
    assert_eq!(sink.borrow().get("extras"), Some(&Value::List(Vec::new())));
}

#[test]
fn tokens_after_double_dash_are_positional() {
    let sink = value_sink();
    let cmd = Command::builder("app")
        .param(Flag::new(["-a"]))
        .param(Arg::new("rest").rest())
        .target(capture_target(&sink))
        .build()
        .unwrap();

    cmd.run(["-a", "--", "-a", "--", "-"]).unwrap();
    let values = sink.borrow();
    assert_eq!(values.get("a"), Some(&Value::Bool(true)));
    assert_eq!(
        values.get("rest"),
        Some(&Value::List(vec![
            Value::Str("-a".to_string()),
            Value::Str("--".to_string()),
            Value::Str("-".to_string()),
        ]))
    );
}

#[test]
fn unexpected_extra_arguments_are_rejected() {
    let cmd = Command::builder("app")
        .param(Arg::new("one"))
        .build()
        .unwrap();

    assert_eq!(
        cmd.run(["fine", "extra"]).unwrap_err(),
        UsageError::UnexpectedArguments {
            args: vec!["extra".to_string()]
        }
    );
}

#[test]
fn interspersed_options_parse_after_positionals() {
    let sink = value_sink();
    let cmd = Command::builder("app")
        .param(Flag::new(["-v"]))
        .param(Arg::new("input"))
        .target(capture_target(&sink))
        .build()
        .unwrap();

    cmd.run(["file.txt", "-v"]).unwrap();
    let values = sink.borrow();
    assert_eq!(values.get("v"), Some(&Value::Bool(true)));
    assert_eq!(
        values.get("input"),
        Some(&Value::Str("file.txt".to_string()))
    );
}

// ---------------------------------------------------------------------------
// Subcommands and context
// ---------------------------------------------------------------------------

fn tree(sink: &Rc<RefCell<HashMap<String, Value>>>, invoke_without: bool) -> Command {
    let sub_sink = Rc::clone(sink);
    let sub = Command::builder("push")
        .alias("p")
        .param(Flag::new(["--force"]))
        .target(move |inv| {
            *sub_sink.borrow_mut() = inv.values().clone();
            Ok(())
        })
        .build()
        .unwrap();

    Command::builder("app")
        .param(Flag::new(["-v", "--verbose"]))
        .invoke_without_subcommand(invoke_without)
        .subcommand(sub)
        .target(capture_target(sink))
        .build()
        .unwrap()
}

#[test]
fn missing_subcommand_is_an_error_unless_allowed() {
    let sink = value_sink();
    let cmd = tree(&sink, false);
    assert_eq!(
        cmd.run(["-v"]).unwrap_err(),
        UsageError::MissingSubcommand {
            command: "app".to_string()
        }
    );

    let sink = value_sink();
    let cmd = tree(&sink, true);
    assert_eq!(cmd.run(["-v"]).unwrap(), Outcome::Completed);
    assert_eq!(sink.borrow().get("verbose"), Some(&Value::Bool(true)));
}

#[test]
fn subcommand_receives_its_argv_untouched() {
    let sink = value_sink();
    let cmd = tree(&sink, false);

    // `--force` belongs to the subcommand; the parent scan must not touch it.
    cmd.run(["-v", "push", "--force"]).unwrap();
    assert_eq!(sink.borrow().get("force"), Some(&Value::Bool(true)));
}

#[test]
fn subcommand_alias_dispatches_like_its_name() {
    let sink = value_sink();
    let cmd = tree(&sink, false);
    cmd.run(["p", "--force"]).unwrap();
    assert_eq!(sink.borrow().get("force"), Some(&Value::Bool(true)));
}

#[test]
fn unknown_subcommand_is_reported() {
    let sink = value_sink();
    let cmd = tree(&sink, false);
    assert_eq!(
        cmd.run(["pull"]).unwrap_err(),
        UsageError::NoSuchSubcommand {
            name: "pull".to_string()
        }
    );
}

#[test]
fn parent_registers_objects_the_child_finds() {
    #[derive(Debug, PartialEq)]
    struct Session {
        user: String,
    }

    let seen = Rc::new(RefCell::new(None));
    let seen_in_child = Rc::clone(&seen);

    let child = Command::builder("who")
        .target(move |inv| {
            let session = inv
                .context()
                .find_object::<Session>()
                .ok_or_else(|| UsageError::Message("no session".to_string()))?;
            *seen_in_child.borrow_mut() = Some(session.user.clone());
            Ok(())
        })
        .build()
        .unwrap();

    let cmd = Command::builder("app")
        .subcommand(child)
        .target(|inv| {
            inv.context().register(Session {
                user: "ada".to_string(),
            });
            Ok(())
        })
        .build()
        .unwrap();

    cmd.run(["who"]).unwrap();
    assert_eq!(seen.borrow().as_deref(), Some("ada"));
}

#[test]
fn seeded_objects_are_visible_at_every_depth() {
    #[derive(Debug)]
    struct Config {
        retries: u32,
    }

    let seen = Rc::new(RefCell::new(0_u32));
    let sink = Rc::clone(&seen);

    let leaf = Command::builder("leaf")
        .target(move |inv| {
            let config = inv
                .context()
                .find_object::<Config>()
                .ok_or_else(|| UsageError::Message("no config".to_string()))?;
            *sink.borrow_mut() = config.retries;
            Ok(())
        })
        .build()
        .unwrap();
    let mid = Command::builder("mid").subcommand(leaf).build().unwrap();
    let cmd = Command::builder("app").subcommand(mid).build().unwrap();

    let settings = ContextSettings::default().object(Config { retries: 4 });
    cmd.run_with(["mid", "leaf"], settings).unwrap();
    assert_eq!(*seen.borrow(), 4);
}

#[test]
fn every_context_in_a_tree_shares_one_root() {
    let checked = Rc::new(RefCell::new(false));
    let sink = Rc::clone(&checked);

    let leaf = Command::builder("leaf")
        .target(move |inv| {
            let ctx = inv.context();
            let root = ctx.root();
            // Two contexts up from the leaf sits the same root node.
            let parent = ctx.parent().ok_or_else(|| {
                UsageError::Message("leaf context has no parent".to_string())
            })?;
            assert!(Rc::ptr_eq(&root, &parent.root()));
            assert_eq!(root.command().name(), "app");
            assert_eq!(ctx.command_path(), "app mid leaf");
            *sink.borrow_mut() = true;
            Ok(())
        })
        .build()
        .unwrap();
    let mid = Command::builder("mid").subcommand(leaf).build().unwrap();
    let cmd = Command::builder("app").subcommand(mid).build().unwrap();

    cmd.run(["mid", "leaf"]).unwrap();
    assert!(*checked.borrow());
}

#[test]
fn subcommand_help_shows_the_full_path() {
    let sub = Command::builder("remote").about("Manage remotes").build().unwrap();
    let cmd = Command::builder("app").subcommand(sub).build().unwrap();

    match cmd.run(["remote", "--help"]).unwrap() {
        Outcome::Halted(t) => assert!(t.message.starts_with("Usage: app remote")),
        Outcome::Completed => panic!("expected a help termination"),
    }
}

// ---------------------------------------------------------------------------
// The main boundary
// ---------------------------------------------------------------------------

#[test]
fn main_maps_outcomes_to_exit_codes() {
    let cmd = Command::builder("app")
        .version("0.9.0")
        .param(Flag::version_flag(["--version"]))
        .param(Arg::new("input").optional())
        .build()
        .unwrap();

    assert_eq!(cmd.main(Vec::<String>::new()), 0);
    assert_eq!(cmd.main(["--help"]), 0);
    assert_eq!(cmd.main(["--version"]), 0);
    assert_eq!(cmd.main(["--bogus"]), 2);
}

#[test]
fn target_usage_errors_propagate_through_run() {
    let cmd = Command::builder("app")
        .param(Arg::new("path"))
        .target(|inv| {
            let path = inv.str_value("path").unwrap_or_default();
            if path.is_empty() || path.starts_with('/') {
                Ok(())
            } else {
                Err(UsageError::Message(format!("'{path}' is not absolute")))
            }
        })
        .build()
        .unwrap();

    assert!(cmd.run(["/etc/hosts"]).is_ok());
    assert_eq!(
        cmd.run(["relative"]).unwrap_err(),
        UsageError::Message("'relative' is not absolute".to_string())
    );
}
