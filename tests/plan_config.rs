// tests/plan_config.rs

use std::error::Error;
use std::io::Write;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::Parser;
use simplecmd::cli::CliArgs;
use simplecmd::config::{PlanFile, ProgressSetting, load_and_validate};
use simplecmd::errors::SimplecmdError;
use simplecmd::load_plan;
use simplecmd::options::{IoStrategy, Progress, Record, resolve};
use simplecmd_test_utils::builders::{CommandEntryBuilder, PlanBuilder};
use tempfile::{NamedTempFile, tempdir};

type TestResult = Result<(), Box<dyn Error>>;

fn plan_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn loads_commands_with_defaults_applied() -> TestResult {
    let file = plan_file(
        r#"
[defaults]
workdir = "/tmp"
progress = true

[[command]]
name = "list"
program = "ls"
args = ["-l"]
workdir = "/etc"
redirect = "ls.out"
progress = 5
record = "ls.rec"

[[command]]
program = "grep"
args = ["sh", "-r", "/usr/bin"]
"#,
    );

    let plan = load_and_validate(file.path())?;
    assert!(plan.keep_going);
    assert_eq!(plan.commands.len(), 2);

    let list = &plan.commands[0];
    assert_eq!(list.name, "list");
    assert_eq!(list.spec.command_line(), "ls -l");
    assert_eq!(list.spec.workdir(), PathBuf::from("/etc"));
    assert_eq!(list.options.redirect, Some(PathBuf::from("ls.out")));
    assert_eq!(
        list.options.progress,
        Progress::Ticking(NonZeroUsize::new(5).unwrap())
    );
    assert!(matches!(list.options.record, Record::Path(ref p) if p == &PathBuf::from("ls.rec")));
    assert_eq!(resolve(&list.options), IoStrategy::Intercepted);

    let grep = &plan.commands[1];
    assert_eq!(grep.name, "command-1");
    assert_eq!(grep.spec.args(), ["sh", "-r", "/usr/bin"]);
    assert_eq!(grep.spec.workdir(), PathBuf::from("/tmp"));
    assert_eq!(grep.options.progress, Progress::On);
    assert!(grep.options.record.is_none());
    Ok(())
}

#[test]
fn empty_plan_is_a_config_error() {
    let file = plan_file("[defaults]\nprogress = false\n");

    match load_and_validate(file.path()) {
        Err(SimplecmdError::ConfigError(msg)) => {
            assert!(msg.contains("at least one [[command]]"));
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn zero_progress_is_rejected() {
    let file = plan_file(
        r#"
[[command]]
name = "zero"
program = "ls"
progress = 0
"#,
    );

    match load_and_validate(file.path()) {
        Err(SimplecmdError::ConfigError(msg)) => {
            assert!(msg.contains("command 'zero'"));
            assert!(msg.contains("positive integer"));
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn duplicate_names_are_rejected() {
    let raw = PlanBuilder::new()
        .with_command(CommandEntryBuilder::new("ls").name("same").build())
        .with_command(CommandEntryBuilder::new("pwd").name("same").build())
        .raw();

    match PlanFile::try_from(raw) {
        Err(SimplecmdError::ConfigError(msg)) => assert!(msg.contains("duplicate command name 'same'")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn blank_program_is_rejected() {
    let raw = PlanBuilder::new()
        .with_command(CommandEntryBuilder::new("  ").name("blank").build())
        .raw();

    match PlanFile::try_from(raw) {
        Err(SimplecmdError::ConfigError(msg)) => assert!(msg.contains("empty `program`")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn invalid_toml_is_a_toml_error() {
    let file = plan_file("[[command]\nprogram = ");

    match load_and_validate(file.path()) {
        Err(SimplecmdError::TomlError(_)) => {}
        Err(e) => panic!("Expected TomlError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn missing_file_is_an_io_error() {
    match load_and_validate("/definitely/not/here/Simplecmd.toml") {
        Err(SimplecmdError::IoError(_)) => {}
        Err(e) => panic!("Expected IoError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn builder_default_progress_applies_to_entries() {
    let plan = PlanBuilder::new()
        .with_default_progress(ProgressSetting::Every(3))
        .with_command(CommandEntryBuilder::new("ls").build())
        .with_command(
            CommandEntryBuilder::new("pwd")
                .progress(ProgressSetting::Flag(false))
                .build(),
        )
        .build();

    assert_eq!(
        plan.commands[0].options.progress,
        Progress::Ticking(NonZeroUsize::new(3).unwrap())
    );
    assert_eq!(plan.commands[1].options.progress, Progress::Off);
    assert_eq!(plan.commands[0].spec.workdir(), PathBuf::from("."));
}

#[test]
fn bare_invocation_runs_the_default_plan_file() -> TestResult {
    let file = plan_file(
        r#"
[[command]]
name = "hello"
program = "echo"
args = ["hi"]
"#,
    );

    let args = CliArgs::try_parse_from(["simplecmd"])?;
    let plan = load_plan(&args, file.path())?;

    assert_eq!(plan.commands.len(), 1);
    assert_eq!(plan.commands[0].name, "hello");
    assert_eq!(plan.commands[0].spec.command_line(), "echo hi");
    Ok(())
}

#[test]
fn bare_invocation_without_default_plan_is_an_error() -> TestResult {
    let dir = tempdir()?;
    let missing = dir.path().join("Simplecmd.toml");

    let args = CliArgs::try_parse_from(["simplecmd"])?;
    let err = load_plan(&args, &missing).unwrap_err();

    assert!(err.to_string().contains("Simplecmd.toml"), "{err}");
    Ok(())
}

#[test]
fn program_on_the_command_line_wins_over_default_plan() -> TestResult {
    let file = plan_file("[[command]]\nprogram = \"ls\"\n");

    let args = CliArgs::try_parse_from(["simplecmd", "--progress", "3", "echo", "hi", "there"])?;
    let plan = load_plan(&args, file.path())?;

    assert_eq!(plan.commands.len(), 1);
    let only = &plan.commands[0];
    assert_eq!(only.spec.command_line(), "echo hi there");
    assert_eq!(
        only.options.progress,
        Progress::Ticking(NonZeroUsize::new(3).unwrap())
    );
    Ok(())
}
