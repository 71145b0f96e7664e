// src/lib.rs

pub mod cli;
pub mod command;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod options;
pub mod sink;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::debug;

use crate::cli::CliArgs;
use crate::config::loader::{default_plan_path, load_and_validate};
use crate::config::{PlanCommand, PlanFile};
use crate::engine::run_plan;
use crate::exec::SessionEnv;
use crate::options::{Options, Record, resolve};

pub use crate::command::{Command, CommandSpec, RunHandle};
pub use crate::exec::RunResult;
pub use crate::options::{IoStrategy, OptionsUpdate, Progress};

/// High-level entry point used by `main.rs`.
///
/// Builds the plan (see [`load_plan`]), then runs it (or prints it for
/// `--dry-run`).
pub async fn run(args: CliArgs) -> Result<()> {
    let plan = load_plan(&args, &default_plan_path())?;

    if args.dry_run {
        print_dry_run(&plan);
        return Ok(());
    }

    let env = SessionEnv::default();
    let outcomes = run_plan(&plan, &env).await;

    let failed: Vec<String> = outcomes
        .iter()
        .filter(|o| !o.result.success())
        .map(|o| format!("{} (exit code {})", o.name, o.result.code))
        .collect();
    if !failed.is_empty() {
        bail!("command(s) failed: {}", failed.join(", "));
    }
    Ok(())
}

/// Pick the plan to run.
///
/// `--plan` wins, then the program given on the command line, then
/// `default_plan` if that file exists.
pub fn load_plan(args: &CliArgs, default_plan: &Path) -> Result<PlanFile> {
    if let Some(path) = &args.plan {
        return load_and_validate(path).with_context(|| format!("loading plan from {:?}", path));
    }
    if let Some(program) = &args.program {
        return Ok(plan_from_args(program, args));
    }
    if default_plan.is_file() {
        debug!(path = %default_plan.display(), "using default plan file");
        return load_and_validate(default_plan)
            .with_context(|| format!("loading plan from {:?}", default_plan));
    }
    bail!(
        "no program given, no --plan file, and no {} found",
        default_plan.display()
    );
}

fn plan_from_args(program: &str, args: &CliArgs) -> PlanFile {
    let workdir = args.cwd.clone().unwrap_or_else(|| PathBuf::from("."));

    let options = Options {
        redirect: args.redirect.clone(),
        progress: args.progress.unwrap_or_default(),
        record: args.record.clone().map(Record::Path).unwrap_or_default(),
    };

    PlanFile {
        keep_going: true,
        commands: vec![PlanCommand {
            name: program.to_string(),
            spec: CommandSpec::new(program, args.args.clone(), workdir),
            options,
        }],
    }
}

/// Print each command with its options and resolved strategy.
fn print_dry_run(plan: &PlanFile) {
    println!("simplecmd dry-run");
    println!("  keep_going = {}", plan.keep_going);
    println!();

    println!("commands ({}):", plan.commands.len());
    for cmd in plan.commands.iter() {
        println!("  - {}", cmd.name);
        println!("      cmd: {}", cmd.spec.command_line());
        println!("      workdir: {}", cmd.spec.workdir().display());
        if let Some(ref redirect) = cmd.options.redirect {
            println!("      redirect: {}", redirect.display());
        }
        println!("      progress: {}", cmd.options.progress);
        if let Record::Path(ref record) = cmd.options.record {
            println!("      record: {}", record.display());
        }
        println!("      strategy: {}", resolve(&cmd.options));
    }

    debug!("dry-run complete (no execution)");
}
