// src/command.rs

//! Public facade: a program invocation plus its replaceable run options.

use std::path::{Path, PathBuf};

use tokio::sync::oneshot;
use tracing::warn;

use crate::exec::completion::{CompletionCallback, CompletionNotifier, RunResult};
use crate::exec::runner::execute;
use crate::exec::session::SessionEnv;
use crate::options::{IoStrategy, Options, OptionsUpdate, resolve};

/// Immutable description of what to run: program, arguments, working
/// directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
    workdir: PathBuf,
}

impl CommandSpec {
    pub fn new<I, S>(program: impl Into<String>, args: I, workdir: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            workdir: workdir.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Program and arguments joined by single spaces, for log lines only.
    ///
    /// No quoting is applied; the OS receives the arguments verbatim.
    pub fn command_line(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

/// A command that can be run any number of times.
///
/// Options are cloned into each run when it starts, so replacing them never
/// affects a run already in flight. Runs of the same `Command` are expected
/// to happen one at a time; overlapping runs with a file `redirect` would
/// write the same file.
#[derive(Debug, Clone)]
pub struct Command {
    spec: CommandSpec,
    options: Options,
    env: SessionEnv,
}

impl Command {
    pub fn new<I, S>(program: impl Into<String>, args: I, workdir: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_spec(CommandSpec::new(program, args, workdir))
    }

    pub fn from_spec(spec: CommandSpec) -> Self {
        Self {
            spec,
            options: Options::default(),
            env: SessionEnv::default(),
        }
    }

    /// Replace the session environment (temp dir, clock, console sink).
    pub fn with_env(mut self, env: SessionEnv) -> Self {
        self.env = env;
        self
    }

    pub fn spec(&self) -> &CommandSpec {
        &self.spec
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn env(&self) -> &SessionEnv {
        &self.env
    }

    /// Replace the stored options; `None` resets them to defaults.
    pub fn set_options(&mut self, options: Option<Options>) {
        self.options = options.unwrap_or_default();
    }

    /// The I/O strategy the current options resolve to.
    pub fn strategy(&self) -> IoStrategy {
        resolve(&self.options)
    }

    /// Run with the current options and wait for completion.
    pub async fn run(&self) -> RunResult {
        self.start().wait().await
    }

    /// Apply `update` to the stored options, then run and wait.
    ///
    /// `callback`, if given, is invoked exactly once with the result before
    /// this future resolves.
    pub async fn run_with(
        &mut self,
        update: OptionsUpdate,
        callback: Option<CompletionCallback>,
    ) -> RunResult {
        match update {
            OptionsUpdate::Keep => {}
            OptionsUpdate::Set(options) => self.set_options(Some(options)),
            OptionsUpdate::Reset => self.set_options(None),
        }
        self.start_with_callback(callback).wait().await
    }

    /// Start a run in the background and return a handle to its completion.
    pub fn start(&self) -> RunHandle {
        self.start_with_callback(None)
    }

    pub fn start_with_callback(&self, callback: Option<CompletionCallback>) -> RunHandle {
        let (tx, rx) = oneshot::channel();
        let notifier = CompletionNotifier::new(Some(tx), callback);

        let spec = self.spec.clone();
        let options = self.options.clone();
        let env = self.env.clone();
        tokio::spawn(async move {
            execute(&spec, &options, &env, notifier).await;
        });

        RunHandle {
            command_line: self.spec.command_line(),
            rx,
        }
    }
}

/// Completion handle for a started run.
#[derive(Debug)]
pub struct RunHandle {
    command_line: String,
    rx: oneshot::Receiver<RunResult>,
}

impl RunHandle {
    /// Wait for the run to complete.
    ///
    /// If the run task went away without reporting (it panicked), this
    /// resolves to a launch failure.
    pub async fn wait(self) -> RunResult {
        match self.rx.await {
            Ok(result) => result,
            Err(_) => {
                warn!(command = %self.command_line, "run ended without reporting completion");
                RunResult::spawn_failed()
            }
        }
    }
}
