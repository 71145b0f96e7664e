// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::command::{Command, CommandSpec};
use crate::exec::SessionEnv;
use crate::options::Options;

/// Plan file as read from TOML, before validation.
///
/// ```toml
/// [defaults]
/// workdir = "."
/// progress = false
/// keep_going = true
///
/// [[command]]
/// name = "list"
/// program = "ls"
/// args = ["-l"]
/// workdir = "/etc"
/// redirect = "ls.out"
/// progress = 5
/// record = "ls.rec"
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawPlanFile {
    /// Values applied to commands that do not set their own.
    #[serde(default)]
    pub defaults: DefaultsSection,

    /// Commands from `[[command]]`, in run order.
    #[serde(default, rename = "command")]
    pub commands: Vec<CommandEntry>,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DefaultsSection {
    /// Working directory for commands without one; `.` if unset.
    #[serde(default)]
    pub workdir: Option<PathBuf>,

    #[serde(default)]
    pub progress: Option<ProgressSetting>,

    /// Keep running later commands after one exits non-zero (default true).
    #[serde(default)]
    pub keep_going: Option<bool>,
}

/// `progress = false | true | <n>` as written in TOML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ProgressSetting {
    Flag(bool),
    Every(i64),
}

/// One `[[command]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandEntry {
    /// Display name; `command-<index>` when omitted.
    #[serde(default)]
    pub name: Option<String>,

    pub program: String,

    #[serde(default)]
    pub args: Vec<String>,

    #[serde(default)]
    pub workdir: Option<PathBuf>,

    #[serde(default)]
    pub redirect: Option<PathBuf>,

    #[serde(default)]
    pub progress: Option<ProgressSetting>,

    #[serde(default)]
    pub record: Option<PathBuf>,
}

/// Validated plan, ready to run.
#[derive(Debug, Clone)]
pub struct PlanFile {
    pub keep_going: bool,
    pub commands: Vec<PlanCommand>,
}

/// A validated command with its resolved options.
#[derive(Debug, Clone)]
pub struct PlanCommand {
    pub name: String,
    pub spec: CommandSpec,
    pub options: Options,
}

impl PlanCommand {
    /// Build a runnable [`Command`] for this entry.
    pub fn to_command(&self, env: &SessionEnv) -> Command {
        let mut command = Command::from_spec(self.spec.clone()).with_env(env.clone());
        command.set_options(Some(self.options.clone()));
        command
    }
}
