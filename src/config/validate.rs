// src/config/validate.rs

use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::command::CommandSpec;
use crate::config::model::{CommandEntry, PlanCommand, PlanFile, ProgressSetting, RawPlanFile};
use crate::errors::{Result, SimplecmdError};
use crate::options::{Options, Progress, Record};

impl TryFrom<RawPlanFile> for PlanFile {
    type Error = SimplecmdError;

    fn try_from(raw: RawPlanFile) -> std::result::Result<Self, Self::Error> {
        ensure_has_commands(&raw)?;

        let default_workdir = raw
            .defaults
            .workdir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        let default_progress = match raw.defaults.progress {
            Some(setting) => to_progress(setting, "[defaults]")?,
            None => Progress::Off,
        };

        let mut seen = HashSet::new();
        let mut commands = Vec::with_capacity(raw.commands.len());
        for (index, entry) in raw.commands.into_iter().enumerate() {
            let cmd = build_command(index, entry, &default_workdir, default_progress)?;
            if !seen.insert(cmd.name.clone()) {
                return Err(SimplecmdError::ConfigError(format!(
                    "duplicate command name '{}'",
                    cmd.name
                )));
            }
            commands.push(cmd);
        }

        Ok(PlanFile {
            keep_going: raw.defaults.keep_going.unwrap_or(true),
            commands,
        })
    }
}

fn ensure_has_commands(raw: &RawPlanFile) -> Result<()> {
    if raw.commands.is_empty() {
        return Err(SimplecmdError::ConfigError(
            "plan must contain at least one [[command]] section".to_string(),
        ));
    }
    Ok(())
}

fn build_command(
    index: usize,
    entry: CommandEntry,
    default_workdir: &Path,
    default_progress: Progress,
) -> Result<PlanCommand> {
    let name = entry
        .name
        .clone()
        .unwrap_or_else(|| format!("command-{index}"));

    if entry.program.trim().is_empty() {
        return Err(SimplecmdError::ConfigError(format!(
            "command '{name}' has an empty `program`"
        )));
    }

    let progress = match entry.progress {
        Some(setting) => to_progress(setting, &format!("command '{name}'"))?,
        None => default_progress,
    };
    let record = match entry.record {
        Some(path) => Record::Path(path),
        None => Record::None,
    };
    let workdir = entry.workdir.unwrap_or_else(|| default_workdir.to_path_buf());

    Ok(PlanCommand {
        spec: CommandSpec::new(entry.program, entry.args, workdir),
        options: Options {
            redirect: entry.redirect,
            progress,
            record,
        },
        name,
    })
}

fn to_progress(setting: ProgressSetting, owner: &str) -> Result<Progress> {
    match setting {
        ProgressSetting::Flag(false) => Ok(Progress::Off),
        ProgressSetting::Flag(true) => Ok(Progress::On),
        ProgressSetting::Every(n) => usize::try_from(n)
            .ok()
            .and_then(NonZeroUsize::new)
            .map(Progress::Ticking)
            .ok_or_else(|| {
                SimplecmdError::ConfigError(format!(
                    "{owner}: progress must be true, false or a positive integer (got {n})"
                ))
            }),
    }
}
