#![allow(dead_code)]

use std::path::PathBuf;

use simplecmd::config::{CommandEntry, DefaultsSection, PlanFile, ProgressSetting, RawPlanFile};

/// Builder for `PlanFile` to simplify test setup.
pub struct PlanBuilder {
    plan: RawPlanFile,
}

impl PlanBuilder {
    pub fn new() -> Self {
        Self {
            plan: RawPlanFile {
                defaults: DefaultsSection::default(),
                commands: Vec::new(),
            },
        }
    }

    pub fn with_command(mut self, entry: CommandEntry) -> Self {
        self.plan.commands.push(entry);
        self
    }

    pub fn with_default_workdir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.plan.defaults.workdir = Some(dir.into());
        self
    }

    pub fn with_default_progress(mut self, progress: ProgressSetting) -> Self {
        self.plan.defaults.progress = Some(progress);
        self
    }

    pub fn keep_going(mut self, val: bool) -> Self {
        self.plan.defaults.keep_going = Some(val);
        self
    }

    pub fn raw(self) -> RawPlanFile {
        self.plan
    }

    pub fn build(self) -> PlanFile {
        PlanFile::try_from(self.plan).expect("Failed to build valid plan from builder")
    }
}

impl Default for PlanBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `CommandEntry`.
pub struct CommandEntryBuilder {
    entry: CommandEntry,
}

impl CommandEntryBuilder {
    pub fn new(program: &str) -> Self {
        Self {
            entry: CommandEntry {
                name: None,
                program: program.to_string(),
                args: vec![],
                workdir: None,
                redirect: None,
                progress: None,
                record: None,
            },
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.entry.name = Some(name.to_string());
        self
    }

    pub fn arg(mut self, arg: &str) -> Self {
        self.entry.args.push(arg.to_string());
        self
    }

    pub fn workdir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.entry.workdir = Some(dir.into());
        self
    }

    pub fn redirect(mut self, path: impl Into<PathBuf>) -> Self {
        self.entry.redirect = Some(path.into());
        self
    }

    pub fn progress(mut self, progress: ProgressSetting) -> Self {
        self.entry.progress = Some(progress);
        self
    }

    pub fn record(mut self, path: impl Into<PathBuf>) -> Self {
        self.entry.record = Some(path.into());
        self
    }

    pub fn build(self) -> CommandEntry {
        self.entry
    }
}
