// src/options/model.rs

use std::fmt;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::str::FromStr;

use crate::sink::SharedSink;

/// Progress reporting mode.
///
/// - `Off`: no status lines, no ticks.
/// - `On`: status lines around the run; intercepted output is echoed.
/// - `Ticking(n)`: status lines plus one tick per `n` routed output chunks;
///   raw output is never echoed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Progress {
    #[default]
    Off,
    On,
    Ticking(NonZeroUsize),
}

impl Progress {
    /// Whether progress was requested at all.
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Progress::Off)
    }

    /// The tick threshold, if this is a numeric progress setting.
    pub fn threshold(&self) -> Option<NonZeroUsize> {
        match self {
            Progress::Ticking(n) => Some(*n),
            _ => None,
        }
    }
}

impl FromStr for Progress {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "false" | "off" => Ok(Progress::Off),
            "true" | "on" => Ok(Progress::On),
            other => {
                let n: usize = other.parse().map_err(|_| {
                    format!("invalid progress: {other} (expected \"false\", \"true\" or a positive integer)")
                })?;
                NonZeroUsize::new(n)
                    .map(Progress::Ticking)
                    .ok_or_else(|| "progress threshold must be a positive integer (got 0)".to_string())
            }
        }
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Progress::Off => f.write_str("false"),
            Progress::On => f.write_str("true"),
            Progress::Ticking(n) => write!(f, "{n}"),
        }
    }
}

/// Where sink output is recorded.
#[derive(Debug, Clone, Default)]
pub enum Record {
    #[default]
    None,
    /// Create a new console+file sink backed by this path.
    Path(PathBuf),
    /// Reuse an existing sink.
    Sink(SharedSink),
}

impl Record {
    pub fn is_none(&self) -> bool {
        matches!(self, Record::None)
    }
}

/// Options controlling how one run handles the child's output.
///
/// The default is no redirect, progress off, no record.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// File receiving all child output.
    pub redirect: Option<PathBuf>,
    pub progress: Progress,
    pub record: Record,
}

impl Options {
    pub fn with_redirect(mut self, path: impl Into<PathBuf>) -> Self {
        self.redirect = Some(path.into());
        self
    }

    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_record(mut self, record: Record) -> Self {
        self.record = record;
        self
    }
}

/// How a run invocation treats the command's stored options.
#[derive(Debug, Clone, Default)]
pub enum OptionsUpdate {
    /// Use the options already set on the command.
    #[default]
    Keep,
    /// Replace the stored options before running.
    Set(Options),
    /// Reset the stored options to defaults before running.
    Reset,
}
