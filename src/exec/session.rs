// src/exec/session.rs

//! Per-run output resources: the progress sink and the capture file.
//!
//! An [`OutputSession`] is opened before the child is spawned and closed
//! before the run's completion fires. Opening is awaited in full, so the
//! capture file is ready before the child can produce any output.

use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::command::CommandSpec;
use crate::options::{IoStrategy, Options, Progress, Record};
use crate::sink::{self, SharedSink, TeeSink};

/// Source of the timestamp used to name generated capture files.
pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Process-global inputs an [`OutputSession`] depends on.
///
/// The default uses the OS temp directory, the wall clock and a console sink
/// on stdout; tests substitute all three.
#[derive(Debug, Clone)]
pub struct SessionEnv {
    pub temp_dir: PathBuf,
    pub clock: Arc<dyn Clock>,
    pub console: SharedSink,
}

impl Default for SessionEnv {
    fn default() -> Self {
        Self {
            temp_dir: std::env::temp_dir(),
            clock: Arc::new(SystemClock),
            console: sink::console(),
        }
    }
}

impl SessionEnv {
    /// Name of the generated capture file for `program`.
    ///
    /// Deterministic in the program name and the clock reading.
    pub fn temp_capture_path(&self, program: &str) -> PathBuf {
        let stem = Path::new(program)
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or("command");
        let stamp = self.clock.now().format("%Y%m%dT%H%M%S%3f");
        self.temp_dir.join(format!("{stem}-{stamp}.out"))
    }
}

/// State of the run's capture file.
#[derive(Debug)]
pub enum Capture {
    /// No capture file was requested.
    None,
    /// Output is written to this open file.
    File { path: PathBuf, file: File },
    /// A capture file was requested but could not be opened or written;
    /// output is discarded.
    Dropped { path: PathBuf },
}

/// Result of offering a chunk to the capture file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureWrite {
    Written,
    Dropped,
    NoCapture,
}

/// Resources owned by one run.
#[derive(Debug)]
pub struct OutputSession {
    sink: SharedSink,
    capture: Capture,
}

impl OutputSession {
    /// Acquire the sink and, if the strategy needs one, the capture file.
    ///
    /// Never fails: a capture file that cannot be opened is reported through
    /// the sink and the session continues with output dropped.
    pub async fn open(
        strategy: IoStrategy,
        options: &Options,
        spec: &CommandSpec,
        env: &SessionEnv,
    ) -> Self {
        let sink = select_sink(&options.record, env);

        let target = match (&options.redirect, strategy, options.progress) {
            (Some(path), _, _) => Some(absolute(path)),
            (None, IoStrategy::Intercepted, Progress::Ticking(_)) => {
                Some(env.temp_capture_path(spec.program()))
            }
            _ => None,
        };

        let capture = match target {
            None => Capture::None,
            Some(path) => match File::create(&path).await {
                Ok(file) => {
                    debug!(path = %path.display(), "capture file ready");
                    Capture::File { path, file }
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to open capture file");
                    sink.log(&format!(
                        "Opening capture file {} failed: {e}",
                        path.display()
                    ));
                    Capture::Dropped { path }
                }
            },
        };

        Self { sink, capture }
    }

    pub fn sink(&self) -> &SharedSink {
        &self.sink
    }

    pub fn capture(&self) -> &Capture {
        &self.capture
    }

    /// Path of the open capture file, if any.
    pub fn capture_path(&self) -> Option<&Path> {
        match &self.capture {
            Capture::File { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Two stdio handles onto the capture file for a direct redirect.
    ///
    /// Both handles share one file offset, so stdout and stderr land in the
    /// file in the order the child writes them. Without an open capture the
    /// child is wired to the null device.
    pub(crate) async fn redirect_stdio(&mut self) -> (Stdio, Stdio) {
        let (path, cloned) = match &self.capture {
            Capture::File { path, file } => (path.clone(), file.try_clone().await),
            _ => return (Stdio::null(), Stdio::null()),
        };

        let first = match cloned {
            Ok(f) => f.into_std().await,
            Err(e) => {
                self.fail_capture(path, &e);
                return (Stdio::null(), Stdio::null());
            }
        };
        match first.try_clone() {
            Ok(second) => (Stdio::from(first), Stdio::from(second)),
            Err(e) => {
                self.fail_capture(path, &e);
                (Stdio::null(), Stdio::null())
            }
        }
    }

    /// Write `bytes` to the capture file if one is open.
    ///
    /// The first write error is reported through the sink and every later
    /// chunk is dropped.
    pub(crate) async fn write_capture(&mut self, bytes: &[u8]) -> CaptureWrite {
        let result = match &mut self.capture {
            Capture::None => return CaptureWrite::NoCapture,
            Capture::Dropped { .. } => return CaptureWrite::Dropped,
            Capture::File { path, file } => file.write_all(bytes).await.map_err(|e| (path.clone(), e)),
        };

        match result {
            Ok(()) => CaptureWrite::Written,
            Err((path, e)) => {
                self.fail_capture(path, &e);
                CaptureWrite::Dropped
            }
        }
    }

    fn fail_capture(&mut self, path: PathBuf, err: &std::io::Error) {
        warn!(path = %path.display(), error = %err, "writing capture file failed");
        self.sink
            .log(&format!("Writing capture file {} failed: {err}", path.display()));
        self.capture = Capture::Dropped { path };
    }

    /// Flush and close the capture file. Safe to call more than once.
    pub async fn close(&mut self) {
        let capture = std::mem::replace(&mut self.capture, Capture::None);
        if let Capture::File { path, mut file } = capture {
            if let Err(e) = file.flush().await {
                warn!(path = %path.display(), error = %e, "failed to flush capture file");
            }
            drop(file);
            debug!(path = %path.display(), "capture file closed");
        }
    }
}

fn select_sink(record: &Record, env: &SessionEnv) -> SharedSink {
    match record {
        Record::None => env.console.clone(),
        Record::Sink(sink) => sink.clone(),
        Record::Path(path) => match TeeSink::create(path) {
            Ok(tee) => Arc::new(tee),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to open record file");
                env.console
                    .log(&format!("Opening record file {} failed: {e}", path.display()));
                env.console.clone()
            }
        },
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
