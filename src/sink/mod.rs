// src/sink/mod.rs

//! Progress sinks: where status lines, progress ticks and echoed command
//! output go.
//!
//! - [`ConsoleSink`] writes to the parent's stdout only.
//! - [`TeeSink`] writes to stdout and duplicates everything into a file.
//!
//! Sinks are shared as [`SharedSink`] handles so an existing sink can be
//! reused as a run's `record` target. Writes are best-effort: a failing
//! console or backing file is reported through `tracing` and never reaches
//! the run.

use std::fmt::Debug;
use std::sync::Arc;

mod console;
mod tee;

pub use console::ConsoleSink;
pub use tee::TeeSink;

/// Destination for formatted log lines and raw output bytes.
pub trait ProgressSink: Send + Sync + Debug {
    /// Write one line of text; the sink appends the line terminator.
    fn log(&self, line: &str);

    /// Write raw bytes verbatim (echoed command output, progress ticks).
    fn write(&self, bytes: &[u8]);
}

/// Shared handle to a sink.
pub type SharedSink = Arc<dyn ProgressSink>;

/// A console-only sink behind a shared handle.
pub fn console() -> SharedSink {
    Arc::new(ConsoleSink)
}
