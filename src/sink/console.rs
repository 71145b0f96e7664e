// src/sink/console.rs

use std::io::Write;

use tracing::warn;

use super::ProgressSink;

/// Sink writing to the process stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl ProgressSink for ConsoleSink {
    fn log(&self, line: &str) {
        let mut out = std::io::stdout().lock();
        if let Err(e) = writeln!(out, "{line}") {
            warn!(error = %e, "failed to write log line to stdout");
        }
    }

    fn write(&self, bytes: &[u8]) {
        let mut out = std::io::stdout().lock();
        if let Err(e) = out.write_all(bytes).and_then(|_| out.flush()) {
            warn!(error = %e, "failed to write output to stdout");
        }
    }
}
