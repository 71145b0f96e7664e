// src/sink/tee.rs

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, warn};

use super::{ConsoleSink, ProgressSink};

/// Sink that writes to the console and mirrors everything into a file.
#[derive(Debug)]
pub struct TeeSink {
    console: ConsoleSink,
    path: PathBuf,
    file: Mutex<File>,
}

impl TeeSink {
    /// Create (or truncate) the backing file at `path`.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        debug!(path = %path.display(), "opened record file");
        Ok(Self {
            console: ConsoleSink,
            path,
            file: Mutex::new(file),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn mirror(&self, bytes: &[u8]) {
        let mut file = match self.file.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = file.write_all(bytes) {
            warn!(path = %self.path.display(), error = %e, "failed to write to record file");
        }
    }
}

impl ProgressSink for TeeSink {
    fn log(&self, line: &str) {
        self.console.log(line);
        self.mirror(format!("{line}\n").as_bytes());
    }

    fn write(&self, bytes: &[u8]) {
        self.console.write(bytes);
        self.mirror(bytes);
    }
}
