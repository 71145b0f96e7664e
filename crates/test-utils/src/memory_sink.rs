use std::sync::Mutex;

use simplecmd::exec::TICK;
use simplecmd::sink::ProgressSink;

/// One call received by a [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Log(String),
    Write(Vec<u8>),
}

/// A sink that records every call instead of printing.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<SinkEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SinkEvent::Log(line) => Some(line),
                SinkEvent::Write(_) => None,
            })
            .collect()
    }

    /// Number of tick writes.
    pub fn ticks(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, SinkEvent::Write(b) if b.as_slice() == TICK))
            .count()
    }

    /// Concatenation of every non-tick write.
    pub fn raw_output(&self) -> Vec<u8> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SinkEvent::Write(b) if b.as_slice() != TICK => Some(b),
                _ => None,
            })
            .flatten()
            .collect()
    }
}

impl ProgressSink for MemorySink {
    fn log(&self, line: &str) {
        self.events
            .lock()
            .unwrap()
            .push(SinkEvent::Log(line.to_string()));
    }

    fn write(&self, bytes: &[u8]) {
        self.events
            .lock()
            .unwrap()
            .push(SinkEvent::Write(bytes.to_vec()));
    }
}
