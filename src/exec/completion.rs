// src/exec/completion.rs

//! Completion of a run: final log lines, cleanup, and exactly-once delivery
//! of the [`RunResult`].

use std::process::ExitStatus;

use tokio::sync::oneshot;
use tracing::{info, warn};

use crate::exec::session::OutputSession;
use crate::options::Progress;

/// Exit code reported when the program could not be launched.
pub const SPAWN_FAILED_CODE: i32 = -1;

/// Outcome of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    /// Exit code; `-1` when the program could not be launched, `128 + n`
    /// when it was killed by signal `n`.
    pub code: i32,
    /// Signal name when the process was killed rather than exiting.
    pub signal: Option<String>,
    /// Chunks routed; zero unless output was intercepted.
    pub chunks: u64,
}

impl RunResult {
    pub fn spawn_failed() -> Self {
        Self {
            code: SPAWN_FAILED_CODE,
            signal: None,
            chunks: 0,
        }
    }

    pub fn from_status(status: ExitStatus, chunks: u64) -> Self {
        let signal = signal_number(&status);
        let code = match (status.code(), signal) {
            (Some(code), _) => code,
            (None, Some(signo)) => 128 + signo,
            (None, None) => SPAWN_FAILED_CODE,
        };
        Self {
            code,
            signal: signal.map(signal_name),
            chunks,
        }
    }

    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Caller-supplied completion callback.
pub type CompletionCallback = Box<dyn FnOnce(&RunResult) + Send>;

/// Lifecycle of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    Running,
    Exited { code: i32, signal: Option<String> },
    SpawnFailed,
}

/// Delivers a run's completion exactly once.
///
/// The first of [`on_exit`](Self::on_exit) / [`on_error`](Self::on_error)
/// wins: it logs, closes the session's capture file, invokes the callback
/// and resolves the completion channel. Every later call returns `false`
/// and does nothing.
pub struct CompletionNotifier {
    state: RunState,
    tx: Option<oneshot::Sender<RunResult>>,
    callback: Option<CompletionCallback>,
}

impl std::fmt::Debug for CompletionNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionNotifier")
            .field("state", &self.state)
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}

impl CompletionNotifier {
    pub fn new(
        tx: Option<oneshot::Sender<RunResult>>,
        callback: Option<CompletionCallback>,
    ) -> Self {
        Self {
            state: RunState::Running,
            tx,
            callback,
        }
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state != RunState::Running
    }

    /// The child exited (normally or by signal).
    pub async fn on_exit(
        &mut self,
        status: ExitStatus,
        chunks: u64,
        command_line: &str,
        progress: Progress,
        session: &mut OutputSession,
    ) -> bool {
        if self.is_complete() {
            return false;
        }

        let result = RunResult::from_status(status, chunks);
        info!(
            command = %command_line,
            exit_code = result.code,
            signal = ?result.signal,
            chunks,
            "process exited"
        );

        if progress.is_enabled() {
            session.sink().log(&format!("Done: {command_line}"));
        }
        if let Some(name) = &result.signal {
            session.sink().log(&format!(
                "Terminated by {name} (exit code {}): {command_line}",
                result.code
            ));
        }

        self.state = RunState::Exited {
            code: result.code,
            signal: result.signal.clone(),
        };
        self.deliver(result, session).await;
        true
    }

    /// The program could not be launched, or waiting on it failed.
    pub async fn on_error(
        &mut self,
        err: &std::io::Error,
        command_line: &str,
        session: &mut OutputSession,
    ) -> bool {
        if self.is_complete() {
            return false;
        }

        warn!(command = %command_line, error = %err, "error running command");
        session
            .sink()
            .log(&format!("Error running \"{command_line}\": {err}"));

        self.state = RunState::SpawnFailed;
        self.deliver(RunResult::spawn_failed(), session).await;
        true
    }

    async fn deliver(&mut self, result: RunResult, session: &mut OutputSession) {
        session.close().await;

        if let Some(callback) = self.callback.take() {
            callback(&result);
        }
        if let Some(tx) = self.tx.take() {
            // The receiver may have been dropped; nobody is waiting then.
            let _ = tx.send(result);
        }
    }
}

#[cfg(unix)]
fn signal_number(status: &ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn signal_number(_status: &ExitStatus) -> Option<i32> {
    None
}

/// Conventional name for a signal number on this platform.
#[cfg(unix)]
pub fn signal_name(signo: i32) -> String {
    let name = match signo {
        libc::SIGHUP => "SIGHUP",
        libc::SIGINT => "SIGINT",
        libc::SIGQUIT => "SIGQUIT",
        libc::SIGILL => "SIGILL",
        libc::SIGTRAP => "SIGTRAP",
        libc::SIGABRT => "SIGABRT",
        libc::SIGBUS => "SIGBUS",
        libc::SIGFPE => "SIGFPE",
        libc::SIGKILL => "SIGKILL",
        libc::SIGUSR1 => "SIGUSR1",
        libc::SIGSEGV => "SIGSEGV",
        libc::SIGUSR2 => "SIGUSR2",
        libc::SIGPIPE => "SIGPIPE",
        libc::SIGALRM => "SIGALRM",
        libc::SIGTERM => "SIGTERM",
        _ => return format!("SIG{signo}"),
    };
    name.to_string()
}

#[cfg(not(unix))]
pub fn signal_name(signo: i32) -> String {
    format!("SIG{signo}")
}
