// src/exec/runner.rs

//! Spawning the child and driving one run to completion.

use std::process::Stdio;

use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant, timeout_at};
use tracing::{debug, info};

use crate::command::CommandSpec;
use crate::exec::completion::CompletionNotifier;
use crate::exec::router::{Chunk, ChunkRouter, Stream, spawn_reader};
use crate::exec::session::{OutputSession, SessionEnv};
use crate::options::{IoStrategy, Options, resolve};

/// Run `spec` once with `options` and report through `notifier`.
///
/// Order of events:
/// 1. resolve the strategy and open the session (capture file ready),
/// 2. log the invocation when progress is requested,
/// 3. spawn the child wired per strategy,
/// 4. route intercepted output until the child exits,
/// 5. complete: close the capture file, then notify.
pub async fn execute(
    spec: &CommandSpec,
    options: &Options,
    env: &SessionEnv,
    mut notifier: CompletionNotifier,
) {
    let strategy = resolve(options);
    let command_line = spec.command_line();
    debug!(command = %command_line, %strategy, "resolved I/O strategy");

    let mut session = OutputSession::open(strategy, options, spec, env).await;

    if options.progress.is_enabled() {
        session.sink().log(&format!(
            "From {}, invoking command:\n{}",
            spec.workdir().display(),
            command_line
        ));
        if let Some(path) = session.capture_path() {
            session.sink().log(&format!(
                "Command output will be captured in {}",
                path.display()
            ));
        }
    }

    let child = match spawn_child(spec, strategy, &mut session).await {
        Ok(child) => child,
        Err(e) => {
            notifier.on_error(&e, &command_line, &mut session).await;
            return;
        }
    };
    info!(command = %command_line, pid = ?child.id(), %strategy, "spawned process");

    let (status, chunks) = match strategy {
        IoStrategy::Intercepted => wait_intercepted(child, options, &mut session).await,
        IoStrategy::Inherit | IoStrategy::DirectRedirect => {
            let mut child = child;
            (child.wait().await, 0)
        }
    };

    match status {
        Ok(status) => {
            notifier
                .on_exit(status, chunks, &command_line, options.progress, &mut session)
                .await;
        }
        Err(e) => {
            notifier.on_error(&e, &command_line, &mut session).await;
        }
    }
}

/// Spawn the child with stdio wired per `strategy`.
///
/// The program is executed directly; arguments are passed verbatim.
async fn spawn_child(
    spec: &CommandSpec,
    strategy: IoStrategy,
    session: &mut OutputSession,
) -> std::io::Result<Child> {
    let mut cmd = Command::new(spec.program());
    cmd.args(spec.args()).current_dir(spec.workdir());

    match strategy {
        IoStrategy::Inherit => {
            cmd.stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit());
        }
        IoStrategy::DirectRedirect => {
            let (out, err) = session.redirect_stdio().await;
            cmd.stdin(Stdio::inherit()).stdout(out).stderr(err);
        }
        IoStrategy::Intercepted => {
            cmd.stdin(Stdio::inherit())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped());
        }
    }

    // `cmd` holds the parent's copies of any redirect handles; they are
    // released when it goes out of scope here.
    cmd.spawn()
}

/// How long output is still routed after the child has exited.
///
/// Background processes started by the child may keep the pipes open; the
/// run completes at the end of this window whether or not they closed.
pub const EXIT_GRACE: Duration = Duration::from_millis(100);

/// Route both pipes through one router until the child exits, then drain
/// what is left within [`EXIT_GRACE`].
async fn wait_intercepted(
    mut child: Child,
    options: &Options,
    session: &mut OutputSession,
) -> (std::io::Result<std::process::ExitStatus>, u64) {
    let (tx, mut rx) = mpsc::channel::<Chunk>(64);
    let mut readers = Vec::with_capacity(2);
    if let Some(stdout) = child.stdout.take() {
        readers.push(spawn_reader(stdout, Stream::Stdout, tx.clone()));
    }
    if let Some(stderr) = child.stderr.take() {
        readers.push(spawn_reader(stderr, Stream::Stderr, tx.clone()));
    }
    drop(tx);

    let mut router = ChunkRouter::new(session, options.progress);
    let mut pipes_open = true;
    let status = loop {
        tokio::select! {
            biased;
            chunk = rx.recv(), if pipes_open => match chunk {
                Some(chunk) => router.route(&chunk).await,
                None => pipes_open = false,
            },
            status = child.wait() => break status,
        }
    };

    let deadline = Instant::now() + EXIT_GRACE;
    while pipes_open {
        match timeout_at(deadline, rx.recv()).await {
            Ok(Some(chunk)) => router.route(&chunk).await,
            Ok(None) => pipes_open = false,
            Err(_) => {
                debug!("pipes still open after process exit; stopping readers");
                break;
            }
        }
    }
    for reader in readers {
        reader.abort();
    }

    (status, router.routed())
}
