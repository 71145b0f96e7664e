// src/exec/router.rs

//! Routing of intercepted child output.
//!
//! Every chunk read from either pipe is one routing event. The router sends
//! the raw bytes to the capture file when there is one, echoes them to the
//! sink when progress is not numeric, and emits a tick every `n` chunks when
//! it is.

use std::num::NonZeroUsize;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::exec::session::{CaptureWrite, OutputSession};
use crate::options::Progress;

/// Marker written to the sink for every `n` routed chunks.
pub const TICK: &[u8] = b"#";

/// Largest chunk a single pipe read delivers.
pub const CHUNK_SIZE: usize = 8 * 1024;

/// Which child stream a chunk came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// One delivery of bytes from a child pipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub stream: Stream,
    pub bytes: Vec<u8>,
}

impl Chunk {
    pub fn new(stream: Stream, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            stream,
            bytes: bytes.into(),
        }
    }
}

/// Routes chunks for one run.
#[derive(Debug)]
pub struct ChunkRouter<'a> {
    session: &'a mut OutputSession,
    threshold: Option<NonZeroUsize>,
    routed: u64,
}

impl<'a> ChunkRouter<'a> {
    pub fn new(session: &'a mut OutputSession, progress: Progress) -> Self {
        Self {
            session,
            threshold: progress.threshold(),
            routed: 0,
        }
    }

    /// Number of chunks routed so far.
    pub fn routed(&self) -> u64 {
        self.routed
    }

    pub async fn route(&mut self, chunk: &Chunk) {
        self.routed += 1;
        trace!(stream = ?chunk.stream, len = chunk.bytes.len(), n = self.routed, "routing chunk");

        let written = self.session.write_capture(&chunk.bytes).await;
        if written == CaptureWrite::NoCapture && self.threshold.is_none() {
            self.session.sink().write(&chunk.bytes);
        }

        if let Some(n) = self.threshold {
            if self.routed % n.get() as u64 == 0 {
                self.session.sink().write(TICK);
            }
        }
    }

    /// Route every chunk from `rx` until all senders are gone.
    pub async fn drain(&mut self, rx: &mut mpsc::Receiver<Chunk>) -> u64 {
        while let Some(chunk) = rx.recv().await {
            self.route(&chunk).await;
        }
        debug!(chunks = self.routed, "output streams closed");
        self.routed
    }
}

/// Forward everything read from `reader` into `tx`, one chunk per read.
///
/// Aborting the returned handle closes the read end of the pipe.
pub fn spawn_reader<R>(mut reader: R, stream: Stream, tx: mpsc::Sender<Chunk>) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = vec![0u8; CHUNK_SIZE];
        loop {
            match reader.read(&mut buf).await {
                Ok(0) => break,
                Ok(n) => {
                    if tx.send(Chunk::new(stream, &buf[..n])).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    debug!(stream = ?stream, error = %e, "read from child pipe failed");
                    break;
                }
            }
        }
        trace!(stream = ?stream, "pipe reader finished");
    })
}
