// src/exec/mod.rs

//! Process execution layer.
//!
//! This module spawns the program with `tokio::process::Command` and governs
//! where its output goes.
//!
//! - [`session`] opens the per-run resources (sink, capture file) before the
//!   child starts, and closes them afterwards.
//! - [`runner`] spawns the child with the stdio wiring of the resolved
//!   strategy and drives the run to completion.
//! - [`router`] reads intercepted pipes and fans each chunk out to the
//!   capture file, the sink, and the progress ticker.
//! - [`completion`] logs the outcome, cleans up, and delivers the
//!   [`RunResult`] exactly once.

pub mod completion;
pub mod router;
pub mod runner;
pub mod session;

pub use completion::{CompletionCallback, CompletionNotifier, RunResult, RunState};
pub use router::{Chunk, ChunkRouter, Stream, TICK};
pub use session::{Capture, Clock, OutputSession, SessionEnv, SystemClock};
