// src/options/resolve.rs

use std::fmt;

use super::model::{Options, Progress};

/// How the child's stdio is wired for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoStrategy {
    /// The child shares the parent's stdin/stdout/stderr.
    Inherit,
    /// stdout and stderr go straight into the redirect file; the runner never
    /// sees the bytes.
    DirectRedirect,
    /// stdout and stderr are piped and routed chunk by chunk.
    Intercepted,
}

impl fmt::Display for IoStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IoStrategy::Inherit => "inherit",
            IoStrategy::DirectRedirect => "direct-redirect",
            IoStrategy::Intercepted => "intercepted",
        };
        f.write_str(s)
    }
}

/// Classify `options` into an I/O strategy.
///
/// Rules, first match wins:
/// 1. nothing set → `Inherit`
/// 2. redirect set, progress not numeric, no record → `DirectRedirect`
/// 3. otherwise → `Intercepted`
pub fn resolve(options: &Options) -> IoStrategy {
    let ticking = matches!(options.progress, Progress::Ticking(_));

    if options.redirect.is_none() && options.progress == Progress::Off && options.record.is_none()
    {
        IoStrategy::Inherit
    } else if options.redirect.is_some() && !ticking && options.record.is_none() {
        IoStrategy::DirectRedirect
    } else {
        IoStrategy::Intercepted
    }
}
