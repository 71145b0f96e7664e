pub mod builders;
pub mod fixed_clock;
pub mod memory_sink;

use std::path::Path;
use std::sync::{Arc, Once};

use simplecmd::exec::SessionEnv;
use tracing_subscriber::{EnvFilter, fmt};

pub use fixed_clock::FixedClock;
pub use memory_sink::{MemorySink, SinkEvent};

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer() // print only for failing tests unless --nocapture
            .with_target(true)
            .init();
    });
}

/// Run a future with a 5-second timeout.
#[allow(dead_code)]
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(std::time::Duration::from_secs(5), f)
        .await
        .expect("Test timed out after 5 seconds")
}

/// A session environment rooted in `temp_dir`, with a fixed clock and a
/// recording console sink.
pub fn test_env(temp_dir: &Path) -> (SessionEnv, Arc<MemorySink>) {
    let console = Arc::new(MemorySink::new());
    let env = SessionEnv {
        temp_dir: temp_dir.to_path_buf(),
        clock: Arc::new(FixedClock::default()),
        console: console.clone(),
    };
    (env, console)
}
