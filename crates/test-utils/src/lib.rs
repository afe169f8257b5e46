//! Test doubles and fixtures shared by the `shardsweep` integration tests.
//!
//! - [`fake_backend::FakeBackend`] stands in for the process backend.
//! - [`builders::SweepFileBuilder`] produces validated sweep files.

pub mod builders;
pub mod fake_backend;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

static INIT: Once = Once::new();

/// Upper bound for one sweep in a test. Fault delays in fixtures are zero, so
/// anything slower is a hang.
pub const SWEEP_TIMEOUT: Duration = Duration::from_secs(5);

/// Install a capturing subscriber once per test binary.
///
/// Output shows up only for failing tests. `SHARDSWEEP_LOG=debug` widens it.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("SHARDSWEEP_LOG")
            .unwrap_or_else(|_| EnvFilter::new("shardsweep=info,warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Await `f`, failing the test if it outlives [`SWEEP_TIMEOUT`].
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(SWEEP_TIMEOUT, f).await {
        Ok(value) => value,
        Err(_) => panic!("sweep did not finish within {SWEEP_TIMEOUT:?}; is a run waiting for a kill that never comes?"),
    }
}
