//! Shared test setup.
//!
//! Structural events are only emitted when the crate is built with the `tracing`
//! feature:
//!
//! ```bash
//! RUST_LOG=two_three_tree=trace cargo test --features tracing scenario -- --nocapture
//! ```

#![allow(dead_code)]

use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// Ensures tracing is only initialized once across all tests.
static INIT: Once = Once::new();

/// Installs an `EnvFilter`-driven subscriber that writes through the test harness.
///
/// Safe to call multiple times; only the first call takes effect.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("two_three_tree=warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(false)
            .try_init();
    });
}
