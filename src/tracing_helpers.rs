//! Zero-cost structural logging.
//!
//! With the `tracing` feature enabled these macros forward to the `tracing` crate.
//! Without it (the default) they expand to nothing, so the tree core carries no
//! logging overhead and no `tracing` dependency.
//!
//! ```bash
//! RUST_LOG=two_three_tree=trace cargo test --features tracing scenario
//! ```
//!
//! Only structural fields (height, child index, len) are logged. Keys and values are
//! never passed to these macros, which keeps `Debug` off the collection bounds.

#![allow(unused_macros, unused_imports)]

/// Trace-level logging. Compiles to a no-op without the `tracing` feature.
#[cfg(feature = "tracing")]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

/// Debug-level logging. Compiles to a no-op without the `tracing` feature.
#[cfg(feature = "tracing")]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

pub(crate) use debug_log;
pub(crate) use trace_log;
