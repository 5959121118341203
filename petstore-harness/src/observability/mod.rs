//! Logging setup for harness runs.
//!
//! HTTP traffic is logged on the `http_traffic` target and each service step
//! runs inside a `step` span, so `RUST_LOG=http_traffic=off` silences the
//! wire dump while keeping step results.

mod tracing;

pub use self::tracing::TracingConfig;
