//! Common utilities for uhttp
//!
//! Shared by the client (`uhttp`) and the server middleware (`uhttp-axum`):
//! - `RawJson`: logs a byte body as-is, without re-parsing it
//! - `telemetry`: installs a `tracing` subscriber for binaries and tests
//! - `capture` (feature `test-util`): records events for assertions

#[cfg(feature = "test-util")]
pub mod capture;
pub mod raw_json;
pub mod telemetry;

pub use raw_json::RawJson;
pub use telemetry::{init_logging, LogConfig};
