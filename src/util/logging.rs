//! Thin `tracing` wiring for binaries and tests that want output. `deft`
//! itself only emits events (`tracing::{debug,info,warn}`); it never
//! installs a subscriber on its own, leaving log formatting and sinks up
//! to whoever embeds the crate.

use tracing_subscriber::EnvFilter;

/// Installs a `tracing-subscriber` `fmt` layer driven by `DEFT_LOG` (falling
/// back to `info`). Safe to call more than once; later calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_env("DEFT_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
