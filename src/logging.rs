// logging.rs - Diagnostic logging setup
// Purpose: tracing subscriber on stderr so stdout carries only results

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

/// Initialize logging. `RUST_LOG` wins when set; otherwise warnings only,
/// or this crate's debug events when `debug` is on.
pub fn init_logging(debug: bool) -> Result<()> {
    let default = if debug { "warn,gcsenum=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {}", e))
}
