use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::Error;

/// Send logs to `path`. The terminal is owned by the ui, so nothing goes to stdout.
///
/// The filter comes from `RUST_LOG`, defaulting to `info` for calmark and `warn` for everything else.
pub fn init(path: &Path) -> Result<(), Error> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,calmark=info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to set up logging: {e}")))
}
