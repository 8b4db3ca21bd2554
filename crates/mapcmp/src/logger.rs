//! Minimal `tracing` setup shared by the CLI and examples.

use tracing_subscriber::EnvFilter;

/// Install a global subscriber writing to stderr.
///
/// `level` overrides the `RUST_LOG` environment variable when given (e.g.
/// `"debug"` or `"mapcmp_core=trace"`). Repeated calls are no-ops.
pub fn init(level: Option<&str>) {
    let filter = match level {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
