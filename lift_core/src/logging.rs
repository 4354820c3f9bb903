//! Tracing setup for the `lift` binary.
//!
//! Plans, the next day and `--json` output go to stdout; log lines always go
//! to stderr. `RUST_LOG` overrides whatever default level is chosen here.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log level used by the CLI when `RUST_LOG` is unset
pub fn cli_level(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn"
    }
}

/// Install the subscriber for a CLI run
pub fn init_cli(verbose: bool) {
    init_with_level(cli_level(verbose))
}

/// Install a compact stderr subscriber defaulting to `default_level`
pub fn init_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}
