//! Logging init: human-readable tracing output on stderr.
//!
//! stdout is reserved for reports and JSON, so logs never mix into piped output.

use tracing_subscriber::EnvFilter;

/// Initialize logging. `RUST_LOG` wins over the verbosity flag when set.
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "warn,url_scout=debug"
    } else {
        "warn,url_scout=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
