use tracing_subscriber::EnvFilter;

/// Logs to stderr so stdout only carries the report.
///
/// Lookup failures are reported at `warn`. Use RUST_LOG to change that, e.g.
/// `RUST_LOG=mailposture_lib=debug` to also see empty answers and retries.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init()
        .ok();
}
