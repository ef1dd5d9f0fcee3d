use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "recast=info";

/// Log to stderr, filtered by `RUST_LOG` (default `recast=info`).
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    // A subscriber may already be installed (tests); keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
