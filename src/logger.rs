use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub fn init_logging() {
    let level = if cfg!(debug_assertions) { "debug" } else { "warn" };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    // Diagnostics go to stderr, stdout carries only the JSON report
    let fmt_layer = fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter)
        .init();
}
