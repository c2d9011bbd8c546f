use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "course_lab=info";
const VERBOSE_FILTER: &str = "course_lab=debug,info";

fn env_filter(verbose: bool) -> EnvFilter {
    let fallback = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Compact human-readable logs for the demo binaries.
///
/// `RUST_LOG` wins over the built-in filter. Safe to call more than once.
pub fn init_logger(verbose: bool) {
    let _ = tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();
}

/// One JSON object per line, for running the servers behind a log collector.
pub fn init_json_logger() {
    let _ = tracing_subscriber::registry()
        .with(env_filter(false))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .try_init();
}

/// `--verbose` / `-v` anywhere on the command line.
pub fn verbose_from_args() -> bool {
    std::env::args().any(|arg| arg == "--verbose" || arg == "-v")
}
