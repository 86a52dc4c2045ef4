use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// Filtering is controlled by `OPSDESK_LOG` (falls back to `info`). Calling
/// this more than once is harmless; later calls are ignored.
pub fn init() {
    let filter =
        EnvFilter::try_from_env("OPSDESK_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
