use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

/// Variable consulted before `RUST_LOG`.
pub const LOG_ENV: &str = "KANA_BENCH_LOG";
const DEFAULT_FILTER: &str = "warn";

/// Install the stderr subscriber; later calls are no-ops.
///
/// Logs go to stderr so stdout only ever carries measurement lines.
pub fn init() {
    TRACING_INIT.call_once(|| {
        let filter = std::env::var(LOG_ENV)
            .or_else(|_| std::env::var("RUST_LOG"))
            .ok()
            .and_then(|expr| EnvFilter::try_new(expr).ok())
            .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER));

        let _ = fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .with_target(false)
            .try_init();
    });
}
