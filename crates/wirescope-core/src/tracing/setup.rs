//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter directives.
pub const LOG_ENV_VAR: &str = "WIRESCOPE_LOG";

/// Filter used when `WIRESCOPE_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "wirescope=info";

static INIT: Once = Once::new();

/// Initialize the wirescope tracing/logging system.
///
/// Reads `WIRESCOPE_LOG` for per-module log levels, e.g.
/// `WIRESCOPE_LOG=wirescope_analysis::resolver=debug,wirescope_analysis::scanner=warn`.
/// Falls back to `wirescope=info` if the variable is not set or is invalid.
///
/// Idempotent: only the first call installs a subscriber. If another global
/// subscriber is already installed, this is a no-op.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
