use std::sync::Once;

static TRACING_INIT: Once = Once::new();

const DEFAULT_FILTER: &str = "warn,cashflow=info,cashflow_core=info,cashflow_ingest=info,cashflow_reports=info";

/// Installs the global subscriber once; `RUST_LOG` overrides the default filter.
/// Logs go to stderr so `show` output stays clean on stdout.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt};

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
    });
}
