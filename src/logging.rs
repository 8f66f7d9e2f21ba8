use tracing_subscriber::EnvFilter;

/// Initialize tracing from the `-v` count; `RUST_LOG` wins when set.
///
/// 0 -> warn, 1 -> info, 2 -> debug, 3+ -> trace.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn default_directive(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    format!("glucotracker={level}")
}
