use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the stderr subscriber. `RUST_LOG` wins unless `--verbose` is set.
///
/// Log lines go to stderr so the formatted result on stdout stays parseable.
pub fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("synd=debug,syndication_core=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // A second init (e.g. in tests) is not an error worth surfacing.
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false),
        )
        .try_init();
}
