use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Compact stderr logging. `verbose` adds the per-step debug notices.
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("theme_builder=debug")
    } else {
        EnvFilter::new("theme_builder=info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}
