use std::io;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. `RUST_LOG` wins over the verbosity count.
/// Output goes to stderr so answers on stdout stay clean.
pub fn setup_logging(verbose_level: u8) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(filter_for(verbose_level))
    };

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .with_writer(io::stderr)
        .try_init();

    if let Err(e) = result {
        eprintln!("Logging already initialized: {e}");
    }
}

fn filter_for(verbose_level: u8) -> &'static str {
    match verbose_level {
        0 => "warn,mrkl_agent=warn,web=warn",
        1 => "info,mrkl_agent=info,web=info",
        2 => "info,mrkl_agent=debug,web=debug",
        _ => "debug,mrkl_agent=trace,web=trace",
    }
}
