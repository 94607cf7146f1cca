//! Logging and tracing initialization.

use tracing_subscriber::{fmt, EnvFilter};

/// Installs a stderr subscriber and bridges `log` records into it.
///
/// `RUST_LOG` takes precedence over `level`. Stdout is left for results.
pub fn init_logging(level: &str, json: bool) {
    tracing_log::LogTracer::init().ok();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    } else {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }
}
