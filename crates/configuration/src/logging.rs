use crate::error::ConfigError;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Installs the global tracing subscriber.
///
/// Log lines are written to stdout through a non-blocking writer; the filter comes
/// from `RUST_LOG` and defaults to `info`. The returned guard flushes pending
/// lines on drop, so the caller must keep it alive for the life of the process.
pub fn init_tracing() -> Result<WorkerGuard, ConfigError> {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(writer)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(guard)
}
