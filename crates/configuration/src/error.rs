use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Dashboard config not found at: {0}")]
    NotFound(String),

    #[error("Failed to load configuration from file: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation error: {0}")]
    ValidationError(String),

    #[error("Failed to install the tracing subscriber: {0}")]
    Logging(#[from] tracing::subscriber::SetGlobalDefaultError),
}
