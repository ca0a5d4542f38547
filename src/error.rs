/// Errors produced by the bundled [`WriterSink`](crate::writer_sink::WriterSink).
#[derive(thiserror::Error, Debug)]
pub enum SinkError {
    #[error("failed to write log output: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize log record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("log writer lock poisoned")]
    Poisoned,
}

/// Error returned when reading [`SinkConfig`](crate::config::SinkConfig)
/// from the environment.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown output format {0:?}, expected \"line\" or \"json\"")]
    UnknownFormat(String),

    #[error("invalid boolean {value:?} for {key}")]
    InvalidBool { key: &'static str, value: String },
}

/// Error returned when installing the global `tracing` subscriber.
#[derive(thiserror::Error, Debug)]
pub enum InitError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("a global tracing subscriber is already installed")]
    AlreadyInstalled(#[from] tracing::subscriber::SetGlobalDefaultError),
}
