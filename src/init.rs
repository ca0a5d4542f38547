use crate::config::SinkConfig;
use crate::error::InitError;
use crate::layer::RecordLayer;
use crate::logger::Logger;
use crate::sink::LogSink;
use crate::writer_sink::WriterSink;
use std::io::Stdout;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Logger writing to stdout, formatted according to `config`.
pub fn stdout_logger(config: SinkConfig) -> Logger<WriterSink<Stdout>> {
    Logger::new(WriterSink::stdout(config.format(), config.output))
}

/// Install a global `tracing` subscriber that routes every event through
/// [`RecordLayer`] into `sink`.
///
/// **Errors**
/// - [`InitError::AlreadyInstalled`] if another global subscriber exists.
pub fn init_tracing_with_sink<S>(sink: S) -> Result<(), InitError>
where
    S: LogSink + 'static,
{
    let subscriber = Registry::default().with(RecordLayer::new(sink));
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Install a global `tracing` subscriber writing to stdout.
///
/// Equivalent to [`init_tracing_with_sink`] with a stdout [`WriterSink`]
/// built from `config`.
pub fn init_tracing(config: SinkConfig) -> Result<(), InitError> {
    init_tracing_with_sink(WriterSink::stdout(config.format(), config.output))
}

/// Read [`SinkConfig`] from the environment, install the global `tracing`
/// subscriber and return a [`Logger`] sharing the same stdout sink.
///
/// This is the recommended entrypoint for services: `tracing` macros from
/// dependencies and direct [`Logger`] calls end up in one stream with one
/// record shape.
pub fn init_from_env() -> Result<Logger<Arc<WriterSink<Stdout>>>, InitError> {
    let config = SinkConfig::from_env()?;
    let sink = Arc::new(WriterSink::stdout(config.format(), config.output));
    init_tracing_with_sink(Arc::clone(&sink))?;
    Ok(Logger::new(sink))
}
