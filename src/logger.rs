use crate::input::{LogInput, RequestResponse};
use crate::record::{LogRecord, Severity};
use crate::sink::LogSink;
use serde_json::{Map, Value};
use std::error::Error;

/// Result of a logging call: whatever the sink reported.
pub type LogResult = Result<(), Box<dyn Error + Send + Sync>>;

/// Thin façade over a [`LogSink`] that gives every project the same record
/// shape: `message`, optional `error`, flattened extra fields and, for
/// request lines, the `http_*` group.
///
/// Each severity method builds a fresh record with [`build_record`] and
/// forwards it to the sink exactly once. Shaping never fails; only the
/// sink can return an error.
#[derive(Clone, Debug, Default)]
pub struct Logger<S> {
    sink: S,
}

impl<S: LogSink> Logger<S> {
    pub fn new(sink: S) -> Self {
        Logger { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Accepts input like every other level but never reaches the sink.
    pub fn trace(&self, input: impl Into<LogInput>) -> LogResult {
        let _: LogInput = input.into();
        Ok(())
    }

    pub fn debug(&self, input: impl Into<LogInput>) -> LogResult {
        self.forward(Severity::Debug, input.into())
    }

    pub fn info(&self, input: impl Into<LogInput>) -> LogResult {
        self.forward(Severity::Info, input.into())
    }

    pub fn warn(&self, input: impl Into<LogInput>) -> LogResult {
        self.forward(Severity::Warn, input.into())
    }

    pub fn error(&self, input: impl Into<LogInput>) -> LogResult {
        self.forward(Severity::Error, input.into())
    }

    /// Accepts the same input as every other level and does nothing.
    pub fn fatal(&self, input: impl Into<LogInput>) -> LogResult {
        let _: LogInput = input.into();
        Ok(())
    }

    /// Log at an explicit severity. `Trace` and `Fatal` behave like
    /// [`Logger::trace`] and [`Logger::fatal`].
    pub fn log(&self, severity: Severity, input: impl Into<LogInput>) -> LogResult {
        match severity {
            Severity::Trace => self.trace(input),
            Severity::Debug => self.debug(input),
            Severity::Info => self.info(input),
            Severity::Warn => self.warn(input),
            Severity::Error => self.error(input),
            Severity::Fatal => self.fatal(input),
        }
    }

    /// Flush the underlying sink.
    pub fn flush(&self) -> LogResult {
        self.sink.flush()
    }

    fn forward(&self, severity: Severity, input: LogInput) -> LogResult {
        self.sink.log(severity, build_record(&input))
    }
}

/// Shape one logging call into a flat record.
///
/// Fields are added in this order, later ones overwriting same-named
/// earlier ones: `message`, `error`, every extra field, then the `http_*`
/// group when the input is a complete request line. Nothing is validated:
/// a missing `message` is simply left out.
pub fn build_record(input: &LogInput) -> LogRecord {
    let mut record = LogRecord::new();
    if let Some(message) = input.message() {
        record.insert("message", message.clone());
    }

    if let Some(error) = input.error() {
        record.insert("error", error.render());
    }

    if let Some(extra) = input.extra() {
        add_extra(&mut record, extra);
    }

    if let LogInput::Request(request) = input {
        add_request_response(&mut record, request);
    }

    record
}

fn add_extra(record: &mut LogRecord, extra: &Map<String, Value>) {
    for (key, value) in extra {
        record.insert(key.clone(), value.clone());
    }
}

fn add_request_response(record: &mut LogRecord, request: &RequestResponse) {
    if !request.is_complete() {
        return;
    }

    record.insert("http_method", request.method.as_str());
    record.insert("http_status", request.status);
    record.insert("http_client_ip", request.client_ip.as_str());
    record.insert("http_url", request.path.as_str());
    if let Some(response_size) = request.response_size {
        record.insert("http_response_size", response_size);
    }
    if let Some(elapsed) = request.elapsed {
        record.insert("http_elapsed", elapsed);
    }
}
