use crate::record::{LogRecord, Severity};
use crate::sink::LogSink;
use std::error::Error;

/// A sink that simply drops all records.
///
/// Useful for measuring the overhead of record shaping without any output,
/// and for callers that want a logger wired up but silent.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl LogSink for NoopSink {
    fn log(
        &self,
        _severity: Severity,
        _record: LogRecord,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }
}
