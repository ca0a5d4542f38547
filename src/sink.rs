use crate::record::{LogRecord, Severity};
use std::error::Error;
use std::sync::Arc;

/// Destination for [`LogRecord`]s shaped by the [`Logger`](crate::logger::Logger).
///
/// The sink owns everything after shaping: it injects the `level` field,
/// runs its configured transforms and performs the actual output (console,
/// file, network, structured JSON). Calls are synchronous; a sink shared
/// between threads is responsible for its own locking.
pub trait LogSink: Send + Sync {
    /// Write a single record at the given severity.
    ///
    /// **Parameters**
    /// - `severity`: level selected by the logging call.
    /// - `record`: freshly built record, owned by the sink from here on.
    ///
    /// **Returns**
    /// - `Ok(())` if the record was accepted.
    /// - `Err(..)` if the backend failed. The logger hands this back to the
    ///   caller untouched.
    fn log(
        &self,
        severity: Severity,
        record: LogRecord,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Flush buffered output, if the backend buffers.
    ///
    /// Default implementation is a no-op.
    fn flush(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }
}

impl<T: LogSink + ?Sized> LogSink for Arc<T> {
    fn log(
        &self,
        severity: Severity,
        record: LogRecord,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        (**self).log(severity, record)
    }

    fn flush(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        (**self).flush()
    }
}

impl<T: LogSink + ?Sized> LogSink for &T {
    fn log(
        &self,
        severity: Severity,
        record: LogRecord,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        (**self).log(severity, record)
    }

    fn flush(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        (**self).flush()
    }
}
