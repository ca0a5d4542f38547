use crate::record::{LogRecord, Severity};
use crate::sink::LogSink;
use std::error::Error;
use std::sync::{Arc, Mutex, MutexGuard};

/// Sink that keeps every record it receives, in arrival order.
///
/// Records are stored exactly as shaped by the logger: no `level` or `time`
/// is injected. Clones share the same buffer.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<(Severity, LogRecord)>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything captured so far.
    pub fn records(&self) -> Vec<(Severity, LogRecord)> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Remove and return everything captured so far.
    pub fn take(&self) -> Vec<(Severity, LogRecord)> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(Severity, LogRecord)>> {
        // A panic while holding the lock cannot leave the Vec half-written.
        self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl LogSink for MemorySink {
    fn log(
        &self,
        severity: Severity,
        record: LogRecord,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.lock().push((severity, record));
        Ok(())
    }
}
