use crate::error::SinkError;
use crate::format::Format;
use crate::record::{LogRecord, Severity};
use crate::sink::LogSink;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::io::{self, Stderr, Stdout, Write};
use std::str::FromStr;
use std::sync::Mutex;

/// What a [`WriterSink`] writes for each record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// The rendered line, when the pipeline produced one.
    #[default]
    Line,
    /// The structured fields as one JSON object.
    Json,
}

impl FromStr for OutputFormat {
    type Err = crate::error::ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "line" | "text" => Ok(OutputFormat::Line),
            "json" => Ok(OutputFormat::Json),
            _ => Err(crate::error::ConfigError::UnknownFormat(s.to_string())),
        }
    }
}

/// Sink writing one record per line to any [`Write`] target.
///
/// Each record gets a `level` field with the lowercase severity name, then
/// runs through the configured [`Format`] before being written.
pub struct WriterSink<W> {
    writer: Mutex<W>,
    format: Format,
    output: OutputFormat,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W, format: Format, output: OutputFormat) -> Self {
        WriterSink {
            writer: Mutex::new(writer),
            format,
            output,
        }
    }

    pub fn output(&self) -> OutputFormat {
        self.output
    }

    /// Consume the sink and hand back the underlying writer.
    pub fn into_inner(self) -> Result<W, SinkError> {
        self.writer.into_inner().map_err(|_| SinkError::Poisoned)
    }

    fn write_record(&self, severity: Severity, mut record: LogRecord) -> Result<(), SinkError> {
        record.insert("level", severity.as_str());
        let record = self.format.apply(record);

        let line = match (self.output, record.rendered()) {
            (OutputFormat::Line, Some(rendered)) => rendered.to_string(),
            _ => record.to_json()?,
        };

        let mut writer = self.writer.lock().map_err(|_| SinkError::Poisoned)?;
        writeln!(writer, "{}", line)?;
        Ok(())
    }
}

impl WriterSink<Stdout> {
    pub fn stdout(format: Format, output: OutputFormat) -> Self {
        WriterSink::new(io::stdout(), format, output)
    }
}

impl WriterSink<Stderr> {
    pub fn stderr(format: Format, output: OutputFormat) -> Self {
        WriterSink::new(io::stderr(), format, output)
    }
}

impl<W: Write + Send> LogSink for WriterSink<W> {
    fn log(
        &self,
        severity: Severity,
        record: LogRecord,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.write_record(severity, record)?;
        Ok(())
    }

    fn flush(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut writer = self.writer.lock().map_err(|_| SinkError::Poisoned)?;
        writer.flush().map_err(SinkError::from)?;
        Ok(())
    }
}
