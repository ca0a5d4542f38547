//! Consistent, flat log records on top of `tracing`.
//!
//! A [`Logger`] shapes each call (message, optional error, extra fields and
//! optional HTTP request metadata) into a single flat [`LogRecord`] and
//! hands it to a [`LogSink`]. Sinks run a [`Format`] pipeline of transforms
//! (timestamp, level capitalization, single-line rendering) before writing.

pub mod config;
pub mod error;
pub mod format;
pub mod init;
pub mod input;
pub mod layer;
pub mod logger;
pub mod memory_sink;
pub mod noop_sink;
pub mod record;
pub mod sink;
pub mod writer_sink;

pub use config::SinkConfig;
pub use error::{ConfigError, InitError, SinkError};
pub use format::{CapitalizeLevel, ColorizeLevel, Format, LineFormat, Timestamp, Transform};
pub use input::{ErrorValue, LogInput, Message, Method, RequestResponse};
pub use layer::RecordLayer;
pub use logger::{build_record, LogResult, Logger};
pub use memory_sink::MemorySink;
pub use noop_sink::NoopSink;
pub use record::{LogRecord, Severity};
pub use sink::LogSink;
pub use writer_sink::{OutputFormat, WriterSink};
