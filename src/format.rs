//! Output transforms applied by a sink before a record is written.
//!
//! A [`Format`] is an ordered pipeline: each [`Transform`] takes the record
//! by value and hands back the (possibly changed) record to the next one.

use crate::record::LogRecord;
use chrono::{DateTime, Local, TimeZone};
use colored::Colorize;
use serde_json::Value;
use std::fmt;

/// One step of a [`Format`] pipeline.
pub trait Transform: Send + Sync {
    fn transform(&self, record: LogRecord) -> LogRecord;
}

impl<F> Transform for F
where
    F: Fn(LogRecord) -> LogRecord + Send + Sync,
{
    fn transform(&self, record: LogRecord) -> LogRecord {
        self(record)
    }
}

/// Ordered pipeline of transforms.
#[derive(Default)]
pub struct Format {
    transforms: Vec<Box<dyn Transform>>,
}

impl Format {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a transform to the end of the pipeline.
    pub fn with<T: Transform + 'static>(mut self, transform: T) -> Self {
        self.transforms.push(Box::new(transform));
        self
    }

    /// Human-readable console pipeline: timestamp, upper-cased level and a
    /// single `"<time> <level> <message>"` line. With `color` the timestamp
    /// is magenta and the level is colored by severity.
    pub fn line(color: bool) -> Self {
        let timestamp = if color {
            Timestamp::colored(magenta)
        } else {
            Timestamp::new()
        };

        let format = Format::new().with(timestamp).with(CapitalizeLevel);
        let format = if color { format.with(ColorizeLevel) } else { format };
        format.with(LineFormat)
    }

    /// Structured pipeline: only adds `time`, so the record is written as is.
    pub fn json() -> Self {
        Format::new().with(Timestamp::new())
    }

    pub fn apply(&self, record: LogRecord) -> LogRecord {
        self.transforms
            .iter()
            .fold(record, |record, transform| transform.transform(record))
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

impl Transform for Format {
    fn transform(&self, record: LogRecord) -> LogRecord {
        self.apply(record)
    }
}

impl fmt::Debug for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Format")
            .field("transforms", &self.transforms.len())
            .finish()
    }
}

type Colorizer = Box<dyn Fn(&str) -> String + Send + Sync>;

/// Adds a `time` field with the current local time, e.g.
/// `2024-03-01T14:05:09.042+05:45`.
#[derive(Default)]
pub struct Timestamp {
    color: Option<Colorizer>,
}

impl Timestamp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pass the formatted timestamp through `color` before storing it.
    pub fn colored<F>(color: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Timestamp {
            color: Some(Box::new(color)),
        }
    }

    fn stamp<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> String
    where
        Tz::Offset: fmt::Display,
    {
        let formatted = format_timestamp(at);
        match &self.color {
            Some(color) => color(&formatted),
            None => formatted,
        }
    }
}

impl Transform for Timestamp {
    fn transform(&self, mut record: LogRecord) -> LogRecord {
        record.insert("time", self.stamp(&Local::now()));
        record
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timestamp")
            .field("colored", &self.color.is_some())
            .finish()
    }
}

/// Extended ISO-8601 with millisecond precision and a `±HH:MM` offset.
pub fn format_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    at.format("%Y-%m-%dT%H:%M:%S%.3f%:z").to_string()
}

/// Terminal magenta, the default timestamp color of [`Format::line`].
pub fn magenta(text: &str) -> String {
    text.magenta().to_string()
}

/// Upper-cases a textual `level` field; anything else is left alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct CapitalizeLevel;

impl Transform for CapitalizeLevel {
    fn transform(&self, mut record: LogRecord) -> LogRecord {
        if let Some(Value::String(level)) = record.get_mut("level") {
            *level = level.to_uppercase();
        }
        record
    }
}

/// Wraps a textual `level` field in an ANSI color picked by severity name.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorizeLevel;

impl ColorizeLevel {
    fn paint(level: &str) -> String {
        match level.to_ascii_lowercase().as_str() {
            "error" => level.red().to_string(),
            "warn" => level.yellow().to_string(),
            "info" => level.green().to_string(),
            "debug" => level.blue().to_string(),
            "trace" | "fatal" => level.magenta().to_string(),
            _ => level.to_string(),
        }
    }
}

impl Transform for ColorizeLevel {
    fn transform(&self, mut record: LogRecord) -> LogRecord {
        if let Some(Value::String(level)) = record.get_mut("level") {
            *level = Self::paint(level);
        }
        record
    }
}

/// Renders `"<time> <level> <message>"` into the record's output slot.
///
/// Only those three fields appear in the line. Missing ones render empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineFormat;

impl LineFormat {
    fn field_text(record: &LogRecord, key: &str) -> String {
        match record.get(key) {
            None => String::new(),
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
        }
    }
}

impl Transform for LineFormat {
    fn transform(&self, mut record: LogRecord) -> LogRecord {
        let line = format!(
            "{} {} {}",
            Self::field_text(&record, "time"),
            Self::field_text(&record, "level"),
            Self::field_text(&record, "message"),
        );
        record.set_rendered(line);
        record
    }
}
