use crate::input::ErrorValue;
use crate::record::{LogRecord, Severity};
use crate::sink::LogSink;
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// `tracing_subscriber` layer that turns `tracing` events into
/// [`LogRecord`]s and hands them to a [`LogSink`].
///
/// The event's `message` becomes the record's `message` and every other
/// field is flattened next to it, so `info!(user_id = 42, "signed in")`
/// produces the same shape as a [`Logger`](crate::logger::Logger) call with
/// an extra field. Records are written synchronously on the calling thread.
pub struct RecordLayer<S> {
    sink: S,
}

impl<S: LogSink> RecordLayer<S> {
    pub fn new(sink: S) -> Self {
        RecordLayer { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

impl<S, Sub> Layer<Sub> for RecordLayer<S>
where
    S: LogSink + 'static,
    Sub: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, Sub>) {
        let mut fields = Map::new();
        let mut message: Option<String> = None;

        let mut visitor = FieldVisitor {
            fields: &mut fields,
            message: &mut message,
        };
        event.record(&mut visitor);

        let mut record = LogRecord::new();
        record.insert("message", message.unwrap_or_default());
        for (key, value) in fields {
            record.insert(key, value);
        }

        let severity = Severity::from(*event.metadata().level());
        if let Err(e) = self.sink.log(severity, record) {
            eprintln!("log sink write failed: {}", e);
        }
    }
}

/// Collects event fields as JSON values, keeping `message` apart.
pub struct FieldVisitor<'a> {
    pub fields: &'a mut Map<String, Value>,
    pub message: &'a mut Option<String>,
}

impl FieldVisitor<'_> {
    fn put(&mut self, field: &Field, value: Value) {
        match (field.name(), value) {
            ("message", Value::String(text)) => *self.message = Some(text),
            (name, value) => {
                self.fields.insert(name.to_string(), value);
            }
        }
    }
}

impl Visit for FieldVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, value.into());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, value.into());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, value.into());
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.put(field, value.into());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, value.into());
    }

    fn record_error(&mut self, field: &Field, value: &(dyn Error + 'static)) {
        self.put(field, ErrorValue::from_error(value).render().into());
    }

    // The formatted message of `info!("...")` arrives here as `fmt::Arguments`.
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.put(field, format!("{:?}", value).into());
    }
}
