use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use shaped_log::{
    CapitalizeLevel, ErrorValue, Format, LineFormat, LogInput, Logger, MemorySink, Message, Method,
    OutputFormat, RequestResponse, Severity, Timestamp, WriterSink,
};

/// Writer handle that can be read back while the sink still owns a clone.
#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn json_logger_emits_flat_records() {
    let buf = SharedBuf::default();
    let logger = Logger::new(WriterSink::new(buf.clone(), Format::json(), OutputFormat::Json));

    logger
        .info(Message::new("comida").error("error").field("asd", 12))
        .unwrap();
    logger
        .info(
            RequestResponse::new("comida", Method::Get, 123, "12", "s/sd/d", 123)
                .error("error")
                .field("asd", 12),
        )
        .unwrap();

    let lines = buf.lines();
    assert_eq!(lines.len(), 2);

    let plain: Value = serde_json::from_str(&lines[0]).unwrap();
    assert_eq!(plain["message"], "comida");
    assert_eq!(plain["error"], "error");
    assert_eq!(plain["asd"], 12);
    assert_eq!(plain["level"], "info");
    assert!(plain.get("extra").is_none());

    let request: Value = serde_json::from_str(&lines[1]).unwrap();
    assert_eq!(request["http_method"], "GET");
    assert_eq!(request["http_status"], 123);
    assert_eq!(request["http_client_ip"], "12");
    assert_eq!(request["http_url"], "s/sd/d");
    assert_eq!(request["http_response_size"], 123);
    assert!(request.get("http_elapsed").is_none());
}

#[test]
fn line_logger_renders_time_level_message() {
    let buf = SharedBuf::default();
    let format = Format::new()
        .with(Timestamp::new())
        .with(CapitalizeLevel)
        .with(LineFormat);
    let logger = Logger::new(WriterSink::new(buf.clone(), format, OutputFormat::Line));

    logger.warn(Message::new("low disk").field("free_mb", 12)).unwrap();
    logger.trace("never written").unwrap();
    logger.fatal("never written either").unwrap();

    let lines = buf.lines();
    assert_eq!(lines.len(), 1);

    let mut parts = lines[0].splitn(3, ' ');
    let time = parts.next().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(time).is_ok(), "{}", time);
    assert_eq!(parts.next(), Some("WARN"));
    assert_eq!(parts.next(), Some("low disk"));
}

#[test]
fn loosely_typed_input_is_shaped_like_typed_input() {
    let sink = MemorySink::new();
    let logger = Logger::new(sink.clone());

    let loose = LogInput::from_value(json!({
        "message": "served",
        "type": "request",
        "method": "POST",
        "status": 201,
        "client_ip": "10.0.0.1",
        "path": "/items",
        "response_size": 512,
        "elapsed": 3.25
    }))
    .unwrap();
    let typed =
        RequestResponse::new("served", Method::Post, 201, "10.0.0.1", "/items", 512).elapsed(3.25);

    logger.error(loose).unwrap();
    logger.error(typed).unwrap();

    let records = sink.take();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0], records[1]);
    assert_eq!(records[0].0, Severity::Error);
    assert_eq!(records[0].1.get("http_elapsed"), Some(&json!(3.25)));
    assert!(sink.is_empty());
}

#[test]
fn rust_errors_keep_their_cause_chain() {
    let sink = MemorySink::new();
    let logger = Logger::new(&sink);

    let io_err = io::Error::new(io::ErrorKind::NotFound, "config.toml missing");
    logger
        .error(Message::new("startup failed").error(ErrorValue::from_error(&io_err)))
        .unwrap();

    let (_, record) = &sink.records()[0];
    assert_eq!(record.get("error"), Some(&json!("config.toml missing")));
}

#[test]
fn sink_errors_propagate_to_the_caller() {
    struct Closed;

    impl Write for Closed {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    let logger = Logger::new(WriterSink::new(Closed, Format::json(), OutputFormat::Json));
    let err = logger.info("lost").unwrap_err();
    assert!(err.to_string().contains("stdout closed"));

    // No-op levels never touch the sink, so they cannot fail.
    assert!(logger.trace("lost").is_ok());
    assert!(logger.fatal("lost").is_ok());
}
