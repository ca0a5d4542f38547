use serde_json::json;
use shaped_log::init::stdout_logger;
use shaped_log::{LogInput, Message, SinkConfig};

fn main() {
    let logger = stdout_logger(SinkConfig::json());

    logger.info(Message::new("comida")).unwrap();
    logger
        .info(Message::new("comida").error("error").field("asd", 12))
        .unwrap();

    // Loosely-typed input, e.g. forwarded from another service.
    let input = LogInput::from_value(json!({
        "message": "comida",
        "error": "error",
        "extra": {"asd": 12},
        "type": "request",
        "method": "GET",
        "client_ip": "12",
        "status": 123,
        "path": "s/sd/d",
        "response_size": 123
    }))
    .expect("valid log input");
    logger.info(input).unwrap();
}
