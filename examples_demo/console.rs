use shaped_log::init::stdout_logger;
use shaped_log::{Message, Method, RequestResponse, SinkConfig};

fn main() {
    let logger = stdout_logger(SinkConfig::default());

    logger.info(Message::new("comida")).unwrap();
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
    logger.debug("debug lines are written too").unwrap();
    logger.trace("trace lines are not").unwrap();
}
