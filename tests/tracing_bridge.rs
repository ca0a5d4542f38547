use std::sync::Arc;

use serde_json::json;
use shaped_log::{Logger, MemorySink, Message, RecordLayer, Severity};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

#[test]
fn tracing_events_and_logger_calls_share_one_sink() {
    let sink = Arc::new(MemorySink::new());
    let logger = Logger::new(Arc::clone(&sink));
    let subscriber = Registry::default().with(RecordLayer::new(Arc::clone(&sink)));

    tracing::subscriber::with_default(subscriber, || {
        tracing::info!(order_id = 7, "order placed");
        logger.info(Message::new("order placed").field("order_id", 7)).unwrap();
    });

    let records = sink.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].0, Severity::Info);
    assert_eq!(records[0].1, records[1].1);
    assert_eq!(records[0].1.get("order_id"), Some(&json!(7)));
}
