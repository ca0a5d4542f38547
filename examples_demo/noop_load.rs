use std::time::Instant;

use shaped_log::{Logger, Message, Method, NoopSink, RequestResponse};

fn main() {
    let logger = Logger::new(NoopSink);

    let n: u64 = 100_000;
    let start = Instant::now();

    for i in 0..n {
        let health = RequestResponse::new("served", Method::Get, 200, "127.0.0.1", "/health", 2);

        logger
            .error(Message::new("load test error").field("iteration", i))
            .unwrap();
        logger.info(health.elapsed(0.3)).unwrap();
    }

    let elapsed = start.elapsed();
    println!(
        "shaped {} records in {:?} (~{:.0} rec/s)",
        2 * n,
        elapsed,
        (2 * n) as f64 / elapsed.as_secs_f64()
    );
}
