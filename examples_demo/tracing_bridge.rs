use shaped_log::init::init_from_env;
use shaped_log::Message;
use tracing::{error, info};

/// Run with `SHAPED_LOG_FORMAT=json` to get structured output.
fn main() {
    let logger = init_from_env().expect("install log subscriber");

    info!("starting service");
    error!(user_id = 42, reason = "invalid password", "authentication failed");

    logger
        .warn(Message::new("authentication failed").field("user_id", 42))
        .unwrap();
}
