use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global tracing subscriber and routes `log` records (actix, database crate)
/// into it
pub fn init_tracing_subscriber(level: Level) {
    if let Err(e) = tracing_log::LogTracer::init() {
        eprintln!("Unable to forward log records to tracing: {}", e);
    }

    let tracing_subscriber_level = tracing_subscriber::filter::LevelFilter::from_level(level);

    tracing_subscriber::registry()
        .with(tracing_subscriber_level)
        .with(fmt::layer())
        .init();
}
