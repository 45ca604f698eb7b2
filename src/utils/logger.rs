use std::env;
use std::sync::Once;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

static INIT: Once = Once::new();

/// Installs the global fmt subscriber once. The level comes from `LOGLEVEL`
/// (`DEBUG`, `INFO`, `WARN`, `ERROR`, `TRACE`) and defaults to `INFO`.
pub fn setup_logger() {
    INIT.call_once(|| {
        let log_level = env::var("LOGLEVEL")
            .unwrap_or_else(|_| "INFO".to_string())
            .to_uppercase();

        let level = match log_level.as_str() {
            "DEBUG" => Level::DEBUG,
            "ERROR" => Level::ERROR,
            "WARN" => Level::WARN,
            "TRACE" => Level::TRACE,
            _ => Level::INFO,
        };

        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(false)
            .finish();

        if tracing::subscriber::set_global_default(subscriber).is_ok() {
            debug!("Log level set to: {}", level);
        }
    });
}
