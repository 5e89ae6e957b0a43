//! Logging setup
//! Installs the global tracing subscriber used by every gameplay module.

use tracing::Level;

/// Initialize console logging.
///
/// Bevy's own `LogPlugin` is disabled in `main`, so this is the only
/// global subscriber. `STRAWBERRY_HOP_DEBUG=1` lowers the level to DEBUG.
pub fn init_logging() {
    let level = if std::env::var_os("STRAWBERRY_HOP_DEBUG").is_some() {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();
    tracing::info!("🍓 Logging initialised at {level}");
}
