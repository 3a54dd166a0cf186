//! Diagnostic logging.
//!
//! The frame owns stdout, so log records go to stderr. Call [`init`] once from
//! the binary; library code only uses the `tracing` macros.

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Install the global fmt subscriber at `level`.
///
/// Returns `false` if a subscriber was already installed.
pub fn init(level: Level) -> bool {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).is_ok()
}
