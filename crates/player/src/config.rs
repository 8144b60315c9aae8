//! Playback configuration.

use std::time::Duration;

/// Default gap between two delivered events.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(600);

/// Tuning knobs for the player.
#[derive(Debug, Clone)]
pub struct PlayerConfig {
    /// Delay before each delivery, and before the completion signal.
    pub interval: Duration,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
        }
    }
}

impl PlayerConfig {
    pub fn with_interval_millis(millis: u64) -> Self {
        Self {
            interval: Duration::from_millis(millis),
        }
    }
}
