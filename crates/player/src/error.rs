//! Player error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlayerError {
    /// The playback task panicked or was aborted before reporting an outcome.
    #[error("playback task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
