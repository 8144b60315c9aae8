//! `player` crate: paced replay of simulation logs and the "Test" session.
//!
//! The engine computes a whole log in one go; [`Player`] hands it to an
//! observer one event per tick so progress looks live. [`TestSession`] ties
//! validation, simulation and playback together and makes sure a new run
//! always cancels the one before it.

pub mod config;
pub mod error;
pub mod player;
pub mod session;

pub use config::PlayerConfig;
pub use error::PlayerError;
pub use player::{PlaybackHandle, PlaybackOutcome, Player};
pub use session::{SessionPhase, TestOutcome, TestSession};
