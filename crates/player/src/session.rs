//! The "Test" action: validate, simulate, then stream the log.
//!
//! ```text
//! Idle → Loading → Blocked                         (report non-empty)
//!                → Computing → Streaming → Done
//! ```
//!
//! Every call to [`TestSession::run_test`] starts over at `Loading`,
//! cancelling whatever playback the previous run left behind, so two runs
//! never interleave deliveries to the same observer.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, instrument, warn};

use engine::{simulate, validate, Graph, SimulationEvent, SimulationResult, ValidationReport};

use crate::{PlaybackHandle, PlaybackOutcome, Player, PlayerError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Loading,
    /// Validation found problems; nothing was simulated.
    Blocked,
    Computing,
    Streaming,
    Done,
}

/// What [`TestSession::run_test`] produced.
#[derive(Debug, Clone)]
pub enum TestOutcome {
    /// The graph failed validation. Show the report, stream nothing.
    Blocked(ValidationReport),
    /// The full result; its log is now being streamed to the observer.
    /// Run-level `errors` should be shown next to the streamed entries.
    Streaming(SimulationResult),
}

/// Owns at most one playback at a time.
pub struct TestSession {
    player: Player,
    phase: Arc<watch::Sender<SessionPhase>>,
    current: Option<PlaybackHandle>,
}

impl TestSession {
    pub fn new(player: Player) -> Self {
        let (phase, _) = watch::channel(SessionPhase::Idle);
        Self {
            player,
            phase: Arc::new(phase),
            current: None,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        *self.phase.borrow()
    }

    /// Follow phase transitions as they happen.
    pub fn subscribe(&self) -> watch::Receiver<SessionPhase> {
        self.phase.subscribe()
    }

    /// `true` while events are still being delivered.
    pub fn is_streaming(&self) -> bool {
        self.current.as_ref().is_some_and(PlaybackHandle::is_running)
    }

    /// Run one test against `graph`, streaming events to `on_event`.
    ///
    /// Must be called from within a Tokio runtime.
    #[instrument(skip_all, fields(nodes = graph.node_count(), edges = graph.edge_count()))]
    pub fn run_test<F>(&mut self, graph: &Graph, on_event: F) -> TestOutcome
    where
        F: FnMut(SimulationEvent) + Send + 'static,
    {
        self.stop_playback();
        self.set_phase(SessionPhase::Loading);

        let report = validate(graph);
        if !report.is_clean() {
            warn!(problems = ?report.messages(), "test blocked by validation");
            self.set_phase(SessionPhase::Blocked);
            return TestOutcome::Blocked(report);
        }

        self.set_phase(SessionPhase::Computing);
        let result = simulate(graph);
        if !result.success {
            warn!(errors = ?result.errors, "simulation reported run errors");
        }

        self.set_phase(SessionPhase::Streaming);
        let phase = Arc::clone(&self.phase);
        self.current = Some(self.player.playback(result.log.clone(), on_event, move || {
            phase.send_replace(SessionPhase::Done);
        }));

        info!(run_id = %result.run_id, events = result.log.len(), "streaming simulation log");
        TestOutcome::Streaming(result)
    }

    /// Wait for the current playback, if any, to finish.
    pub async fn wait(&mut self) -> Result<Option<PlaybackOutcome>, PlayerError> {
        match self.current.take() {
            Some(handle) => Ok(Some(handle.finished().await?)),
            None => Ok(None),
        }
    }

    /// The results view went away: stop streaming and go back to `Idle`.
    pub fn close(&mut self) {
        self.stop_playback();
        self.set_phase(SessionPhase::Idle);
    }

    fn stop_playback(&mut self) {
        if let Some(handle) = self.current.take() {
            if handle.is_running() {
                info!("cancelling previous playback");
            }
            handle.cancel();
        }
    }

    fn set_phase(&self, phase: SessionPhase) {
        self.phase.send_replace(phase);
    }
}
