//! Paced delivery of a finished [`SimulationLog`].
//!
//! Each tick of the configured interval delivers the next event. The tick
//! after the last event flips the running flag to `false` and fires the
//! completion callback, once. An empty log therefore completes on the first
//! tick with nothing delivered.

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, info};

use engine::{SimulationEvent, SimulationLog};

use crate::{PlayerConfig, PlayerError};

/// How a playback ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackOutcome {
    /// Every event was delivered and the completion callback ran.
    Completed { delivered: usize },
    /// Stopped early; the completion callback did not run.
    Cancelled { delivered: usize },
}

impl PlaybackOutcome {
    pub fn delivered(&self) -> usize {
        match self {
            Self::Completed { delivered } | Self::Cancelled { delivered } => *delivered,
        }
    }
}

/// Handle to one in-flight playback.
///
/// Dropping the handle cancels the playback, so an observer that goes away
/// never leaves a timer behind.
pub struct PlaybackHandle {
    cancel: CancellationToken,
    running: watch::Receiver<bool>,
    task: JoinHandle<PlaybackOutcome>,
    _guard: DropGuard,
}

impl PlaybackHandle {
    /// Stop delivering. No further events and no completion signal follow.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// `true` until the playback completes or is cancelled.
    pub fn is_running(&self) -> bool {
        *self.running.borrow()
    }

    /// Subscribe to changes of the running flag.
    pub fn running(&self) -> watch::Receiver<bool> {
        self.running.clone()
    }

    /// Wait for the playback to end.
    pub async fn finished(self) -> Result<PlaybackOutcome, PlayerError> {
        let Self { task, _guard: guard, .. } = self;
        let outcome = task.await?;
        drop(guard);
        Ok(outcome)
    }
}

/// Replays logs to observers at a fixed cadence.
#[derive(Debug, Clone, Default)]
pub struct Player {
    config: PlayerConfig,
}

impl Player {
    pub fn new(config: PlayerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Start delivering `log` to `on_event`, one event per interval, then
    /// call `on_complete`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn playback<F, C>(&self, log: SimulationLog, mut on_event: F, on_complete: C) -> PlaybackHandle
    where
        F: FnMut(SimulationEvent) + Send + 'static,
        C: FnOnce() + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let (running_tx, running_rx) = watch::channel(true);
        let interval = self.config.interval;
        let total = log.len();

        info!(events = total, interval_ms = interval.as_millis() as u64, "playback started");

        let token = cancel.clone();
        let task = tokio::spawn(async move {
            let mut delivered = 0usize;
            let mut events = log.into_iter();

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        running_tx.send_replace(false);
                        debug!(delivered, total, "playback cancelled");
                        return PlaybackOutcome::Cancelled { delivered };
                    }
                    _ = tokio::time::sleep(interval) => {}
                }

                if token.is_cancelled() {
                    running_tx.send_replace(false);
                    return PlaybackOutcome::Cancelled { delivered };
                }

                match events.next() {
                    Some(event) => {
                        on_event(event);
                        delivered += 1;
                    }
                    None => {
                        running_tx.send_replace(false);
                        on_complete();
                        info!(delivered, "playback completed");
                        return PlaybackOutcome::Completed { delivered };
                    }
                }
            }
        });

        PlaybackHandle {
            _guard: cancel.clone().drop_guard(),
            cancel,
            running: running_rx,
            task,
        }
    }
}

// ============================================================
// Unit tests
// ============================================================
#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use engine::{simulate, Edge, Graph, Node, NodeKind};

    use super::*;

    fn four_event_log() -> SimulationLog {
        let graph = Graph::new(
            vec![
                Node::new("n1", NodeKind::Start, "Begin"),
                Node::new("n2", NodeKind::End, "Done"),
            ],
            vec![Edge::new("e1", "n1", "n2")],
        );
        simulate(&graph).log
    }

    struct Recorder {
        seen: Arc<Mutex<Vec<String>>>,
        completions: Arc<AtomicUsize>,
    }

    impl Recorder {
        fn new() -> Self {
            Self {
                seen: Arc::new(Mutex::new(Vec::new())),
                completions: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn start(&self, player: &Player, log: SimulationLog) -> PlaybackHandle {
            let seen = Arc::clone(&self.seen);
            let completions = Arc::clone(&self.completions);
            player.playback(
                log,
                move |event| seen.lock().unwrap().push(event.message),
                move || {
                    completions.fetch_add(1, Ordering::SeqCst);
                },
            )
        }

        fn seen(&self) -> Vec<String> {
            self.seen.lock().unwrap().clone()
        }

        fn completions(&self) -> usize {
            self.completions.load(Ordering::SeqCst)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn delivers_every_event_in_order_then_completes_once() {
        let recorder = Recorder::new();
        let handle = recorder.start(&Player::default(), four_event_log());
        assert!(handle.is_running());

        let outcome = handle.finished().await.unwrap();

        assert_eq!(outcome, PlaybackOutcome::Completed { delivered: 4 });
        assert_eq!(
            recorder.seen(),
            vec![
                "Executing start node: Begin",
                "✓ Completed Begin",
                "Executing end node: Done",
                "✓ Completed Done",
            ]
        );
        assert_eq!(recorder.completions(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn events_arrive_one_interval_apart() {
        let recorder = Recorder::new();
        let _handle = recorder.start(&Player::default(), four_event_log());

        tokio::time::sleep(Duration::from_millis(599)).await;
        assert!(recorder.seen().is_empty());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(recorder.seen().len(), 1);

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(recorder.seen().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_log_completes_without_deliveries() {
        let recorder = Recorder::new();
        let handle = recorder.start(&Player::default(), SimulationLog::default());

        let outcome = handle.finished().await.unwrap();

        assert_eq!(outcome, PlaybackOutcome::Completed { delivered: 0 });
        assert!(recorder.seen().is_empty());
        assert_eq!(recorder.completions(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_midway_stops_delivery_and_completion() {
        let recorder = Recorder::new();
        let handle = recorder.start(&Player::default(), four_event_log());
        let mut running = handle.running();

        // Ticks land at 600ms and 1200ms.
        tokio::time::sleep(Duration::from_millis(1300)).await;
        assert_eq!(recorder.seen().len(), 2);

        handle.cancel();
        running.changed().await.unwrap();
        assert!(!*running.borrow());

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(recorder.seen().len(), 2);
        assert_eq!(recorder.completions(), 0);

        let outcome = handle.finished().await.unwrap();
        assert_eq!(outcome, PlaybackOutcome::Cancelled { delivered: 2 });
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_cancels_playback() {
        let recorder = Recorder::new();
        let handle = recorder.start(&Player::default(), four_event_log());

        tokio::time::sleep(Duration::from_millis(700)).await;
        drop(handle);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(recorder.seen().len(), 1);
        assert_eq!(recorder.completions(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn custom_interval_is_respected() {
        let recorder = Recorder::new();
        let player = Player::new(PlayerConfig::with_interval_millis(100));
        let started = tokio::time::Instant::now();

        let outcome = recorder
            .start(&player, four_event_log())
            .finished()
            .await
            .unwrap();

        assert_eq!(outcome.delivered(), 4);
        // Four deliveries plus the completion tick.
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(500));
        assert!(elapsed < Duration::from_millis(600));
    }
}
