//! Collaborators notified from the tick path.
//!
//! - `DisplaySink`: receives a freshly formatted time string
//! - `TickListener`: notified on every stopwatch tick
//! - `CountdownListener`: notified on every countdown tick and on completion
//!
//! All callbacks run synchronously on the task that drives the ticks. The
//! engine never holds its own lock while calling out, so a listener may call
//! back into the engine (for example to stop it).

use std::sync::{Mutex, PoisonError};

use tokio::sync::mpsc;

use crate::engine::countdown::Countdown;
use crate::engine::stopwatch::Stopwatch;
use crate::types::{CountdownSnapshot, StopwatchSnapshot};

// ============================================================================
// Capabilities
// ============================================================================

/// Something that can show a formatted time.
pub trait DisplaySink: Send + Sync {
    fn show(&self, text: &str);
}

impl<F> DisplaySink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn show(&self, text: &str) {
        self(text)
    }
}

/// Listener for stopwatch ticks.
pub trait TickListener: Send + Sync {
    /// Called after every tick with the updated totals.
    fn on_tick(&self, stopwatch: &Stopwatch, snapshot: &StopwatchSnapshot);
}

impl<F> TickListener for F
where
    F: Fn(&Stopwatch, &StopwatchSnapshot) + Send + Sync,
{
    fn on_tick(&self, stopwatch: &Stopwatch, snapshot: &StopwatchSnapshot) {
        self(stopwatch, snapshot)
    }
}

/// Listener for countdown ticks and completion.
pub trait CountdownListener: Send + Sync {
    /// Called on every tick that leaves time on the clock.
    fn on_tick(&self, countdown: &Countdown, snapshot: &CountdownSnapshot);

    /// Called once when the full duration has elapsed. The countdown is
    /// already stopped when this runs.
    fn on_complete(&self, countdown: &Countdown, snapshot: &CountdownSnapshot);
}

// ============================================================================
// Events
// ============================================================================

/// Stopwatch events forwarded over a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopwatchEvent {
    /// One tick was processed
    Tick {
        elapsed_ms: u64,
        lap_ms: u64,
    },
}

/// Countdown events forwarded over a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEvent {
    /// One tick was processed and time remains
    Tick {
        remaining_ms: u64,
    },
    /// The full duration elapsed
    Completed,
}

/// Forwards engine callbacks as events into an unbounded channel.
///
/// A dropped receiver is not an error: the events are simply discarded.
#[derive(Debug, Clone)]
pub struct EventForwarder<E> {
    tx: mpsc::UnboundedSender<E>,
}

impl<E> EventForwarder<E> {
    pub fn new(tx: mpsc::UnboundedSender<E>) -> Self {
        Self { tx }
    }

    /// Creates a forwarder together with its receiving end.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<E>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    fn forward(&self, event: E) {
        if self.tx.send(event).is_err() {
            tracing::trace!("event receiver dropped");
        }
    }
}

impl TickListener for EventForwarder<StopwatchEvent> {
    fn on_tick(&self, _stopwatch: &Stopwatch, snapshot: &StopwatchSnapshot) {
        self.forward(StopwatchEvent::Tick {
            elapsed_ms: snapshot.elapsed_ms,
            lap_ms: snapshot.lap_ms,
        });
    }
}

impl CountdownListener for EventForwarder<CountdownEvent> {
    fn on_tick(&self, _countdown: &Countdown, snapshot: &CountdownSnapshot) {
        self.forward(CountdownEvent::Tick {
            remaining_ms: snapshot.remaining_ms,
        });
    }

    fn on_complete(&self, _countdown: &Countdown, _snapshot: &CountdownSnapshot) {
        self.forward(CountdownEvent::Completed);
    }
}

// ============================================================================
// Mocks
// ============================================================================

/// Display sink that records everything it is asked to show.
#[derive(Debug, Default)]
pub struct MockDisplaySink {
    lines: Mutex<Vec<String>>,
}

impl MockDisplaySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    #[must_use]
    pub fn last(&self) -> Option<String> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).last().cloned()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn clear(&self) {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl DisplaySink for MockDisplaySink {
    fn show(&self, text: &str) {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).push(text.to_string());
    }
}

/// Tick listener that records every snapshot it receives.
#[derive(Debug, Default)]
pub struct MockTickListener {
    ticks: Mutex<Vec<StopwatchSnapshot>>,
}

impl MockTickListener {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn ticks(&self) -> Vec<StopwatchSnapshot> {
        self.ticks.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    #[must_use]
    pub fn tick_count(&self) -> usize {
        self.ticks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl TickListener for MockTickListener {
    fn on_tick(&self, _stopwatch: &Stopwatch, snapshot: &StopwatchSnapshot) {
        self.ticks.lock().unwrap_or_else(PoisonError::into_inner).push(*snapshot);
    }
}

/// Countdown listener that records ticks and completions.
#[derive(Debug, Default)]
pub struct MockCountdownListener {
    ticks: Mutex<Vec<CountdownSnapshot>>,
    completions: Mutex<Vec<CountdownSnapshot>>,
}

impl MockCountdownListener {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn ticks(&self) -> Vec<CountdownSnapshot> {
        self.ticks.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    #[must_use]
    pub fn completions(&self) -> Vec<CountdownSnapshot> {
        self.completions.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    #[must_use]
    pub fn completion_count(&self) -> usize {
        self.completions.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl CountdownListener for MockCountdownListener {
    fn on_tick(&self, _countdown: &Countdown, snapshot: &CountdownSnapshot) {
        self.ticks.lock().unwrap_or_else(PoisonError::into_inner).push(*snapshot);
    }

    fn on_complete(&self, _countdown: &Countdown, snapshot: &CountdownSnapshot) {
        self.completions.lock().unwrap_or_else(PoisonError::into_inner).push(*snapshot);
    }
}
