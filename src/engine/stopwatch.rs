//! Stopwatch engine.
//!
//! This module provides the clock engine:
//! - State transitions (Stopped → Running ⇄ Paused → Stopped)
//! - A periodic tick task driven by `tokio::time::interval`
//! - Split recording
//! - Listener and display notification on every tick
//!
//! All control operations and ticks take the same mutex, so a tick can
//! never interleave with a transition. Callbacks run after the lock is
//! released; each one is looked up again under the lock first, so once
//! `pause`, `stop` or `start` has returned no further callback of the old
//! session begins.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::engine::format::format_time;
use crate::engine::sink::{DisplaySink, TickListener};
use crate::engine::time_source::{SystemTimeSource, TimeSource};
use crate::error::{Operation, TimerError};
use crate::types::{ClockState, Phase, Split, StopwatchConfig, StopwatchSnapshot};

// ============================================================================
// Inner
// ============================================================================

/// Tick hook for adapters built on the stopwatch. Unlike `TickListener` it
/// learns which session the tick belongs to.
pub(crate) trait SessionListener: Send + Sync {
    fn on_session_tick(&self, stopwatch: &Stopwatch, snapshot: &StopwatchSnapshot, session: u64);
}

struct Inner {
    state: ClockState,
    time_source: Arc<dyn TimeSource>,
    session_listener: Option<Arc<dyn SessionListener>>,
    listener: Option<Arc<dyn TickListener>>,
    display: Option<Arc<dyn DisplaySink>>,
    debug: bool,
    /// Bumped whenever ticking is (re)scheduled or cancelled; a tick task
    /// only acts while its session is current.
    session: u64,
    ticker: Option<JoinHandle<()>>,
}

impl Inner {
    fn now_ms(&self) -> u64 {
        self.time_source.now_ms()
    }

    /// True while `session` is current and running.
    fn is_live(&self, session: u64) -> bool {
        self.session == session && self.state.is_running()
    }

    fn stop(&mut self) -> Result<(), TimerError> {
        let now = self.now_ms();
        self.state.stop(now)?;
        self.cancel_ticker();

        tracing::trace!(elapsed_ms = self.state.elapsed_ms(), "stopwatch stopped");
        Ok(())
    }

    fn schedule(&mut self, runtime: &Handle, weak: Weak<Mutex<Inner>>) {
        self.cancel_ticker();
        let period = Duration::from_millis(self.state.tick_interval_ms());
        self.ticker = Some(runtime.spawn(run_ticker(weak, self.session, period)));
    }

    fn cancel_ticker(&mut self) {
        self.session = self.session.wrapping_add(1);
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

/// Drives one session's ticks until the session ends or the stopwatch is
/// dropped. The first tick fires immediately.
async fn run_ticker(inner: Weak<Mutex<Inner>>, session: u64, period: Duration) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        let Some(inner) = inner.upgrade() else {
            return;
        };
        let stopwatch = Stopwatch { inner };
        if !stopwatch.tick(session) {
            return;
        }
    }
}

fn scheduler() -> Result<Handle, TimerError> {
    Handle::try_current().map_err(|e| TimerError::SchedulerUnavailable(e.to_string()))
}

// ============================================================================
// Stopwatch
// ============================================================================

/// A stopwatch with start, stop, pause, resume and split.
///
/// Cloning yields another handle to the same stopwatch. `start` and
/// `resume` spawn the tick task on the current tokio runtime, so they must
/// be called from within one.
#[derive(Clone)]
pub struct Stopwatch {
    inner: Arc<Mutex<Inner>>,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    /// Creates a stopped stopwatch with the default configuration.
    pub fn new() -> Self {
        Self::from_parts(StopwatchConfig::default())
    }

    /// Creates a stopped stopwatch from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the tick interval is zero.
    pub fn with_config(config: StopwatchConfig) -> Result<Self, TimerError> {
        config.validate()?;
        Ok(Self::from_parts(config))
    }

    fn from_parts(config: StopwatchConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                state: ClockState::new(config.tick_interval_ms),
                time_source: Arc::new(SystemTimeSource),
                session_listener: None,
                listener: None,
                display: None,
                debug: config.debug,
                session: 0,
                ticker: None,
            })),
        }
    }

    /// Replaces the clock this stopwatch samples.
    #[must_use]
    pub fn with_time_source(self, time_source: Arc<dyn TimeSource>) -> Self {
        self.lock().time_source = time_source;
        self
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ------------------------------------------------------------------------
    // Control
    // ------------------------------------------------------------------------

    /// Starts a fresh session.
    ///
    /// Elapsed time, lap time and splits from any previous session are
    /// discarded.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if a session is already live, or
    /// `SchedulerUnavailable` outside a tokio runtime.
    pub fn start(&self) -> Result<(), TimerError> {
        let mut inner = self.lock();
        inner.state.check(Operation::Start)?;
        let runtime = scheduler()?;

        let now = inner.now_ms();
        inner.state.start(now)?;
        inner.schedule(&runtime, Arc::downgrade(&self.inner));

        tracing::trace!(start_ms = now, "stopwatch started");
        Ok(())
    }

    /// Stops the session after one final sample.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if the stopwatch is already stopped.
    pub fn stop(&self) -> Result<(), TimerError> {
        self.lock().stop()
    }

    /// Stops the session only if `session` is still the current one.
    ///
    /// Returns `Ok(false)` when the session has already been paused,
    /// stopped or replaced.
    pub(crate) fn stop_if_live(&self, session: u64) -> Result<bool, TimerError> {
        let mut inner = self.lock();
        if inner.session != session {
            return Ok(false);
        }
        inner.stop()?;
        Ok(true)
    }

    /// True while `session` is current and running.
    pub(crate) fn is_live(&self, session: u64) -> bool {
        self.lock().is_live(session)
    }

    /// Pauses a running session.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if the stopwatch is stopped or already paused.
    pub fn pause(&self) -> Result<(), TimerError> {
        let mut inner = self.lock();
        let now = inner.now_ms();
        inner.state.pause(now)?;
        inner.cancel_ticker();

        tracing::trace!(elapsed_ms = inner.state.elapsed_ms(), "stopwatch paused");
        Ok(())
    }

    /// Resumes a paused session. Time spent paused is not counted.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if the stopwatch is not paused, or
    /// `SchedulerUnavailable` outside a tokio runtime.
    pub fn resume(&self) -> Result<(), TimerError> {
        let mut inner = self.lock();
        inner.state.check(Operation::Resume)?;
        let runtime = scheduler()?;

        let now = inner.now_ms();
        inner.state.resume(now)?;
        inner.schedule(&runtime, Arc::downgrade(&self.inner));

        tracing::trace!(elapsed_ms = inner.state.elapsed_ms(), "stopwatch resumed");
        Ok(())
    }

    /// Records a split. Allowed while running or paused.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if the stopwatch is stopped.
    pub fn split(&self) -> Result<Split, TimerError> {
        let mut inner = self.lock();
        let now = inner.now_ms();
        let split = inner.state.split(now)?;

        if inner.debug {
            tracing::debug!(split_ms = split.split_ms, lap_ms = split.lap_ms, "split");
        }
        Ok(split)
    }

    /// Processes one tick for `session`.
    ///
    /// Returns false when the session is over and no further tick should
    /// be scheduled.
    pub(crate) fn tick(&self, session: u64) -> bool {
        let (snapshot, session_listener, debug) = {
            let mut inner = self.lock();
            if !inner.is_live(session) {
                return false;
            }
            let now = inner.now_ms();
            inner.state.sample(now);
            (
                inner.state.snapshot(),
                inner.session_listener.clone(),
                inner.debug,
            )
        };

        if debug {
            tracing::debug!(
                "{} seconds, {} milliseconds",
                snapshot.elapsed_ms / 1000,
                snapshot.elapsed_ms % 1000
            );
        }

        if let Some(hook) = session_listener {
            hook.on_session_tick(self, &snapshot, session);
        }

        if let Some(listener) = self.live_callback(session, |inner| inner.listener.clone()) {
            listener.on_tick(self, &snapshot);
        }

        if let Some(display) = self.live_callback(session, |inner| inner.display.clone()) {
            display.show(&format_time(snapshot.elapsed_ms));
        }

        true
    }

    /// Picks a callback to deliver, unless `session` has ended meanwhile.
    fn live_callback<T>(&self, session: u64, pick: impl FnOnce(&Inner) -> Option<T>) -> Option<T> {
        let inner = self.lock();
        if inner.is_live(session) {
            pick(&inner)
        } else {
            None
        }
    }

    /// Runs one tick for the current session, as the tick task would.
    #[cfg(test)]
    pub(crate) fn tick_now(&self) -> bool {
        let session = self.lock().session;
        self.tick(session)
    }

    #[cfg(test)]
    pub(crate) fn current_session(&self) -> u64 {
        self.lock().session
    }

    // ------------------------------------------------------------------------
    // Wiring
    // ------------------------------------------------------------------------

    /// Binds or unbinds the display updated on every tick.
    pub fn set_display(&self, display: Option<Arc<dyn DisplaySink>>) {
        self.lock().display = display;
    }

    /// Binds or unbinds the tick listener.
    pub fn set_listener(&self, listener: Option<Arc<dyn TickListener>>) {
        self.lock().listener = listener;
    }

    pub(crate) fn set_session_listener(&self, hook: Option<Arc<dyn SessionListener>>) {
        self.lock().session_listener = hook;
    }

    /// Enables or disables per-tick and per-split debug logging.
    pub fn set_debug(&self, debug: bool) {
        self.lock().debug = debug;
    }

    /// Sets the tick interval. A running session keeps its cadence until
    /// it is paused and resumed or restarted.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `tick_interval_ms` is zero.
    pub fn set_tick_interval(&self, tick_interval_ms: u64) -> Result<(), TimerError> {
        self.lock().state.set_tick_interval_ms(tick_interval_ms)
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn phase(&self) -> Phase {
        self.lock().state.phase()
    }

    /// Returns true while a session is live (running or paused).
    pub fn is_started(&self) -> bool {
        self.phase().is_started()
    }

    pub fn is_paused(&self) -> bool {
        self.phase() == Phase::Paused
    }

    pub fn is_debug(&self) -> bool {
        self.lock().debug
    }

    /// Elapsed milliseconds as of the last sample.
    pub fn elapsed_ms(&self) -> u64 {
        self.lock().state.elapsed_ms()
    }

    /// Lap milliseconds as of the last sample.
    pub fn lap_ms(&self) -> u64 {
        self.lock().state.lap_ms()
    }

    /// Timestamp, in the time source's scale, at which the session started.
    pub fn start_timestamp_ms(&self) -> u64 {
        self.lock().state.start_ms()
    }

    pub fn tick_interval_ms(&self) -> u64 {
        self.lock().state.tick_interval_ms()
    }

    /// Splits of the current (or last) session in chronological order.
    pub fn splits(&self) -> Vec<Split> {
        self.lock().state.splits().to_vec()
    }

    pub fn snapshot(&self) -> StopwatchSnapshot {
        self.lock().state.snapshot()
    }
}

impl fmt::Debug for Stopwatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stopwatch")
            .field("snapshot", &self.snapshot())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
