//! Countdown timer built on the stopwatch engine.
//!
//! The countdown owns no timestamps of its own: it registers itself as the
//! wrapped stopwatch's tick listener and derives the remaining time from
//! the stopwatch's elapsed time. When nothing remains it stops the
//! stopwatch and reports completion exactly once.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::engine::format::format_time;
use crate::engine::sink::{CountdownListener, DisplaySink};
use crate::engine::stopwatch::{SessionListener, Stopwatch};
use crate::engine::time_source::TimeSource;
use crate::error::{Operation, TimerError};
use crate::types::{CountdownConfig, CountdownSnapshot, Phase, StopwatchConfig, StopwatchSnapshot};

struct Settings {
    duration_ms: u64,
    listener: Option<Arc<dyn CountdownListener>>,
    display: Option<Arc<dyn DisplaySink>>,
    debug: bool,
}

/// The settings lock is never held while the stopwatch's lock is taken.
struct Shared {
    settings: Mutex<Settings>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Settings> {
        self.settings.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Bridges stopwatch ticks into countdown ticks.
struct CountdownTicker {
    shared: Arc<Shared>,
}

impl SessionListener for CountdownTicker {
    fn on_session_tick(&self, stopwatch: &Stopwatch, snapshot: &StopwatchSnapshot, session: u64) {
        let countdown = Countdown {
            engine: stopwatch.clone(),
            shared: self.shared.clone(),
        };
        countdown.handle_tick(snapshot, session);
    }
}

// ============================================================================
// Countdown
// ============================================================================

/// A countdown timer with start, stop, pause and resume.
///
/// Cloning yields another handle to the same countdown.
#[derive(Clone)]
pub struct Countdown {
    engine: Stopwatch,
    shared: Arc<Shared>,
}

impl Countdown {
    /// Creates a stopped countdown for `duration_ms` with the default tick
    /// interval. A zero duration must be replaced before `start`.
    pub fn new(duration_ms: u64) -> Self {
        Self::from_parts(Stopwatch::new(), duration_ms, false)
    }

    /// Creates a stopped countdown from a configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the tick interval is zero.
    pub fn with_config(config: CountdownConfig) -> Result<Self, TimerError> {
        config.validate()?;
        let engine = Stopwatch::with_config(StopwatchConfig {
            tick_interval_ms: config.stopwatch.tick_interval_ms,
            debug: false,
        })?;
        Ok(Self::from_parts(engine, config.duration_ms, config.stopwatch.debug))
    }

    fn from_parts(engine: Stopwatch, duration_ms: u64, debug: bool) -> Self {
        let shared = Arc::new(Shared {
            settings: Mutex::new(Settings {
                duration_ms,
                listener: None,
                display: None,
                debug,
            }),
        });
        engine.set_session_listener(Some(Arc::new(CountdownTicker {
            shared: shared.clone(),
        })));
        Self { engine, shared }
    }

    /// Replaces the clock the wrapped stopwatch samples.
    #[must_use]
    pub fn with_time_source(self, time_source: Arc<dyn TimeSource>) -> Self {
        Self {
            engine: self.engine.with_time_source(time_source),
            shared: self.shared,
        }
    }

    // ------------------------------------------------------------------------
    // Control
    // ------------------------------------------------------------------------

    /// Starts counting down from the full duration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the duration is zero, otherwise
    /// whatever the stopwatch's `start` returns.
    pub fn start(&self) -> Result<(), TimerError> {
        let duration_ms = self.shared.lock().duration_ms;
        if duration_ms == 0 {
            return Err(TimerError::Configuration("duration not set".to_string()));
        }
        self.engine.start()?;

        tracing::trace!(duration_ms, "countdown started");
        Ok(())
    }

    /// Stops the countdown without reporting completion.
    pub fn stop(&self) -> Result<(), TimerError> {
        self.engine.stop()
    }

    pub fn pause(&self) -> Result<(), TimerError> {
        self.engine.pause()
    }

    pub fn resume(&self) -> Result<(), TimerError> {
        self.engine.resume()
    }

    fn handle_tick(&self, snapshot: &StopwatchSnapshot, session: u64) {
        let (duration_ms, listener, display, debug) = {
            let settings = self.shared.lock();
            (
                settings.duration_ms,
                settings.listener.clone(),
                settings.display.clone(),
                settings.debug,
            )
        };
        let view = CountdownSnapshot::from_stopwatch(snapshot, duration_ms);

        if debug {
            tracing::debug!(
                "Elapsed : {}; Remaining : {}",
                view.elapsed_ms,
                view.remaining_ms
            );
        }

        // Checked before every callback: a control call may have ended the
        // session while the previous callback ran.
        let live = || self.engine.is_live(session);

        if !view.is_complete() {
            if let Some(listener) = listener.filter(|_| live()) {
                listener.on_tick(self, &view);
            }
            if let Some(display) = display.filter(|_| live()) {
                display.show(&format_time(view.remaining_ms));
            }
            return;
        }

        if let Some(display) = display.filter(|_| live()) {
            display.show(&format_time(0));
        }

        // Only the tick's own session may be stopped, and whoever wins the
        // stop owns the completion event.
        match self.engine.stop_if_live(session) {
            Ok(true) => {}
            Ok(false) => {
                tracing::trace!("session ended before completion");
                return;
            }
            Err(e) => {
                tracing::trace!(error = %e, "countdown stopped before completion");
                return;
            }
        }

        tracing::debug!(duration_ms, "countdown complete");
        if let Some(listener) = &listener {
            listener.on_complete(self, &self.snapshot());
        }
    }

    // ------------------------------------------------------------------------
    // Wiring
    // ------------------------------------------------------------------------

    /// Sets the countdown length.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` while a session is live.
    pub fn set_duration(&self, duration_ms: u64) -> Result<(), TimerError> {
        let phase = self.engine.phase();
        if phase.is_started() {
            return Err(TimerError::invalid(Operation::SetDuration, phase));
        }
        self.shared.lock().duration_ms = duration_ms;
        Ok(())
    }

    /// Binds or unbinds the display showing the remaining time.
    pub fn set_display(&self, display: Option<Arc<dyn DisplaySink>>) {
        self.shared.lock().display = display;
    }

    /// Binds or unbinds the tick and completion listener.
    pub fn set_listener(&self, listener: Option<Arc<dyn CountdownListener>>) {
        self.shared.lock().listener = listener;
    }

    /// Enables or disables per-tick debug logging.
    pub fn set_debug(&self, debug: bool) {
        self.shared.lock().debug = debug;
    }

    /// See [`Stopwatch::set_tick_interval`].
    pub fn set_tick_interval(&self, tick_interval_ms: u64) -> Result<(), TimerError> {
        self.engine.set_tick_interval(tick_interval_ms)
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn duration_ms(&self) -> u64 {
        self.shared.lock().duration_ms
    }

    /// Remaining milliseconds as of the last sample, clamped at zero.
    pub fn remaining_ms(&self) -> u64 {
        self.snapshot().remaining_ms
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.engine.elapsed_ms()
    }

    pub fn phase(&self) -> Phase {
        self.engine.phase()
    }

    pub fn is_started(&self) -> bool {
        self.engine.is_started()
    }

    pub fn is_paused(&self) -> bool {
        self.engine.is_paused()
    }

    pub fn is_debug(&self) -> bool {
        self.shared.lock().debug
    }

    pub fn start_timestamp_ms(&self) -> u64 {
        self.engine.start_timestamp_ms()
    }

    pub fn tick_interval_ms(&self) -> u64 {
        self.engine.tick_interval_ms()
    }

    pub fn snapshot(&self) -> CountdownSnapshot {
        CountdownSnapshot::from_stopwatch(&self.engine.snapshot(), self.duration_ms())
    }
}

impl fmt::Debug for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Countdown")
            .field("snapshot", &self.snapshot())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
