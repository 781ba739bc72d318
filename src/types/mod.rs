//! Core data types for the stopwatch and countdown engines.
//!
//! This module defines:
//! - The session phase (`Stopped`, `Running`, `Paused`)
//! - `ClockState`, the pure elapsed-time state machine
//! - Split records and read-only snapshots
//! - Engine configuration with validation

use serde::{Deserialize, Serialize};

use crate::error::{Operation, TimerError};

/// Default delay between two ticks, in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 100;

// ============================================================================
// Phase
// ============================================================================

/// Represents the current phase of a stopwatch session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No session is live
    #[default]
    Stopped,
    /// Time is accruing and ticks are scheduled
    Running,
    /// The session is live but no time accrues
    Paused,
}

impl Phase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Stopped => "stopped",
            Phase::Running => "running",
            Phase::Paused => "paused",
        }
    }

    /// Returns true if a session is live (running or paused).
    pub fn is_started(&self) -> bool {
        !matches!(self, Phase::Stopped)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Split
// ============================================================================

/// An immutable split record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    /// Cumulative elapsed milliseconds when the split was taken
    #[serde(rename = "splitMs")]
    pub split_ms: u64,
    /// Milliseconds accrued since the previous split (or since start)
    #[serde(rename = "lapMs")]
    pub lap_ms: u64,
}

impl Split {
    /// Creates a split record.
    pub fn new(split_ms: u64, lap_ms: u64) -> Self {
        Self { split_ms, lap_ms }
    }
}

// ============================================================================
// ClockState
// ============================================================================

/// Elapsed-time accounting for one stopwatch.
///
/// Every transition takes the current time as an argument, so the state
/// machine itself never reads a clock. Transitions validate first and only
/// then mutate: a rejected call leaves the state untouched.
#[derive(Debug, Clone)]
pub struct ClockState {
    phase: Phase,
    start_ms: u64,
    last_sample_ms: u64,
    elapsed_ms: u64,
    lap_ms: u64,
    tick_interval_ms: u64,
    splits: Vec<Split>,
}

impl ClockState {
    /// Creates a stopped state with the given tick interval.
    pub fn new(tick_interval_ms: u64) -> Self {
        Self {
            phase: Phase::Stopped,
            start_ms: 0,
            last_sample_ms: 0,
            elapsed_ms: 0,
            lap_ms: 0,
            tick_interval_ms,
            splits: Vec::new(),
        }
    }

    /// Returns an error if `operation` is not valid in the current phase.
    pub fn check(&self, operation: Operation) -> Result<(), TimerError> {
        let allowed = match operation {
            Operation::Start | Operation::SetDuration => !self.phase.is_started(),
            Operation::Stop | Operation::Split => self.phase.is_started(),
            Operation::Pause => self.phase == Phase::Running,
            Operation::Resume => self.phase == Phase::Paused,
        };
        if allowed {
            Ok(())
        } else {
            Err(TimerError::invalid(operation, self.phase))
        }
    }

    /// Begins a fresh session, discarding the previous session's totals
    /// and splits.
    pub fn start(&mut self, now_ms: u64) -> Result<(), TimerError> {
        self.check(Operation::Start)?;
        self.phase = Phase::Running;
        self.start_ms = now_ms;
        self.last_sample_ms = now_ms;
        self.elapsed_ms = 0;
        self.lap_ms = 0;
        self.splits.clear();
        Ok(())
    }

    /// Ends the session. A running session is sampled one last time; a
    /// paused one already holds its final totals.
    pub fn stop(&mut self, now_ms: u64) -> Result<(), TimerError> {
        self.check(Operation::Stop)?;
        self.sample(now_ms);
        self.phase = Phase::Stopped;
        Ok(())
    }

    /// Freezes the totals at `now_ms`.
    pub fn pause(&mut self, now_ms: u64) -> Result<(), TimerError> {
        self.check(Operation::Pause)?;
        self.sample(now_ms);
        self.phase = Phase::Paused;
        Ok(())
    }

    /// Continues a paused session. The sampling anchor moves to `now_ms`
    /// so the paused interval never accrues.
    pub fn resume(&mut self, now_ms: u64) -> Result<(), TimerError> {
        self.check(Operation::Resume)?;
        self.last_sample_ms = now_ms;
        self.phase = Phase::Running;
        Ok(())
    }

    /// Records a split and starts a new lap.
    pub fn split(&mut self, now_ms: u64) -> Result<Split, TimerError> {
        self.check(Operation::Split)?;
        self.sample(now_ms);
        let split = Split::new(self.elapsed_ms, self.lap_ms);
        self.lap_ms = 0;
        self.splits.push(split);
        Ok(split)
    }

    /// Accrues the time since the last sample.
    ///
    /// Returns false without touching anything unless the session is
    /// running. A clock that steps backwards contributes zero.
    pub fn sample(&mut self, now_ms: u64) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        let delta = now_ms.saturating_sub(self.last_sample_ms);
        self.elapsed_ms += delta;
        self.lap_ms += delta;
        self.last_sample_ms = self.last_sample_ms.max(now_ms);
        true
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn is_paused(&self) -> bool {
        self.phase == Phase::Paused
    }

    pub fn start_ms(&self) -> u64 {
        self.start_ms
    }

    pub fn last_sample_ms(&self) -> u64 {
        self.last_sample_ms
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn lap_ms(&self) -> u64 {
        self.lap_ms
    }

    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms
    }

    /// Sets the tick interval used by the next scheduled session.
    pub fn set_tick_interval_ms(&mut self, tick_interval_ms: u64) -> Result<(), TimerError> {
        validate_tick_interval(tick_interval_ms)?;
        self.tick_interval_ms = tick_interval_ms;
        Ok(())
    }

    /// Splits in chronological order.
    pub fn splits(&self) -> &[Split] {
        &self.splits
    }

    /// Captures a read-only view of the current totals.
    pub fn snapshot(&self) -> StopwatchSnapshot {
        StopwatchSnapshot {
            phase: self.phase,
            start_ms: self.start_ms,
            elapsed_ms: self.elapsed_ms,
            lap_ms: self.lap_ms,
            split_count: self.splits.len(),
            tick_interval_ms: self.tick_interval_ms,
        }
    }
}

// ============================================================================
// Snapshots
// ============================================================================

/// Read-only view of a stopwatch, handed to listeners on every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopwatchSnapshot {
    pub phase: Phase,
    /// Timestamp at which the session started
    #[serde(rename = "startMs")]
    pub start_ms: u64,
    #[serde(rename = "elapsedMs")]
    pub elapsed_ms: u64,
    #[serde(rename = "lapMs")]
    pub lap_ms: u64,
    #[serde(rename = "splitCount")]
    pub split_count: usize,
    #[serde(rename = "tickIntervalMs")]
    pub tick_interval_ms: u64,
}

/// Read-only view of a countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownSnapshot {
    pub phase: Phase,
    #[serde(rename = "durationMs")]
    pub duration_ms: u64,
    #[serde(rename = "elapsedMs")]
    pub elapsed_ms: u64,
    /// Time left, clamped at zero
    #[serde(rename = "remainingMs")]
    pub remaining_ms: u64,
}

impl CountdownSnapshot {
    /// Derives the countdown view from the wrapped stopwatch.
    pub fn from_stopwatch(snapshot: &StopwatchSnapshot, duration_ms: u64) -> Self {
        Self {
            phase: snapshot.phase,
            duration_ms,
            elapsed_ms: snapshot.elapsed_ms,
            remaining_ms: duration_ms.saturating_sub(snapshot.elapsed_ms),
        }
    }

    /// Returns true once the full duration has elapsed.
    pub fn is_complete(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }
}

// ============================================================================
// Configuration
// ============================================================================

fn default_tick_interval_ms() -> u64 {
    DEFAULT_TICK_INTERVAL_MS
}

pub(crate) fn validate_tick_interval(tick_interval_ms: u64) -> Result<(), TimerError> {
    if tick_interval_ms == 0 {
        return Err(TimerError::Configuration(
            "tick interval must be a positive number of milliseconds".to_string(),
        ));
    }
    Ok(())
}

/// Configuration for a stopwatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopwatchConfig {
    /// Delay between ticks in milliseconds
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Emit a debug line on every tick and split
    #[serde(default)]
    pub debug: bool,
}

impl Default for StopwatchConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            debug: false,
        }
    }
}

impl StopwatchConfig {
    pub fn with_tick_interval_ms(mut self, tick_interval_ms: u64) -> Self {
        self.tick_interval_ms = tick_interval_ms;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), TimerError> {
        validate_tick_interval(self.tick_interval_ms)
    }
}

/// Configuration for a countdown.
///
/// A zero duration means "not set yet"; it is only rejected when the
/// countdown is started.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownConfig {
    /// Total countdown length in milliseconds
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(flatten)]
    pub stopwatch: StopwatchConfig,
}

impl CountdownConfig {
    /// Creates a configuration for the given duration.
    pub fn new(duration_ms: u64) -> Self {
        Self {
            duration_ms,
            stopwatch: StopwatchConfig::default(),
        }
    }

    pub fn with_tick_interval_ms(mut self, tick_interval_ms: u64) -> Self {
        self.stopwatch.tick_interval_ms = tick_interval_ms;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.stopwatch.debug = debug;
        self
    }

    /// Validates the parts of the configuration that must hold at
    /// construction time.
    pub fn validate(&self) -> Result<(), TimerError> {
        self.stopwatch.validate()
    }
}

// ============================================================================
// Tests
// ============================================================================
