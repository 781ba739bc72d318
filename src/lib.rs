//! TimeIt Library
//!
//! Stopwatch and countdown timer primitives with a periodic tick callback.
//! It includes:
//! - A stopwatch engine with start, stop, pause, resume and split
//! - A countdown adapter that stops itself and reports completion
//! - Display and listener capabilities invoked on every tick
//! - Injectable time sources for deterministic tests
//! - A small CLI front end used by the `timeit` demo binary
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use timeit::{Stopwatch, StopwatchConfig};
//!
//! # async fn demo() -> Result<(), timeit::TimerError> {
//! let stopwatch = Stopwatch::with_config(StopwatchConfig::default().with_tick_interval_ms(50))?;
//! stopwatch.set_display(Some(Arc::new(|text: &str| println!("{text}"))));
//! stopwatch.start()?;
//! tokio::time::sleep(std::time::Duration::from_secs(1)).await;
//! let split = stopwatch.split()?;
//! stopwatch.stop()?;
//! println!("lap {} ms, total {} ms", split.lap_ms, stopwatch.elapsed_ms());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod engine;
pub mod error;
pub mod types;

// Re-export commonly used types for convenience
pub use engine::{
    format_time, Countdown, CountdownEvent, CountdownListener, DisplaySink, EventForwarder,
    ManualTimeSource, MockCountdownListener, MockDisplaySink, MockTickListener, Stopwatch,
    StopwatchEvent, SystemTimeSource, TickListener, TimeSource, TokioTimeSource,
};
pub use error::{Operation, TimerError};
pub use types::{
    ClockState, CountdownConfig, CountdownSnapshot, Phase, Split, StopwatchConfig,
    StopwatchSnapshot, DEFAULT_TICK_INTERVAL_MS,
};
