//! Timing engines.
//!
//! This module contains the core functionality:
//! - `stopwatch`: the clock engine (state machine, tick task, splits)
//! - `countdown`: a countdown adapter over a stopwatch
//! - `sink`: display and listener capabilities
//! - `time_source`: injectable clocks
//! - `format`: time display formatting

pub mod countdown;
pub mod format;
pub mod sink;
pub mod stopwatch;
pub mod time_source;

pub use countdown::Countdown;
pub use format::format_time;
pub use sink::{
    CountdownEvent, CountdownListener, DisplaySink, EventForwarder, MockCountdownListener,
    MockDisplaySink, MockTickListener, StopwatchEvent, TickListener,
};
pub use stopwatch::Stopwatch;
pub use time_source::{ManualTimeSource, SystemTimeSource, TimeSource, TokioTimeSource};
