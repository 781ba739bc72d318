//! Display utilities for the timeit demo.
//!
//! This module provides:
//! - A terminal display sink that redraws the time in place
//! - Banner, error and summary messages

use std::io::{self, Write};

use crate::engine::{format_time, DisplaySink};

// ============================================================================
// TerminalDisplay
// ============================================================================

/// Display sink that rewrites the current terminal line.
#[derive(Debug, Default)]
pub struct TerminalDisplay;

impl DisplaySink for TerminalDisplay {
    fn show(&self, text: &str) {
        let mut stdout = io::stdout().lock();
        // Trailing spaces clear leftovers from a longer previous value.
        let _ = write!(stdout, "\r{:<10}", text);
        let _ = stdout.flush();
    }
}

// ============================================================================
// Display
// ============================================================================

/// Display utilities for demo output.
pub struct Display;

impl Display {
    /// Shows the button help for the stopwatch screen.
    pub fn show_stopwatch_banner(tick_interval_ms: u64) {
        println!("Stopwatch (tick every {} ms)", tick_interval_ms);
        println!("buttons: start | stop | pause | resume | split | quit");
    }

    /// Shows the button help for the countdown screen.
    pub fn show_countdown_banner(duration_ms: u64) {
        println!("Countdown {}", format_time(duration_ms));
        println!("buttons: start | stop | pause | resume | quit");
    }

    /// Shows the split log.
    pub fn show_split_log(log: &str) {
        println!();
        print!("{}", log);
    }

    /// Shows the completion message.
    pub fn show_finished() {
        println!("\nfinished");
    }

    /// Shows the last elapsed time when leaving the stopwatch.
    pub fn show_summary(elapsed_ms: u64) {
        println!("\nelapsed: {}", format_time(elapsed_ms));
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("error: {}", message);
    }
}
