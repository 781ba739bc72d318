//! Command definitions for the timeit demo.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

// ============================================================================
// CLI Structure
// ============================================================================

/// timeit - stopwatch and countdown demo
#[derive(Parser, Debug)]
#[command(
    name = "timeit",
    version,
    about = "Stopwatch and countdown timer demo",
    long_about = "Drive a stopwatch or a countdown from the terminal.\n\
                  Type start, stop, pause, resume, split or quit and press enter.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON file with stopwatch and countdown defaults
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run an interactive stopwatch
    Stopwatch(StopwatchArgs),

    /// Run an interactive countdown
    Countdown(CountdownArgs),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Arguments
// ============================================================================

/// Arguments for the stopwatch command
#[derive(Args, Debug, Clone, Default)]
pub struct StopwatchArgs {
    /// Tick interval in milliseconds
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,

    /// Log every tick and split
    #[arg(short, long)]
    pub debug: bool,
}

/// Arguments for the countdown command
#[derive(Args, Debug, Clone, Default)]
pub struct CountdownArgs {
    /// Countdown length in milliseconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub duration: Option<u64>,

    /// Tick interval in milliseconds
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,

    /// Log every tick
    #[arg(short, long)]
    pub debug: bool,
}
