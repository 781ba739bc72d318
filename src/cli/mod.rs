//! CLI module for the timeit demo.
//!
//! This module provides the command-line front end:
//! - `commands`: Command definitions using clap derive
//! - `config`: Demo defaults and JSON config loading
//! - `console`: Button presses read from stdin
//! - `display`: Terminal display sink and output formatting

pub mod commands;
pub mod config;
pub mod console;
pub mod display;

pub use commands::{Cli, Commands, CountdownArgs, StopwatchArgs};
pub use config::DemoConfig;
pub use console::{press_countdown, press_stopwatch, Button, Outcome};
pub use display::{Display, TerminalDisplay};
