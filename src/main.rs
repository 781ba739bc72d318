//! timeit - stopwatch and countdown demo
//!
//! Each line typed on stdin presses one button:
//! - start, stop, pause, resume
//! - split (stopwatch only)
//! - quit

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tokio::io::{AsyncBufReadExt, BufReader};

use timeit::cli::{
    press_countdown, press_stopwatch, Button, Cli, Commands, DemoConfig, Display, Outcome,
    TerminalDisplay,
};
use timeit::{
    Countdown, CountdownConfig, CountdownEvent, EventForwarder, Stopwatch, StopwatchConfig,
    StopwatchSnapshot,
};

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    let config = DemoConfig::load(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Stopwatch(args)) => run_stopwatch(config.stopwatch(&args)).await?,
        Some(Commands::Countdown(args)) => run_countdown(config.countdown(&args)).await?,
        Some(Commands::Completions { shell }) => generate_completions(shell),
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Reads one button press, skipping blank lines and reporting unknown words.
fn parse_button(line: &str) -> Option<Button> {
    if line.trim().is_empty() {
        return None;
    }
    match line.parse::<Button>() {
        Ok(button) => Some(button),
        Err(e) => {
            Display::show_error(&e);
            None
        }
    }
}

async fn run_stopwatch(config: StopwatchConfig) -> Result<()> {
    let stopwatch = Stopwatch::with_config(config).context("Invalid stopwatch configuration")?;
    stopwatch.set_display(Some(Arc::new(TerminalDisplay)));
    stopwatch.set_listener(Some(Arc::new(
        |_: &Stopwatch, snapshot: &StopwatchSnapshot| {
            tracing::debug!(elapsed_ms = snapshot.elapsed_ms, "tick");
        },
    )));

    Display::show_stopwatch_banner(stopwatch.tick_interval_ms());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    break;
                };
                let Some(button) = parse_button(&line) else {
                    continue;
                };
                match press_stopwatch(&stopwatch, button)? {
                    Outcome::Continue => {}
                    Outcome::Print(log) => Display::show_split_log(&log),
                    Outcome::Quit => break,
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    if stopwatch.is_started() {
        stopwatch.stop()?;
    }
    Display::show_summary(stopwatch.elapsed_ms());
    Ok(())
}

async fn run_countdown(config: CountdownConfig) -> Result<()> {
    let countdown = Countdown::with_config(config).context("Invalid countdown configuration")?;
    let (forwarder, mut events) = EventForwarder::<CountdownEvent>::channel();
    countdown.set_listener(Some(Arc::new(forwarder)));
    countdown.set_display(Some(Arc::new(TerminalDisplay)));

    Display::show_countdown_banner(countdown.duration_ms());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut input_open = true;
    loop {
        tokio::select! {
            line = lines.next_line(), if input_open => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    // Piped input: let a running countdown finish before leaving.
                    input_open = false;
                    if !countdown.is_started() || countdown.is_paused() {
                        break;
                    }
                    continue;
                };
                let Some(button) = parse_button(&line) else {
                    continue;
                };
                if press_countdown(&countdown, button)? == Outcome::Quit {
                    break;
                }
            }
            Some(event) = events.recv() => match event {
                CountdownEvent::Tick { remaining_ms } => {
                    tracing::debug!(remaining_ms, "tick");
                }
                CountdownEvent::Completed => {
                    Display::show_finished();
                    if !input_open {
                        break;
                    }
                }
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    if countdown.is_started() {
        countdown.stop()?;
    }
    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
