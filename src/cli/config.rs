//! Demo configuration.
//!
//! Defaults mirror the demo screens: a stopwatch ticking every 50 ms with
//! debug logging, and a two minute countdown. A JSON file may override
//! them; command-line flags override the file.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cli::commands::{CountdownArgs, StopwatchArgs};
use crate::types::{CountdownConfig, StopwatchConfig};

/// Demo stopwatch tick interval in milliseconds.
pub const DEMO_TICK_INTERVAL_MS: u64 = 50;

/// Demo countdown length (two minutes).
pub const DEMO_COUNTDOWN_MS: u64 = 2 * 60 * 1000;

fn default_stopwatch() -> StopwatchConfig {
    StopwatchConfig::default()
        .with_tick_interval_ms(DEMO_TICK_INTERVAL_MS)
        .with_debug(true)
}

fn default_countdown() -> CountdownConfig {
    CountdownConfig::new(DEMO_COUNTDOWN_MS)
}

/// Settings for both demo screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoConfig {
    #[serde(default = "default_stopwatch")]
    pub stopwatch: StopwatchConfig,
    #[serde(default = "default_countdown")]
    pub countdown: CountdownConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            stopwatch: default_stopwatch(),
            countdown: default_countdown(),
        }
    }
}

impl DemoConfig {
    /// Loads a configuration file, or the defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Stopwatch settings with command-line overrides applied.
    pub fn stopwatch(&self, args: &StopwatchArgs) -> StopwatchConfig {
        let mut config = self.stopwatch.clone();
        if let Some(interval) = args.interval {
            config.tick_interval_ms = interval;
        }
        config.debug |= args.debug;
        config
    }

    /// Countdown settings with command-line overrides applied.
    pub fn countdown(&self, args: &CountdownArgs) -> CountdownConfig {
        let mut config = self.countdown.clone();
        if let Some(duration) = args.duration {
            config.duration_ms = duration;
        }
        if let Some(interval) = args.interval {
            config.stopwatch.tick_interval_ms = interval;
        }
        config.stopwatch.debug |= args.debug;
        config
    }
}
