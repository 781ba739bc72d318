//! Console "buttons" for the demo.
//!
//! Each input line is one button press. Presses are guarded the same way
//! the on-screen buttons are: a press that does not apply in the current
//! phase is ignored rather than turned into an error.

use std::fmt;
use std::str::FromStr;

use crate::engine::{Countdown, Stopwatch};
use crate::error::TimerError;
use crate::types::Split;

// ============================================================================
// Button
// ============================================================================

/// Buttons available on the demo screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Start,
    Stop,
    Pause,
    Resume,
    /// Stopwatch only
    Split,
    Quit,
}

impl Button {
    /// Returns the word typed to press this button.
    pub fn as_command(&self) -> &'static str {
        match self {
            Button::Start => "start",
            Button::Stop => "stop",
            Button::Pause => "pause",
            Button::Resume => "resume",
            Button::Split => "split",
            Button::Quit => "quit",
        }
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_command())
    }
}

impl FromStr for Button {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start" => Ok(Button::Start),
            "stop" => Ok(Button::Stop),
            "pause" => Ok(Button::Pause),
            "resume" => Ok(Button::Resume),
            "split" | "lap" => Ok(Button::Split),
            "quit" | "exit" | "q" => Ok(Button::Quit),
            other => Err(format!("unknown button: {other}")),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// What the demo should do after a press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to print
    Continue,
    /// Print the given text
    Print(String),
    /// Leave the demo
    Quit,
}

/// Renders the split log, one line per split.
pub fn format_split_log(splits: &[Split]) -> String {
    splits
        .iter()
        .enumerate()
        .map(|(index, split)| {
            format!("{} <- Lap {} Split -> {}\n", split.lap_ms, index, split.split_ms)
        })
        .collect()
}

/// Applies a button press to a stopwatch.
pub fn press_stopwatch(stopwatch: &Stopwatch, button: Button) -> Result<Outcome, TimerError> {
    match button {
        Button::Start if !stopwatch.is_started() => stopwatch.start()?,
        Button::Stop if stopwatch.is_started() => stopwatch.stop()?,
        Button::Pause if stopwatch.is_started() && !stopwatch.is_paused() => stopwatch.pause()?,
        Button::Resume if stopwatch.is_paused() => stopwatch.resume()?,
        Button::Split => {
            if stopwatch.is_started() {
                stopwatch.split()?;
            }
            return Ok(Outcome::Print(format_split_log(&stopwatch.splits())));
        }
        Button::Quit => return Ok(Outcome::Quit),
        _ => {}
    }
    Ok(Outcome::Continue)
}

/// Applies a button press to a countdown. `split` has no meaning here.
pub fn press_countdown(countdown: &Countdown, button: Button) -> Result<Outcome, TimerError> {
    match button {
        Button::Start if !countdown.is_started() => countdown.start()?,
        Button::Stop if countdown.is_started() => countdown.stop()?,
        Button::Pause if countdown.is_started() && !countdown.is_paused() => countdown.pause()?,
        Button::Resume if countdown.is_paused() => countdown.resume()?,
        Button::Quit => return Ok(Outcome::Quit),
        _ => {}
    }
    Ok(Outcome::Continue)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::engine::ManualTimeSource;
    use crate::types::Phase;

    #[test]
    fn test_parse_buttons() {
        assert_eq!("start".parse::<Button>().unwrap(), Button::Start);
        assert_eq!(" STOP \n".parse::<Button>().unwrap(), Button::Stop);
        assert_eq!("pause".parse::<Button>().unwrap(), Button::Pause);
        assert_eq!("resume".parse::<Button>().unwrap(), Button::Resume);
        assert_eq!("lap".parse::<Button>().unwrap(), Button::Split);
        assert_eq!("q".parse::<Button>().unwrap(), Button::Quit);

        let err = "reset".parse::<Button>().unwrap_err();
        assert!(err.contains("unknown button"));
    }

    #[test]
    fn test_display_round_trips_command() {
        for button in [
            Button::Start,
            Button::Stop,
            Button::Pause,
            Button::Resume,
            Button::Split,
            Button::Quit,
        ] {
            assert_eq!(button.to_string().parse::<Button>().unwrap(), button);
        }
    }

    #[test]
    fn test_format_split_log() {
        let splits = [Split::new(1_000, 1_000), Split::new(2_500, 1_500)];
        assert_eq!(
            format_split_log(&splits),
            "1000 <- Lap 0 Split -> 1000\n1500 <- Lap 1 Split -> 2500\n"
        );
        assert_eq!(format_split_log(&[]), "");
    }

    #[tokio::test]
    async fn test_stopwatch_presses_are_guarded() {
        let clock = Arc::new(ManualTimeSource::new(0));
        let stopwatch = Stopwatch::new().with_time_source(clock.clone());

        // Nothing applies while stopped except start.
        assert_eq!(press_stopwatch(&stopwatch, Button::Stop).unwrap(), Outcome::Continue);
        assert_eq!(press_stopwatch(&stopwatch, Button::Pause).unwrap(), Outcome::Continue);
        assert_eq!(press_stopwatch(&stopwatch, Button::Resume).unwrap(), Outcome::Continue);

        press_stopwatch(&stopwatch, Button::Start).unwrap();
        press_stopwatch(&stopwatch, Button::Start).unwrap();
        assert_eq!(stopwatch.phase(), Phase::Running);

        clock.advance(1_200);
        let outcome = press_stopwatch(&stopwatch, Button::Split).unwrap();
        assert_eq!(outcome, Outcome::Print("1200 <- Lap 0 Split -> 1200\n".to_string()));

        press_stopwatch(&stopwatch, Button::Pause).unwrap();
        press_stopwatch(&stopwatch, Button::Pause).unwrap();
        assert!(stopwatch.is_paused());

        press_stopwatch(&stopwatch, Button::Resume).unwrap();
        press_stopwatch(&stopwatch, Button::Stop).unwrap();
        assert_eq!(stopwatch.phase(), Phase::Stopped);

        assert_eq!(press_stopwatch(&stopwatch, Button::Quit).unwrap(), Outcome::Quit);
    }

    #[tokio::test]
    async fn test_countdown_presses_are_guarded() {
        let countdown = Countdown::new(10_000).with_time_source(Arc::new(ManualTimeSource::new(0)));

        press_countdown(&countdown, Button::Pause).unwrap();
        assert_eq!(countdown.phase(), Phase::Stopped);

        press_countdown(&countdown, Button::Start).unwrap();
        press_countdown(&countdown, Button::Split).unwrap();
        press_countdown(&countdown, Button::Pause).unwrap();
        assert!(countdown.is_paused());

        press_countdown(&countdown, Button::Resume).unwrap();
        press_countdown(&countdown, Button::Stop).unwrap();
        assert_eq!(countdown.phase(), Phase::Stopped);
    }

    #[test]
    fn test_countdown_start_without_duration_is_an_error() {
        let countdown = Countdown::new(0);
        let err = press_countdown(&countdown, Button::Start).unwrap_err();
        assert!(err.is_configuration_error());
    }
}
