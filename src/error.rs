//! Error types for the stopwatch and countdown engines.
//!
//! Every control-operation misuse is reported synchronously through
//! [`TimerError`]. Nothing is retried or queued: these are caller
//! contract violations, not transient failures.

use std::fmt;

use thiserror::Error;

use crate::types::Phase;

// ============================================================================
// Operation
// ============================================================================

/// Control operations that can be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Start,
    Stop,
    Pause,
    Resume,
    Split,
    SetDuration,
}

impl Operation {
    /// Returns the operation name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Start => "start",
            Operation::Stop => "stop",
            Operation::Pause => "pause",
            Operation::Resume => "resume",
            Operation::Split => "split",
            Operation::SetDuration => "set_duration",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// TimerError
// ============================================================================

/// Errors returned by [`Stopwatch`](crate::Stopwatch) and
/// [`Countdown`](crate::Countdown) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    /// The operation is not valid in the current phase.
    #[error("cannot {operation} while {phase}")]
    InvalidState {
        /// The rejected operation
        operation: Operation,
        /// The phase observed when the call was made
        phase: Phase,
    },

    /// A tick interval or countdown duration is not positive.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// No tokio runtime is available to schedule ticks.
    #[error("tick scheduler unavailable: {0}")]
    SchedulerUnavailable(String),
}

impl TimerError {
    pub(crate) fn invalid(operation: Operation, phase: Phase) -> Self {
        Self::InvalidState { operation, phase }
    }

    /// Returns true if this error reports a call made from the wrong phase.
    #[must_use]
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState { .. })
    }

    /// Returns true if this error reports a bad interval or duration.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Returns a short hint for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::InvalidState { operation, .. } => match operation {
                Operation::Start => "stop the current session before starting again",
                Operation::Resume => "pause the timer before resuming",
                Operation::SetDuration => "stop the countdown before changing its duration",
                Operation::Stop | Operation::Pause | Operation::Split => {
                    "start the timer first"
                }
            },
            Self::Configuration(_) => "use a positive number of milliseconds",
            Self::SchedulerUnavailable(_) => "call this from within a tokio runtime",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TimerError::invalid(Operation::Start, Phase::Running);
        assert_eq!(err.to_string(), "cannot start while running");

        let err = TimerError::invalid(Operation::Resume, Phase::Stopped);
        assert_eq!(err.to_string(), "cannot resume while stopped");

        let err = TimerError::Configuration("duration not set".to_string());
        assert!(err.to_string().contains("duration not set"));

        let err = TimerError::SchedulerUnavailable("no reactor".to_string());
        assert!(err.to_string().contains("no reactor"));
    }

    #[test]
    fn test_predicates() {
        let invalid = TimerError::invalid(Operation::Pause, Phase::Paused);
        assert!(invalid.is_invalid_state());
        assert!(!invalid.is_configuration_error());

        let config = TimerError::Configuration("x".into());
        assert!(config.is_configuration_error());
        assert!(!config.is_invalid_state());

        let sched = TimerError::SchedulerUnavailable("x".into());
        assert!(!sched.is_invalid_state());
        assert!(!sched.is_configuration_error());
    }

    #[test]
    fn test_suggestion() {
        let err = TimerError::invalid(Operation::Start, Phase::Running);
        assert!(err.suggestion().contains("stop"));

        let err = TimerError::invalid(Operation::Split, Phase::Stopped);
        assert!(err.suggestion().contains("start"));

        let err = TimerError::Configuration("x".into());
        assert!(err.suggestion().contains("positive"));
    }

    #[test]
    fn test_operation_as_str() {
        assert_eq!(Operation::Start.as_str(), "start");
        assert_eq!(Operation::Stop.as_str(), "stop");
        assert_eq!(Operation::Pause.as_str(), "pause");
        assert_eq!(Operation::Resume.as_str(), "resume");
        assert_eq!(Operation::Split.as_str(), "split");
        assert_eq!(Operation::SetDuration.as_str(), "set_duration");
    }
}
