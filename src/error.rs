//! Error types for the study timer

use thiserror::Error;

/// Which duration input a value was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationField {
    Study,
    Break,
}

impl DurationField {
    pub fn as_str(&self) -> &'static str {
        match self {
            DurationField::Study => "study",
            DurationField::Break => "break",
        }
    }
}

impl std::fmt::Display for DurationField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a duration input was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationProblem {
    NotANumber,
    NotPositive,
    TooLarge,
}

impl std::fmt::Display for DurationProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            DurationProblem::NotANumber => "not a whole number of minutes",
            DurationProblem::NotPositive => "must be at least one minute",
            DurationProblem::TooLarge => "too large",
        };
        f.write_str(text)
    }
}

/// Errors surfaced by the phase timer and its event loop
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TimerError {
    /// A duration input could not be turned into a positive number of minutes.
    #[error("invalid {field} duration {input:?}: {reason}")]
    InvalidDuration {
        field: DurationField,
        input: String,
        reason: DurationProblem,
    },

    /// The timer task has shut down and no longer accepts commands.
    #[error("timer task is not running")]
    TimerUnavailable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_duration_message_names_field_and_input() {
        let err = TimerError::InvalidDuration {
            field: DurationField::Break,
            input: "abc".to_string(),
            reason: DurationProblem::NotANumber,
        };
        assert_eq!(
            err.to_string(),
            "invalid break duration \"abc\": not a whole number of minutes"
        );
    }
}
