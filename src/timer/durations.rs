//! Study and break duration inputs

use std::{
    num::{IntErrorKind, ParseIntError},
    sync::{Arc, Mutex, PoisonError},
};

use serde::{Deserialize, Serialize};

use crate::error::{DurationField, DurationProblem, TimerError};

/// Source of the raw duration inputs, read each time a phase starts
pub trait DurationSource: Send + Sync {
    /// Raw text of the given input
    fn raw(&self, field: DurationField) -> String;

    /// Parse the given input into a phase length in seconds
    fn phase_seconds(&self, field: DurationField) -> Result<u64, TimerError> {
        let raw = self.raw(field);
        let minutes = parse_minutes(field, &raw)?;
        minutes
            .checked_mul(60)
            .ok_or(TimerError::InvalidDuration {
                field,
                input: raw,
                reason: DurationProblem::TooLarge,
            })
    }
}

/// Parse a duration input as a positive whole number of minutes
pub fn parse_minutes(field: DurationField, input: &str) -> Result<u64, TimerError> {
    let invalid = |reason| TimerError::InvalidDuration {
        field,
        input: input.to_string(),
        reason,
    };

    let minutes: i64 = input.trim().parse().map_err(|e: ParseIntError| {
        invalid(match e.kind() {
            IntErrorKind::PosOverflow => DurationProblem::TooLarge,
            IntErrorKind::NegOverflow => DurationProblem::NotPositive,
            _ => DurationProblem::NotANumber,
        })
    })?;

    if minutes <= 0 {
        return Err(invalid(DurationProblem::NotPositive));
    }
    Ok(minutes as u64)
}

/// Snapshot of both raw inputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDurations {
    pub study_minutes: String,
    pub break_minutes: String,
}

/// Shared, writable duration inputs.
///
/// Values are stored exactly as entered; validation happens when a phase
/// reads them.
#[derive(Debug, Clone)]
pub struct DurationInputs {
    inner: Arc<Mutex<RawDurations>>,
}

impl DurationInputs {
    pub fn new(study_minutes: impl Into<String>, break_minutes: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(RawDurations {
                study_minutes: study_minutes.into(),
                break_minutes: break_minutes.into(),
            })),
        }
    }

    pub fn set(&self, field: DurationField, value: impl Into<String>) {
        let mut inputs = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        match field {
            DurationField::Study => inputs.study_minutes = value.into(),
            DurationField::Break => inputs.break_minutes = value.into(),
        }
    }

    pub fn snapshot(&self) -> RawDurations {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl DurationSource for DurationInputs {
    fn raw(&self, field: DurationField) -> String {
        let inputs = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        match field {
            DurationField::Study => inputs.study_minutes.clone(),
            DurationField::Break => inputs.break_minutes.clone(),
        }
    }
}
