//! In-memory log of completed study sessions

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One finished study phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub date: NaiveDate,
    pub study_minutes: u64,
    /// Break length entered after the session, 0 if no break followed
    pub break_minutes: u64,
}

/// Summary over all recorded sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub sessions: usize,
    pub total_study_minutes: u64,
    pub average_study_minutes: f64,
    pub daily_study_minutes: BTreeMap<NaiveDate, u64>,
}

#[derive(Debug, Clone, Default)]
pub struct SessionLog {
    records: Vec<SessionRecord>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, record: SessionRecord) {
        tracing::info!(
            "Logged study session: {} min study, {} min break on {}",
            record.study_minutes,
            record.break_minutes,
            record.date
        );
        self.records.push(record);
    }

    pub fn records(&self) -> &[SessionRecord] {
        &self.records
    }

    pub fn stats(&self) -> SessionStats {
        let total: u64 = self.records.iter().map(|r| r.study_minutes).sum();
        let average = if self.records.is_empty() {
            0.0
        } else {
            total as f64 / self.records.len() as f64
        };

        let mut daily = BTreeMap::new();
        for record in &self.records {
            *daily.entry(record.date).or_insert(0) += record.study_minutes;
        }

        SessionStats {
            sessions: self.records.len(),
            total_study_minutes: total,
            average_study_minutes: average,
            daily_study_minutes: daily,
        }
    }
}
