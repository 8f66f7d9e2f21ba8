use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlucoseRecord {
    pub id: Uuid,
    pub recorded_at: NaiveDateTime,
    pub blood_sugar: u32,
    pub note: Option<String>,
}

impl GlucoseRecord {
    pub fn new(recorded_at: NaiveDateTime, blood_sugar: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            recorded_at,
            blood_sugar,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Calendar day the reading belongs to; the only part of the timestamp
    /// that range filtering looks at.
    pub fn day(&self) -> NaiveDate {
        self.recorded_at.date()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateSummary {
    pub average: u32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyAverage {
    pub day: NaiveDate,
    pub count: usize,
    pub average: u32,
}
