use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use crate::aggregate;
use crate::error::ControllerError;
use crate::models::{AggregateSummary, GlucoseRecord};
use crate::range::DateRange;
use crate::store::RecordStore;

/// Everything the presentation layer needs to draw the list screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackerView {
    pub title: String,
    pub footer: String,
    pub range: Option<DateRange>,
    pub records: Vec<GlucoseRecord>,
    pub summary: AggregateSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct RangeState {
    range: Option<DateRange>,
    records: Vec<GlucoseRecord>,
    summary: AggregateSummary,
}

/// Keeps the active date range, the readings inside it and their summary in
/// step with each other.
///
/// Every transition queries the store first and commits the new range,
/// records and summary together only once the query has succeeded, so a
/// failed call leaves the previous state in place.
pub struct RangeController<S> {
    store: S,
    app_name: String,
    state: RangeState,
}

impl<S: RecordStore> RangeController<S> {
    pub fn new(store: S, app_name: impl Into<String>) -> Self {
        Self {
            store,
            app_name: app_name.into(),
            state: RangeState::default(),
        }
    }

    /// Selects the month containing `today` and loads its readings.
    pub async fn initialize(&mut self, today: NaiveDate) -> Result<(), ControllerError> {
        let range = DateRange::default_for_current_month(today);
        self.state = self.load(range).await?;
        Ok(())
    }

    /// Switches to `new_range`. A `DateRange` is valid by construction, so
    /// the only failure here is the store's.
    pub async fn set_range(&mut self, new_range: DateRange) -> Result<(), ControllerError> {
        self.state = self.load(new_range).await?;
        Ok(())
    }

    /// Validates the proposed bounds and switches to them. An inverted pair is
    /// rejected, never swapped.
    pub async fn set_bounds(
        &mut self,
        start: NaiveDate,
        stop: NaiveDate,
    ) -> Result<(), ControllerError> {
        let range = DateRange::new(start, stop).inspect_err(|err| {
            warn!(start = %err.start, stop = %err.stop, "rejected date range");
        })?;
        self.set_range(range).await
    }

    /// Re-reads the readings for the current range.
    pub async fn refresh(&mut self) -> Result<(), ControllerError> {
        match self.state.range {
            Some(range) => {
                self.state = self.load(range).await?;
            }
            None => debug!("refresh skipped, no range selected"),
        }
        Ok(())
    }

    /// Called when readings were added or removed behind the controller's back.
    pub async fn notify_data_changed(&mut self) -> Result<(), ControllerError> {
        debug!("record store changed");
        self.refresh().await
    }

    async fn load(&self, range: DateRange) -> Result<RangeState, ControllerError> {
        let records = self
            .store
            .query(&range)
            .await
            .map_err(ControllerError::Store)?;
        let summary = aggregate::summarize(&records);
        debug!(
            range = %range,
            days = range.num_days(),
            count = summary.count,
            average = summary.average,
            "refreshed readings"
        );
        Ok(RangeState {
            range: Some(range),
            records,
            summary,
        })
    }

    pub fn current_range(&self) -> Option<&DateRange> {
        self.state.range.as_ref()
    }

    pub fn current_records(&self) -> &[GlucoseRecord] {
        &self.state.records
    }

    pub fn current_summary(&self) -> AggregateSummary {
        self.state.summary
    }

    pub fn title_text(&self) -> String {
        match &self.state.range {
            Some(range) => format!("{} ({})", self.app_name, range.format()),
            None => self.app_name.clone(),
        }
    }

    pub fn footer_text(&self) -> String {
        format!("Average: {}", self.state.summary.average)
    }

    pub fn view(&self) -> TrackerView {
        TrackerView {
            title: self.title_text(),
            footer: self.footer_text(),
            range: self.state.range,
            records: self.state.records.clone(),
            summary: self.state.summary,
        }
    }
}
