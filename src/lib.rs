//! Glucose readings filtered to a date range, with their rounded average.

pub mod aggregate;
pub mod config;
pub mod controller;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod range;
pub mod report;
pub mod store;

pub use controller::{RangeController, TrackerView};
pub use error::{ControllerError, InvalidRangeError};
pub use models::{AggregateSummary, GlucoseRecord};
pub use range::DateRange;
pub use store::{MemoryRecordStore, RecordStore};
