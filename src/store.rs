use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::Deserialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::GlucoseRecord;
use crate::range::DateRange;

/// Source of glucose readings.
///
/// `query` returns every record whose day lies inside `range`, both bounds
/// included. No matches is an empty vector, not an error. Callers must not
/// rely on any particular ordering.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn query(&self, range: &DateRange) -> anyhow::Result<Vec<GlucoseRecord>>;
}

#[async_trait]
impl<S: RecordStore + ?Sized> RecordStore for Arc<S> {
    async fn query(&self, range: &DateRange) -> anyhow::Result<Vec<GlucoseRecord>> {
        (**self).query(range).await
    }
}

/// Readings held in memory, returned in insertion order.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: RwLock<Vec<GlucoseRecord>>,
}

impl MemoryRecordStore {
    pub fn new(records: Vec<GlucoseRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    pub fn from_csv_path(path: &Path) -> anyhow::Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        let rows = read_csv(file)?;
        Ok(Self::new(rows.into_iter().map(CsvRow::into_record).collect()))
    }

    pub async fn insert(&self, record: GlucoseRecord) {
        self.records.write().await.push(record);
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn query(&self, range: &DateRange) -> anyhow::Result<Vec<GlucoseRecord>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|record| range.contains(record.day()))
            .cloned()
            .collect())
    }
}

/// One line of an import file: `recorded_at,blood_sugar,note,source_key`,
/// with `recorded_at` written as `2024-02-01T08:30:00`.
#[derive(Debug, Clone, Deserialize)]
pub struct CsvRow {
    pub recorded_at: NaiveDateTime,
    pub blood_sugar: u32,
    pub note: Option<String>,
    pub source_key: Option<String>,
}

impl CsvRow {
    pub fn into_record(self) -> GlucoseRecord {
        GlucoseRecord {
            id: Uuid::new_v4(),
            recorded_at: self.recorded_at,
            blood_sugar: self.blood_sugar,
            note: self.note.filter(|n| !n.trim().is_empty()),
        }
    }
}

pub fn read_csv<R: Read>(input: R) -> anyhow::Result<Vec<CsvRow>> {
    let mut reader = csv::Reader::from_reader(input);
    let mut rows = Vec::new();

    for (line, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result.with_context(|| format!("invalid reading on data row {}", line + 1))?;
        rows.push(row);
    }

    Ok(rows)
}
