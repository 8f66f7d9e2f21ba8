use anyhow::Context;
use async_trait::async_trait;
use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime};
use sqlx::{PgPool, Row};
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::GlucoseRecord;
use crate::range::DateRange;
use crate::store::{read_csv, CsvRow, RecordStore};

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Readings kept in `glucotracker.glucose_records`.
#[derive(Debug, Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn query(&self, range: &DateRange) -> anyhow::Result<Vec<GlucoseRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, recorded_at, blood_sugar, note
            FROM glucotracker.glucose_records
            WHERE recorded_at::date BETWEEN $1 AND $2
            ORDER BY recorded_at
            "#,
        )
        .bind(range.start())
        .bind(range.stop())
        .fetch_all(&self.pool)
        .await
        .context("failed to query glucose records")?;

        let mut records = Vec::with_capacity(rows.len());

        for row in rows {
            let blood_sugar: i32 = row.get("blood_sugar");
            records.push(GlucoseRecord {
                id: row.get("id"),
                recorded_at: row.get("recorded_at"),
                blood_sugar: u32::try_from(blood_sugar)
                    .with_context(|| format!("negative blood sugar {blood_sugar} in store"))?,
                note: row.get("note"),
            });
        }

        debug!(range = %range, count = records.len(), "queried glucose records");
        Ok(records)
    }
}

/// Inserts one reading unless a row with the same `source_key` exists.
/// Returns whether a row was written.
async fn insert_reading(
    pool: &PgPool,
    source_key: &str,
    recorded_at: NaiveDateTime,
    blood_sugar: u32,
    note: Option<&str>,
) -> anyhow::Result<bool> {
    let blood_sugar = i32::try_from(blood_sugar)
        .with_context(|| format!("blood sugar {blood_sugar} does not fit the store"))?;

    let result = sqlx::query(
        r#"
        INSERT INTO glucotracker.glucose_records
        (id, recorded_at, blood_sugar, note, source_key)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (source_key) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(recorded_at)
    .bind(blood_sugar)
    .bind(note)
    .bind(source_key)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Loads a week of morning/evening readings starting on the first day of
/// `today`'s month, so the default view has something to show.
pub async fn seed(pool: &PgPool, today: NaiveDate) -> anyhow::Result<usize> {
    let first = today.with_day(1).context("invalid month start")?;
    let readings = [
        (0, 7, 30, 98, Some("fasting")),
        (0, 19, 15, 141, Some("after dinner")),
        (1, 7, 45, 104, Some("fasting")),
        (1, 20, 0, 156, None),
        (2, 7, 20, 92, Some("fasting")),
        (3, 12, 30, 133, Some("after lunch")),
        (4, 7, 35, 110, None),
        (5, 21, 10, 167, Some("late snack")),
        (6, 7, 25, 101, Some("fasting")),
    ];

    let mut inserted = 0usize;

    for (offset, hour, minute, blood_sugar, note) in readings {
        let day = first + Days::new(offset);
        let time = NaiveTime::from_hms_opt(hour, minute, 0).context("invalid seed time")?;
        let source_key = format!("seed-{day}-{hour:02}{minute:02}");
        if insert_reading(pool, &source_key, day.and_time(time), blood_sugar, note).await? {
            inserted += 1;
        }
    }

    info!(inserted, "seeded glucose records");
    Ok(inserted)
}

pub async fn import_csv(pool: &PgPool, csv_path: &std::path::Path) -> anyhow::Result<usize> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let rows = read_csv(file)?;
    let mut inserted = 0usize;

    for CsvRow {
        recorded_at,
        blood_sugar,
        note,
        source_key,
    } in rows
    {
        let source_key = source_key
            .filter(|key| !key.trim().is_empty())
            .unwrap_or_else(|| format!("import-{}", Uuid::new_v4()));
        let note = note.filter(|n| !n.trim().is_empty());

        if insert_reading(pool, &source_key, recorded_at, blood_sugar, note.as_deref()).await? {
            inserted += 1;
        }
    }

    info!(inserted, path = %csv_path.display(), "imported glucose records");
    Ok(inserted)
}
