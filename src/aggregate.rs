use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::{AggregateSummary, DailyAverage, GlucoseRecord};

/// Round-half-up average of the readings, `0` when there are none.
pub fn average(records: &[GlucoseRecord]) -> u32 {
    let total: u128 = records.iter().map(|r| u128::from(r.blood_sugar)).sum();
    rounded_mean(total, records.len())
}

pub fn summarize(records: &[GlucoseRecord]) -> AggregateSummary {
    AggregateSummary {
        average: average(records),
        count: records.len(),
    }
}

/// Per-day counts and averages, oldest day first.
pub fn daily_breakdown(records: &[GlucoseRecord]) -> Vec<DailyAverage> {
    let mut days: BTreeMap<NaiveDate, (usize, u128)> = BTreeMap::new();

    for record in records {
        let entry = days.entry(record.day()).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += u128::from(record.blood_sugar);
    }

    days.into_iter()
        .map(|(day, (count, total))| DailyAverage {
            day,
            count,
            average: rounded_mean(total, count),
        })
        .collect()
}

// floor(total / count + 1/2) computed exactly as floor((2 * total + count) / (2 * count)).
fn rounded_mean(total: u128, count: usize) -> u32 {
    if count == 0 {
        return 0;
    }
    let count = count as u128;
    let mean = (2 * total + count) / (2 * count);
    u32::try_from(mean).unwrap_or(u32::MAX)
}
