use std::fmt::Write;

use crate::aggregate;
use crate::controller::TrackerView;

const RECENT_READINGS: usize = 10;

pub fn build_report(view: &TrackerView) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# {}", view.title);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Summary");

    if view.summary.count == 0 {
        let _ = writeln!(output, "No readings recorded for this range.");
    } else {
        let _ = writeln!(output, "- Readings: {}", view.summary.count);
        let _ = writeln!(output, "- {}", view.footer);
        if let Some(range) = &view.range {
            let _ = writeln!(output, "- Days in range: {}", range.num_days());
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Daily Averages");

    let days = aggregate::daily_breakdown(&view.records);
    if days.is_empty() {
        let _ = writeln!(output, "No readings recorded for this range.");
    } else {
        for day in days.iter() {
            let _ = writeln!(
                output,
                "- {}: {} across {} readings",
                day.day.format("%-m/%-d/%Y"),
                day.average,
                day.count
            );
        }
    }

    let mut recent = view.records.clone();
    recent.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
    let _ = writeln!(output);
    let _ = writeln!(output, "## Most Recent Readings");

    if recent.is_empty() {
        let _ = writeln!(output, "No readings recorded for this range.");
    } else {
        for record in recent.iter().take(RECENT_READINGS) {
            let _ = write!(
                output,
                "- {}: {}",
                record.recorded_at.format("%-m/%-d/%Y %H:%M"),
                record.blood_sugar
            );
            match &record.note {
                Some(note) => {
                    let _ = writeln!(output, " ({note})");
                }
                None => {
                    let _ = writeln!(output);
                }
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AggregateSummary, GlucoseRecord};
    use crate::range::DateRange;
    use chrono::NaiveDate;

    fn reading(day: u32, hour: u32, blood_sugar: u32) -> GlucoseRecord {
        let recorded_at = NaiveDate::from_ymd_opt(2024, 2, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap();
        GlucoseRecord::new(recorded_at, blood_sugar)
    }

    #[test]
    fn report_lists_summary_days_and_recent_readings() {
        let records = vec![
            reading(1, 7, 100),
            reading(2, 8, 150).with_note("after breakfast"),
        ];
        let view = TrackerView {
            title: "AppName (2/1/2024 - 2/29/2024)".to_string(),
            footer: "Average: 125".to_string(),
            range: DateRange::new(
                NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
            )
            .ok(),
            summary: aggregate::summarize(&records),
            records,
        };

        let report = build_report(&view);
        assert!(report.starts_with("# AppName (2/1/2024 - 2/29/2024)\n"));
        assert!(report.contains("- Readings: 2\n"));
        assert!(report.contains("- Average: 125\n"));
        assert!(report.contains("- Days in range: 29\n"));
        assert!(report.contains("- 2/1/2024: 100 across 1 readings\n"));
        let newest = report.find("2/2/2024 08:00: 150 (after breakfast)").unwrap();
        let oldest = report.find("2/1/2024 07:00: 100\n").unwrap();
        assert!(newest < oldest);
    }

    #[test]
    fn empty_report_says_so() {
        let view = TrackerView {
            title: "AppName".to_string(),
            footer: "Average: 0".to_string(),
            range: None,
            records: Vec::new(),
            summary: AggregateSummary::default(),
        };
        let report = build_report(&view);
        assert_eq!(report.matches("No readings recorded for this range.").count(), 3);
    }
}
