use crate::calendar::day_key;
use crate::models::{DailyPoint, DayRecord, StatsResponse, Summary, WeeklyPoint};
use crate::tracker::Tracker;
use chrono::{Datelike, Duration, NaiveDate};

const WEEK_COUNT: usize = 5;

pub fn build_stats(tracker: &Tracker) -> StatsResponse {
    build_stats_at(tracker.today_date(), tracker)
}

pub fn build_stats_at(today: NaiveDate, tracker: &Tracker) -> StatsResponse {
    let ledger = tracker.ledger();
    let lookup = |date: NaiveDate| -> DayRecord {
        let key = day_key(date);
        if key == tracker.today().day_key {
            return tracker.today().clone();
        }
        ledger.get(&key).cloned().unwrap_or_else(|| DayRecord::new(key))
    };

    let mut last_7_days = Vec::with_capacity(7);
    for offset in (0..7).rev() {
        let date = today - Duration::days(offset);
        let record = lookup(date);
        last_7_days.push(DailyPoint {
            date: date.to_string(),
            water: record.water,
            eye_breaks: record.eye_breaks,
            stretches: record.stretches,
            routines: record.wake_routines.saturating_add(record.sleep_routines),
            work_time: record.work_time,
            active: record.is_active(),
        });
    }

    let current_week_start = week_start(today);
    let mut weekly_totals = Vec::with_capacity(WEEK_COUNT);
    for offset in (0..WEEK_COUNT).rev() {
        let start = current_week_start - Duration::weeks(offset as i64);
        let end = start + Duration::days(6);

        let mut point = WeeklyPoint {
            week: week_label(start),
            start_date: start.to_string(),
            end_date: end.to_string(),
            water: 0,
            eye_breaks: 0,
            stretches: 0,
            routines: 0,
            active_days: 0,
        };
        for day_offset in 0..7 {
            let record = lookup(start + Duration::days(day_offset));
            point.water = point.water.saturating_add(record.water);
            point.eye_breaks = point.eye_breaks.saturating_add(record.eye_breaks);
            point.stretches = point.stretches.saturating_add(record.stretches);
            point.routines = point
                .routines
                .saturating_add(record.wake_routines)
                .saturating_add(record.sleep_routines);
            if record.is_active() {
                point.active_days += 1;
            }
        }
        weekly_totals.push(point);
    }

    let goal = u64::from(tracker.settings().water_goal);
    StatsResponse {
        streak: tracker.streak(),
        last_7_days,
        summary_7: summarize(ledger.windowed(7), goal),
        summary_30: summarize(ledger.windowed(30), goal),
        weekly_totals,
    }
}

/// Totals over a window of ledger entries.
pub fn summarize(records: &[DayRecord], water_goal: u64) -> Summary {
    let mut summary = Summary {
        days: records.len(),
        ..Summary::default()
    };
    for record in records {
        if record.is_active() {
            summary.active_days += 1;
        }
        if record.water >= water_goal {
            summary.goal_met_days += 1;
        }
        summary.total_water = summary.total_water.saturating_add(record.water);
        summary.total_eye_breaks = summary.total_eye_breaks.saturating_add(record.eye_breaks);
        summary.total_stretches = summary.total_stretches.saturating_add(record.stretches);
        summary.total_routines = summary
            .total_routines
            .saturating_add(record.wake_routines)
            .saturating_add(record.sleep_routines);
        summary.total_work_time = summary.total_work_time.saturating_add(record.work_time);
    }
    if summary.days > 0 {
        summary.avg_water = summary.total_water as f64 / summary.days as f64;
    }
    summary
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

fn week_label(date: NaiveDate) -> String {
    let iso = date.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Ledger;
    use crate::models::WaterAction;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tracker_with_history(today: NaiveDate, history: &[(&str, u64)]) -> Tracker {
        let ledger = Ledger::from_records(history.iter().map(|(key, water)| DayRecord {
            water: *water,
            ..DayRecord::new(*key)
        }));
        Tracker::restore(None, ledger, today).0
    }

    #[test]
    fn last_7_days_fill_missing_days() {
        let today = date(2026, 1, 5);
        let tracker = tracker_with_history(today, &[("2026-01-03", 3), ("2025-12-20", 9)]);

        let stats = build_stats_at(today, &tracker);
        assert_eq!(stats.last_7_days.len(), 7);
        assert_eq!(stats.last_7_days[0].date, "2025-12-30");
        assert_eq!(stats.last_7_days[6].date, "2026-01-05");
        let point = stats
            .last_7_days
            .iter()
            .find(|day| day.date == "2026-01-03")
            .expect("missing day");
        assert_eq!(point.water, 3);
        assert!(point.active);
        assert!(!stats.last_7_days[6].active);
    }

    #[test]
    fn stats_follow_the_tracker_day() {
        let mut tracker = tracker_with_history(date(2024, 3, 10), &[("2024-03-09", 2)]);
        tracker.add_water(WaterAction::Add);

        let stats = build_stats(&tracker);
        let last = &stats.last_7_days[6];
        assert_eq!(last.date, "2024-03-10");
        assert_eq!(last.water, 1);
        assert!(last.active);
        assert_eq!(stats.streak, 2);
    }

    #[test]
    fn summaries_use_ledger_windows() {
        let today = date(2026, 1, 5);
        let tracker = tracker_with_history(
            today,
            &[
                ("2025-12-01", 8),
                ("2025-12-02", 0),
                ("2026-01-01", 10),
                ("2026-01-02", 2),
            ],
        );

        let stats = build_stats_at(today, &tracker);
        assert_eq!(stats.summary_30.days, 4);
        assert_eq!(stats.summary_30.active_days, 3);
        assert_eq!(stats.summary_30.goal_met_days, 2);
        assert_eq!(stats.summary_30.total_water, 20);
        assert_eq!(stats.summary_30.avg_water, 5.0);
        assert_eq!(stats.summary_7, stats.summary_30);
    }

    #[test]
    fn weekly_totals_and_streak_include_today() {
        let today = date(2026, 1, 7);
        let mut tracker = tracker_with_history(today, &[("2026-01-05", 1), ("2026-01-06", 1)]);
        tracker.add_water(WaterAction::Add);

        let stats = build_stats_at(today, &tracker);
        assert_eq!(stats.streak, 3);
        assert_eq!(stats.weekly_totals.len(), WEEK_COUNT);
        let current = stats.weekly_totals.last().unwrap();
        assert_eq!(current.week, "2026-W02");
        assert_eq!(current.water, 3);
        assert_eq!(current.active_days, 3);
    }

    #[test]
    fn empty_summary_has_zero_average() {
        assert_eq!(summarize(&[], 8), Summary::default());
    }
}
