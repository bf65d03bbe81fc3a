use crate::calendar::day_key;
use crate::ledger::Ledger;
use crate::models::DayRecord;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Consecutive active days ending at (and including) `today`.
///
/// A missing day and a present-but-inactive day both end the walk, so the
/// result is 0 whenever today has no recorded activity.
pub fn compute_streak(ledger: &Ledger, today: NaiveDate) -> u32 {
    let by_day: HashMap<&str, &DayRecord> = ledger
        .records()
        .iter()
        .map(|record| (record.day_key.as_str(), record))
        .collect();

    let mut streak = 0;
    let mut date = Some(today);
    while let Some(current) = date {
        match by_day.get(day_key(current).as_str()) {
            Some(record) if record.is_active() => streak += 1,
            _ => break,
        }
        date = current.pred_opt();
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger(entries: &[(&str, u64)]) -> Ledger {
        Ledger::from_records(entries.iter().map(|(key, water)| DayRecord {
            water: *water,
            ..DayRecord::new(*key)
        }))
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn inactive_day_breaks_the_chain() {
        let ledger = ledger(&[("2024-01-01", 3), ("2024-01-02", 0), ("2024-01-03", 5)]);
        assert_eq!(compute_streak(&ledger, date(2024, 1, 3)), 1);
    }

    #[test]
    fn counts_back_to_first_gap() {
        let ledger = ledger(&[
            ("2024-01-01", 2),
            ("2024-01-03", 1),
            ("2024-01-04", 1),
            ("2024-01-05", 4),
        ]);
        assert_eq!(compute_streak(&ledger, date(2024, 1, 5)), 3);
    }

    #[test]
    fn zero_when_today_is_missing_or_idle() {
        let history = ledger(&[("2024-01-01", 2), ("2024-01-02", 2)]);
        assert_eq!(compute_streak(&history, date(2024, 1, 3)), 0);

        let idle_today = ledger(&[("2024-01-01", 2), ("2024-01-02", 0)]);
        assert_eq!(compute_streak(&idle_today, date(2024, 1, 2)), 0);

        assert_eq!(compute_streak(&Ledger::default(), date(2024, 1, 2)), 0);
    }

    #[test]
    fn any_tracked_counter_makes_a_day_active() {
        let mut records = vec![DayRecord::new("2024-01-01"), DayRecord::new("2024-01-02")];
        records[0].sleep_routines = 1;
        records[1].eye_breaks = 2;
        let ledger = Ledger::from_records(records);
        assert_eq!(compute_streak(&ledger, date(2024, 1, 2)), 2);
    }

    #[test]
    fn walks_across_month_and_year_boundaries() {
        let ledger = ledger(&[("2023-12-30", 1), ("2023-12-31", 1), ("2024-01-01", 1)]);
        assert_eq!(compute_streak(&ledger, date(2024, 1, 1)), 3);
    }
}
