use crate::models::DayRecord;
use serde::Serialize;

/// Number of distinct days kept in the ledger.
pub const RETENTION_DAYS: usize = 30;

/// Day records ordered by `day_key`, one per day, most recent
/// [`RETENTION_DAYS`] only. `YYYY-MM-DD` keys sort chronologically as strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Ledger {
    records: Vec<DayRecord>,
}

impl Ledger {
    /// Builds a ledger from records in any order. Later duplicates win.
    pub fn from_records(records: impl IntoIterator<Item = DayRecord>) -> Self {
        let mut ledger = Self::default();
        for record in records {
            ledger.upsert(record);
        }
        ledger
    }

    pub fn upsert(&mut self, record: DayRecord) {
        self.records.retain(|existing| existing.day_key != record.day_key);
        self.records.push(record);
        self.records.sort_by(|a, b| a.day_key.cmp(&b.day_key));
        if self.records.len() > RETENTION_DAYS {
            let excess = self.records.len() - RETENTION_DAYS;
            self.records.drain(..excess);
        }
    }

    /// The last `n` records, or all of them when there are fewer.
    pub fn windowed(&self, n: usize) -> &[DayRecord] {
        let start = self.records.len().saturating_sub(n);
        &self.records[start..]
    }

    pub fn get(&self, day_key: &str) -> Option<&DayRecord> {
        self.records
            .binary_search_by(|record| record.day_key.as_str().cmp(day_key))
            .ok()
            .map(|index| &self.records[index])
    }

    pub fn records(&self) -> &[DayRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::day_key;
    use chrono::{Duration, NaiveDate};

    fn record(key: &str, water: u64) -> DayRecord {
        DayRecord {
            water,
            ..DayRecord::new(key)
        }
    }

    #[test]
    fn upsert_replaces_same_day() {
        let mut ledger = Ledger::default();
        ledger.upsert(record("2024-01-01", 1));
        ledger.upsert(record("2024-01-02", 2));
        ledger.upsert(record("2024-01-01", 7));

        assert_eq!(ledger.len(), 2);
        let matching: Vec<_> = ledger
            .records()
            .iter()
            .filter(|r| r.day_key == "2024-01-01")
            .collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].water, 7);
    }

    #[test]
    fn upsert_keeps_date_order_regardless_of_insertion_order() {
        let mut ledger = Ledger::default();
        for key in ["2024-01-03", "2023-12-31", "2024-01-02", "2024-01-01"] {
            ledger.upsert(record(key, 1));
        }

        let keys: Vec<_> = ledger.records().iter().map(|r| r.day_key.as_str()).collect();
        assert_eq!(keys, ["2023-12-31", "2024-01-01", "2024-01-02", "2024-01-03"]);
    }

    #[test]
    fn upsert_is_idempotent() {
        let mut once = Ledger::default();
        once.upsert(record("2024-01-01", 1));
        once.upsert(record("2024-01-02", 3));

        let mut twice = once.clone();
        twice.upsert(record("2024-01-02", 3));

        assert_eq!(once, twice);
    }

    #[test]
    fn thirty_one_days_drop_the_first() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut ledger = Ledger::default();
        for offset in 0..31 {
            ledger.upsert(record(&day_key(start + Duration::days(offset)), 1));
        }

        assert_eq!(ledger.len(), RETENTION_DAYS);
        assert_eq!(ledger.records()[0].day_key, "2024-01-02");
        assert_eq!(ledger.records()[29].day_key, "2024-01-31");
    }

    #[test]
    fn backfilled_old_day_is_dropped_when_full() {
        let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let mut ledger = Ledger::default();
        for offset in 0..30 {
            ledger.upsert(record(&day_key(start + Duration::days(offset)), 1));
        }
        ledger.upsert(record("2024-01-15", 9));

        assert_eq!(ledger.len(), RETENTION_DAYS);
        assert!(ledger.get("2024-01-15").is_none());
        assert_eq!(ledger.records()[0].day_key, "2024-02-01");
    }

    #[test]
    fn windowed_returns_most_recent_entries() {
        let ledger = Ledger::from_records([
            record("2024-01-01", 1),
            record("2024-01-02", 2),
            record("2024-01-03", 3),
        ]);

        let last_two: Vec<_> = ledger.windowed(2).iter().map(|r| r.water).collect();
        assert_eq!(last_two, [2, 3]);
        assert_eq!(ledger.windowed(7).len(), 3);
        assert!(ledger.windowed(0).is_empty());
    }

    #[test]
    fn from_records_keeps_later_duplicate() {
        let ledger = Ledger::from_records([record("2024-01-01", 1), record("2024-01-01", 4)]);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.get("2024-01-01").map(|r| r.water), Some(4));
    }
}
