use chrono::{Local, NaiveDate};

/// Canonical `YYYY-MM-DD` key for a calendar day.
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parses a day key, accepting only the zero-padded `YYYY-MM-DD` form.
pub fn parse_day_key(key: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()?;
    (day_key(date) == key).then_some(date)
}

/// Today's date on the local wall clock. Rollover follows local midnight.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_key_is_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(day_key(date), "2024-03-07");
    }

    #[test]
    fn parse_rejects_non_canonical_keys() {
        assert_eq!(
            parse_day_key("2024-03-07"),
            NaiveDate::from_ymd_opt(2024, 3, 7)
        );
        assert_eq!(parse_day_key("2024-3-7"), None);
        assert_eq!(parse_day_key("2024-02-30"), None);
        assert_eq!(parse_day_key("yesterday"), None);
    }
}
