//! The persisted shapes behind the `state` and `history` keys.
//!
//! Stored JSON is never trusted: every field is parsed on its own and falls
//! back to a default when it is missing or has the wrong type, so a corrupted
//! file degrades to first-run behavior instead of failing.

use crate::calendar::parse_day_key;
use crate::models::{DayRecord, Details};
use crate::settings::Settings;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const STATE_KEY: &str = "state";
pub const HISTORY_KEY: &str = "history";

const WATER_FIELDS: [&str; 4] = ["water", "waterAmount", "waterCount", "waterMl"];

/// Everything under the `state` key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    #[serde(flatten)]
    pub settings: Settings,
    pub water_count: u64,
    pub eye_break_timer: u32,
    pub stretch_timer: u32,
    pub is_paused: bool,
    pub today_stats: Option<DayRecord>,
}

impl StateSnapshot {
    /// Returns `None` only when the value is not an object at all.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let defaults = Settings::default();

        let settings = Settings {
            water_goal: u32_field(object, "waterGoal").unwrap_or(defaults.water_goal),
            eye_break_interval: u32_field(object, "eyeBreakInterval")
                .unwrap_or(defaults.eye_break_interval),
            stretch_interval: u32_field(object, "stretchInterval")
                .unwrap_or(defaults.stretch_interval),
            sound_enabled: bool_field(object, "soundEnabled").unwrap_or(defaults.sound_enabled),
            theme_id: string_field(object, "themeId").unwrap_or(defaults.theme_id),
            avatar: string_field(object, "avatar").unwrap_or(defaults.avatar),
            bubbles_enabled: bool_field(object, "bubblesEnabled")
                .unwrap_or(defaults.bubbles_enabled),
        }
        .clamped();

        let water_count = WATER_FIELDS
            .iter()
            .find_map(|field| coerce_u64(object.get(*field)))
            .unwrap_or(0);

        let today_stats = object.get("todayStats").and_then(parse_day_record).map(|mut record| {
            let has_own_water = record_has_water(object.get("todayStats"));
            if !has_own_water {
                record.water = water_count;
            }
            record
        });

        Some(Self {
            eye_break_timer: u32_field(object, "eyeBreakTimer")
                .unwrap_or(settings.eye_break_interval),
            stretch_timer: u32_field(object, "stretchTimer").unwrap_or(settings.stretch_interval),
            is_paused: bool_field(object, "isPaused").unwrap_or(false),
            settings,
            water_count,
            today_stats,
        })
    }
}

/// Parses one stored day. Entries without a valid `dayKey` are dropped.
pub fn parse_day_record(value: &Value) -> Option<DayRecord> {
    let object = value.as_object()?;
    let day_key = object.get("dayKey").and_then(Value::as_str)?;
    parse_day_key(day_key)?;

    Some(DayRecord {
        day_key: day_key.to_string(),
        water: WATER_FIELDS
            .iter()
            .find_map(|field| coerce_u64(object.get(*field)))
            .unwrap_or(0),
        eye_breaks: coerce_u64(object.get("eyeBreaks")).unwrap_or(0),
        stretches: coerce_u64(object.get("stretches")).unwrap_or(0),
        wake_routines: coerce_u64(object.get("wakeRoutines")).unwrap_or(0),
        sleep_routines: coerce_u64(object.get("sleepRoutines")).unwrap_or(0),
        work_time: coerce_u64(object.get("workTime")).unwrap_or(0),
        details: object.get("details").map(parse_details).unwrap_or_default(),
    })
}

/// Parses the `history` array, skipping entries that are not day records.
pub fn parse_history(value: &Value) -> Vec<DayRecord> {
    value
        .as_array()
        .map(|entries| entries.iter().filter_map(parse_day_record).collect())
        .unwrap_or_default()
}

fn parse_details(value: &Value) -> Details {
    let Some(groups) = value.as_object() else {
        return Details::new();
    };

    groups
        .iter()
        .filter_map(|(group, exercises)| {
            let exercises = exercises.as_object()?;
            let counts: BTreeMap<String, u64> = exercises
                .iter()
                .filter_map(|(exercise, count)| {
                    coerce_u64(Some(count)).map(|count| (exercise.clone(), count))
                })
                .collect();
            Some((group.clone(), counts))
        })
        .collect()
}

fn record_has_water(value: Option<&Value>) -> bool {
    value
        .and_then(Value::as_object)
        .is_some_and(|object| WATER_FIELDS.iter().any(|field| object.contains_key(*field)))
}

/// Numbers and numeric strings become non-negative integers; fractions are
/// truncated and negatives become zero. Anything else is `None`.
fn coerce_u64(value: Option<&Value>) -> Option<u64> {
    let number = match value? {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !number.is_finite() {
        return None;
    }
    Some(if number <= 0.0 { 0 } else { number as u64 })
}

fn u32_field(object: &Map<String, Value>, field: &str) -> Option<u32> {
    coerce_u64(object.get(field)).map(|value| u32::try_from(value).unwrap_or(u32::MAX))
}

fn bool_field(object: &Map<String, Value>, field: &str) -> Option<bool> {
    object.get(field).and_then(Value::as_bool)
}

fn string_field(object: &Map<String, Value>, field: &str) -> Option<String> {
    object.get(field).and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn garbage_state_falls_back_per_field() {
        let value = json!({
            "waterGoal": "99",
            "eyeBreakInterval": -5,
            "stretchInterval": "soon",
            "soundEnabled": "yes",
            "themeId": 4,
            "eyeBreakTimer": 30.7,
            "isPaused": true,
            "todayStats": [1, 2, 3]
        });

        let snapshot = StateSnapshot::from_value(&value).expect("object parses");
        assert_eq!(snapshot.settings.water_goal, 12);
        assert_eq!(snapshot.settings.eye_break_interval, 300);
        assert_eq!(snapshot.settings.stretch_interval, 2700);
        assert!(snapshot.settings.sound_enabled);
        assert_eq!(snapshot.settings.theme_id, "ocean");
        assert_eq!(snapshot.eye_break_timer, 30);
        assert_eq!(snapshot.stretch_timer, 2700);
        assert!(snapshot.is_paused);
        assert!(snapshot.today_stats.is_none());
    }

    #[test]
    fn non_object_state_is_absent() {
        assert!(StateSnapshot::from_value(&json!("corrupt")).is_none());
        assert!(StateSnapshot::from_value(&Value::Null).is_none());
    }

    #[test]
    fn today_water_falls_back_to_top_level_count() {
        let value = json!({
            "waterCount": 4,
            "todayStats": { "dayKey": "2024-05-01", "eyeBreaks": 2 }
        });
        let snapshot = StateSnapshot::from_value(&value).unwrap();
        let today = snapshot.today_stats.unwrap();
        assert_eq!(today.water, 4);
        assert_eq!(today.eye_breaks, 2);
    }

    #[test]
    fn history_skips_invalid_entries_and_zero_fills() {
        let value = json!([
            { "dayKey": "2024-01-01", "water": 3, "details": { "wake": { "neck": 2, "bad": "x" }, "oops": 1 } },
            { "dayKey": "not a day", "water": 3 },
            { "water": 1 },
            "junk",
            { "dayKey": "2024-01-02", "waterMl": "750", "stretches": null }
        ]);

        let records = parse_history(&value);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].water, 3);
        assert_eq!(records[0].details["wake"]["neck"], 2);
        assert!(!records[0].details["wake"].contains_key("bad"));
        assert!(!records[0].details.contains_key("oops"));
        assert_eq!(records[1].water, 750);
        assert_eq!(records[1].stretches, 0);
    }

    #[test]
    fn history_that_is_not_an_array_is_empty() {
        assert!(parse_history(&json!({ "dayKey": "2024-01-01" })).is_empty());
    }

    #[test]
    fn written_state_reads_back() {
        let snapshot = StateSnapshot {
            settings: Settings::default(),
            water_count: 2,
            eye_break_timer: 600,
            stretch_timer: 100,
            is_paused: false,
            today_stats: Some(DayRecord {
                water: 2,
                ..DayRecord::new("2024-06-01")
            }),
        };

        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["waterGoal"], 8);
        assert_eq!(value["todayStats"]["dayKey"], "2024-06-01");
        assert_eq!(StateSnapshot::from_value(&value), Some(snapshot));
    }
}
