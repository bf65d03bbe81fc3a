use crate::notify::{NotificationSchedule, Reminder};
use crate::timer::RunState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Routine group name -> exercise id -> completion count.
pub type Details = BTreeMap<String, BTreeMap<String, u64>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct DayRecord {
    pub day_key: String,
    pub water: u64,
    pub eye_breaks: u64,
    pub stretches: u64,
    pub wake_routines: u64,
    pub sleep_routines: u64,
    /// Seconds spent with the timers running.
    pub work_time: u64,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub details: Details,
}

impl DayRecord {
    pub fn new(day_key: impl Into<String>) -> Self {
        Self {
            day_key: day_key.into(),
            ..Self::default()
        }
    }

    /// A day counts towards the streak only with evidence of activity;
    /// work time alone does not.
    pub fn is_active(&self) -> bool {
        self.water > 0
            || self.eye_breaks > 0
            || self.stretches > 0
            || self.wake_routines > 0
            || self.sleep_routines > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    EyeBreak,
    Stretch,
    WakeRoutine,
    SleepRoutine,
}

impl Activity {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "eye_break" => Some(Self::EyeBreak),
            "stretch" => Some(Self::Stretch),
            "wake_routine" => Some(Self::WakeRoutine),
            "sleep_routine" => Some(Self::SleepRoutine),
            _ => None,
        }
    }

    /// The reminder a completed session of this kind answers, if any.
    pub fn reminder(self) -> Option<Reminder> {
        match self {
            Self::EyeBreak => Some(Reminder::EyeBreak),
            Self::Stretch => Some(Reminder::Stretch),
            Self::WakeRoutine | Self::SleepRoutine => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaterAction {
    Add,
    Remove,
}

impl WaterAction {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "add" => Some(Self::Add),
            "remove" => Some(Self::Remove),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WaterRequest {
    pub action: String,
}

#[derive(Debug, Deserialize)]
pub struct ActivityRequest {
    pub kind: String,
}

#[derive(Debug, Deserialize)]
pub struct DetailRequest {
    pub group: String,
    pub exercise: String,
}

#[derive(Debug, Deserialize)]
pub struct DismissRequest {
    pub kind: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimersView {
    pub run_state: RunState,
    pub eye_seconds_remaining: u32,
    pub stretch_seconds_remaining: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayResponse {
    pub today: DayRecord,
    pub streak: u32,
    pub water_goal: u32,
    pub timers: TimersView,
    pub reminders: Vec<Reminder>,
    pub notifications: NotificationSchedule,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPoint {
    pub date: String,
    pub water: u64,
    pub eye_breaks: u64,
    pub stretches: u64,
    pub routines: u64,
    pub work_time: u64,
    pub active: bool,
}

#[derive(Debug, Serialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub days: usize,
    pub active_days: usize,
    pub goal_met_days: usize,
    pub total_water: u64,
    pub avg_water: f64,
    pub total_eye_breaks: u64,
    pub total_stretches: u64,
    pub total_routines: u64,
    pub total_work_time: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPoint {
    pub week: String,
    pub start_date: String,
    pub end_date: String,
    pub water: u64,
    pub eye_breaks: u64,
    pub stretches: u64,
    pub routines: u64,
    pub active_days: u8,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub streak: u32,
    pub last_7_days: Vec<DailyPoint>,
    pub summary_7: Summary,
    pub summary_30: Summary,
    pub weekly_totals: Vec<WeeklyPoint>,
}
