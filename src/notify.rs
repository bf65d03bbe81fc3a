use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reminder {
    EyeBreak,
    Stretch,
}

impl Reminder {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "eye_break" => Some(Self::EyeBreak),
            "stretch" => Some(Self::Stretch),
            _ => None,
        }
    }
}

/// When the next reminders are due, relative to now, and whether they
/// should be presented at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSchedule {
    pub enabled: bool,
    pub eye_seconds_remaining: u32,
    pub stretch_seconds_remaining: u32,
}

/// Presents reminders. Implementations decide how (banner, OS notification);
/// the widget only supplies when and whether.
pub trait Notifier: Send + Sync {
    fn break_due(&self, reminder: Reminder);

    fn reschedule(&self, schedule: &NotificationSchedule);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn break_due(&self, reminder: Reminder) {
        info!(?reminder, "break due");
    }

    fn reschedule(&self, schedule: &NotificationSchedule) {
        debug!(
            enabled = schedule.enabled,
            eye = schedule.eye_seconds_remaining,
            stretch = schedule.stretch_seconds_remaining,
            "notification schedule updated"
        );
    }
}
