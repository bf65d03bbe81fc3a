use serde::{Deserialize, Serialize};

pub const WATER_GOAL_RANGE: (u32, u32) = (6, 12);
pub const EYE_BREAK_INTERVAL_RANGE: (u32, u32) = (300, 3600);
pub const STRETCH_INTERVAL_RANGE: (u32, u32) = (900, 7200);

/// Day-independent user preferences. Always restored, always clamped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub water_goal: u32,
    /// Seconds between eye-rest reminders.
    pub eye_break_interval: u32,
    /// Seconds between stretch reminders.
    pub stretch_interval: u32,
    pub sound_enabled: bool,
    pub theme_id: String,
    pub avatar: String,
    pub bubbles_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            water_goal: 8,
            eye_break_interval: 1200,
            stretch_interval: 2700,
            sound_enabled: true,
            theme_id: "ocean".into(),
            avatar: "droplet".into(),
            bubbles_enabled: true,
        }
    }
}

impl Settings {
    pub fn clamped(mut self) -> Self {
        self.water_goal = clamp(self.water_goal, WATER_GOAL_RANGE);
        self.eye_break_interval = clamp(self.eye_break_interval, EYE_BREAK_INTERVAL_RANGE);
        self.stretch_interval = clamp(self.stretch_interval, STRETCH_INTERVAL_RANGE);
        if self.theme_id.trim().is_empty() {
            self.theme_id = Settings::default().theme_id;
        }
        if self.avatar.trim().is_empty() {
            self.avatar = Settings::default().avatar;
        }
        self
    }

    pub fn apply(&self, patch: SettingsPatch) -> Settings {
        let mut next = self.clone();
        if let Some(value) = patch.water_goal {
            next.water_goal = value;
        }
        if let Some(value) = patch.eye_break_interval {
            next.eye_break_interval = value;
        }
        if let Some(value) = patch.stretch_interval {
            next.stretch_interval = value;
        }
        if let Some(value) = patch.sound_enabled {
            next.sound_enabled = value;
        }
        if let Some(value) = patch.theme_id {
            next.theme_id = value;
        }
        if let Some(value) = patch.avatar {
            next.avatar = value;
        }
        if let Some(value) = patch.bubbles_enabled {
            next.bubbles_enabled = value;
        }
        next.clamped()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub water_goal: Option<u32>,
    pub eye_break_interval: Option<u32>,
    pub stretch_interval: Option<u32>,
    pub sound_enabled: Option<bool>,
    pub theme_id: Option<String>,
    pub avatar: Option<String>,
    pub bubbles_enabled: Option<bool>,
}

pub fn clamp(value: u32, (min, max): (u32, u32)) -> u32 {
    value.clamp(min, max)
}
