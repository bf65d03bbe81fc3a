use crate::notify::Reminder;
use crate::settings::Settings;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum RunState {
    #[default]
    Running,
    Paused,
}

/// A repeating countdown in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
    interval: u32,
}

impl Countdown {
    pub fn full(interval: u32) -> Self {
        let interval = interval.max(1);
        Self {
            remaining: interval,
            interval,
        }
    }

    /// Resumes at `remaining`, clamped into `1..=interval`.
    pub fn resume(interval: u32, remaining: u32) -> Self {
        let mut countdown = Self::full(interval);
        countdown.remaining = remaining.clamp(1, countdown.interval);
        countdown
    }

    /// Advances one second. Returns true when the countdown hit zero, in
    /// which case it has already restarted from the full interval.
    pub fn tick(&mut self) -> bool {
        if self.remaining <= 1 {
            self.remaining = self.interval;
            true
        } else {
            self.remaining -= 1;
            false
        }
    }

    pub fn reset(&mut self) {
        self.remaining = self.interval;
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }
}

/// What a single tick produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub due: Vec<Reminder>,
    /// Work time advanced, i.e. the timers were running.
    pub worked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timers {
    pub run_state: RunState,
    pub eye: Countdown,
    pub stretch: Countdown,
}

impl Timers {
    pub fn new(settings: &Settings, run_state: RunState) -> Self {
        Self {
            run_state,
            eye: Countdown::full(settings.eye_break_interval),
            stretch: Countdown::full(settings.stretch_interval),
        }
    }

    pub fn resume(settings: &Settings, run_state: RunState, eye: u32, stretch: u32) -> Self {
        Self {
            run_state,
            eye: Countdown::resume(settings.eye_break_interval, eye),
            stretch: Countdown::resume(settings.stretch_interval, stretch),
        }
    }

    /// Advances both countdowns when running. The work-time credit is left
    /// to the caller, which owns the day record.
    pub fn tick(&mut self) -> TickOutcome {
        if self.run_state == RunState::Paused {
            return TickOutcome::default();
        }

        let mut due = Vec::new();
        if self.eye.tick() {
            due.push(Reminder::EyeBreak);
        }
        if self.stretch.tick() {
            due.push(Reminder::Stretch);
        }
        TickOutcome { due, worked: true }
    }

    pub fn reset(&mut self) {
        self.eye.reset();
        self.stretch.reset();
    }

    pub fn reset_reminder(&mut self, reminder: Reminder) {
        match reminder {
            Reminder::EyeBreak => self.eye.reset(),
            Reminder::Stretch => self.stretch.reset(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }
}
