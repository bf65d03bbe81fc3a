use crate::calendar::day_key;
use crate::ledger::Ledger;
use crate::models::{Activity, DayRecord, TimersView, TodayResponse, WaterAction};
use crate::notify::{NotificationSchedule, Reminder};
use crate::settings::{Settings, SettingsPatch};
use crate::snapshot::StateSnapshot;
use crate::streak::compute_streak;
use crate::timer::{RunState, TickOutcome, Timers};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use tracing::info;

/// How the today record was obtained at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Restored {
    Resumed,
    Fresh,
}

/// The whole live widget state: settings, today's record, the countdowns
/// and the ledger. Every transition goes through `&mut self`, and every
/// change to today's record is upserted into the ledger before returning.
#[derive(Debug, Clone)]
pub struct Tracker {
    settings: Settings,
    today: DayRecord,
    today_date: NaiveDate,
    timers: Timers,
    ledger: Ledger,
    streak: u32,
    pending: BTreeSet<Reminder>,
}

impl Tracker {
    pub fn new(settings: Settings, today: NaiveDate) -> Self {
        let settings = settings.clamped();
        Self {
            timers: Timers::new(&settings, RunState::Running),
            settings,
            today: DayRecord::new(day_key(today)),
            today_date: today,
            ledger: Ledger::default(),
            streak: 0,
            pending: BTreeSet::new(),
        }
    }

    /// Reconciles persisted state with the current day. Settings and the
    /// pause flag always come back; counters and countdowns only when the
    /// snapshot belongs to `today`.
    pub fn restore(
        snapshot: Option<StateSnapshot>,
        ledger: Ledger,
        today: NaiveDate,
    ) -> (Self, Restored) {
        let key = day_key(today);
        let settings = snapshot
            .as_ref()
            .map(|snapshot| snapshot.settings.clone().clamped())
            .unwrap_or_default();
        let run_state = if snapshot.as_ref().is_some_and(|snapshot| snapshot.is_paused) {
            RunState::Paused
        } else {
            RunState::Running
        };

        let (record, timers, restored) = match snapshot {
            Some(StateSnapshot {
                today_stats: Some(record),
                eye_break_timer,
                stretch_timer,
                ..
            }) if record.day_key == key => (
                record,
                Timers::resume(&settings, run_state, eye_break_timer, stretch_timer),
                Restored::Resumed,
            ),
            _ => (
                DayRecord::new(key),
                Timers::new(&settings, run_state),
                Restored::Fresh,
            ),
        };

        let streak = compute_streak(&ledger, today);
        let tracker = Self {
            settings,
            today: record,
            today_date: today,
            timers,
            ledger,
            streak,
            pending: BTreeSet::new(),
        };
        (tracker, restored)
    }

    pub fn add_water(&mut self, action: WaterAction) {
        self.today.water = match action {
            WaterAction::Add => self.today.water.saturating_add(1),
            WaterAction::Remove => self.today.water.saturating_sub(1),
        };
        self.commit_today();
    }

    /// Credits one completed session. Finishing an eye break or stretch
    /// also restarts its countdown and answers its pending reminder.
    pub fn complete(&mut self, activity: Activity) {
        let counter = match activity {
            Activity::EyeBreak => &mut self.today.eye_breaks,
            Activity::Stretch => &mut self.today.stretches,
            Activity::WakeRoutine => &mut self.today.wake_routines,
            Activity::SleepRoutine => &mut self.today.sleep_routines,
        };
        *counter = counter.saturating_add(1);

        if let Some(reminder) = activity.reminder() {
            self.timers.reset_reminder(reminder);
            self.pending.remove(&reminder);
        }
        self.commit_today();
    }

    /// Records one exercise step of a routine. Does not touch the coarse
    /// counters: an abandoned routine leaves its steps here uncredited.
    pub fn record_detail(&mut self, group: &str, exercise: &str) {
        let count = self
            .today
            .details
            .entry(group.to_string())
            .or_default()
            .entry(exercise.to_string())
            .or_default();
        *count = count.saturating_add(1);
        self.commit_today();
    }

    /// One second of wall time. Countdowns and work time move together.
    pub fn tick(&mut self) -> TickOutcome {
        let outcome = self.timers.tick();
        if outcome.worked {
            self.today.work_time = self.today.work_time.saturating_add(1);
            self.pending.extend(outcome.due.iter().copied());
            self.commit_today();
        }
        outcome
    }

    /// Starts a fresh day when `current` is not the day being tracked.
    /// Yesterday is already in the ledger from its last upsert.
    pub fn check_rollover(&mut self, current: NaiveDate) -> bool {
        let key = day_key(current);
        if key == self.today.day_key {
            return false;
        }

        info!(from = %self.today.day_key, to = %key, "day rolled over");
        self.today = DayRecord::new(key);
        self.today_date = current;
        self.timers.reset();
        self.pending.clear();
        self.commit_today();
        true
    }

    pub fn pause(&mut self) {
        self.timers.run_state = RunState::Paused;
    }

    pub fn resume(&mut self) {
        self.timers.run_state = RunState::Running;
    }

    pub fn dismiss(&mut self, reminder: Reminder) -> bool {
        self.pending.remove(&reminder)
    }

    /// Applies a settings change. A changed interval restarts its countdown.
    pub fn update_settings(&mut self, patch: SettingsPatch) {
        let next = self.settings.apply(patch);
        let run_state = self.timers.run_state;
        let mut timers = Timers::resume(
            &next,
            run_state,
            self.timers.eye.remaining(),
            self.timers.stretch.remaining(),
        );
        if next.eye_break_interval != self.settings.eye_break_interval {
            timers.eye.reset();
        }
        if next.stretch_interval != self.settings.stretch_interval {
            timers.stretch.reset();
        }
        self.timers = timers;
        self.settings = next;
    }

    fn commit_today(&mut self) {
        self.ledger.upsert(self.today.clone());
        self.streak = compute_streak(&self.ledger, self.today_date);
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            settings: self.settings.clone(),
            water_count: self.today.water,
            eye_break_timer: self.timers.eye.remaining(),
            stretch_timer: self.timers.stretch.remaining(),
            is_paused: !self.timers.is_running(),
            today_stats: Some(self.today.clone()),
        }
    }

    pub fn notification_schedule(&self) -> NotificationSchedule {
        NotificationSchedule {
            enabled: self.timers.is_running(),
            eye_seconds_remaining: self.timers.eye.remaining(),
            stretch_seconds_remaining: self.timers.stretch.remaining(),
        }
    }

    pub fn today_view(&self) -> TodayResponse {
        TodayResponse {
            today: self.today.clone(),
            streak: self.streak,
            water_goal: self.settings.water_goal,
            timers: TimersView {
                run_state: self.timers.run_state,
                eye_seconds_remaining: self.timers.eye.remaining(),
                stretch_seconds_remaining: self.timers.stretch.remaining(),
            },
            reminders: self.pending.iter().copied().collect(),
            notifications: self.notification_schedule(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn today(&self) -> &DayRecord {
        &self.today
    }

    /// The calendar day `today` belongs to. Lags the wall clock until the
    /// next rollover check.
    pub fn today_date(&self) -> NaiveDate {
        self.today_date
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn pending_reminders(&self) -> impl Iterator<Item = Reminder> + '_ {
        self.pending.iter().copied()
    }
}
