//! Daily practice log, streaks and aggregate progress.

use crate::events::{EventBus, ProgressEvent};
use crate::storage::{keys, load_json, save_json, KeyValueStore};
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kind of progress being credited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressKind {
    Lesson,
    Words,
}

/// Map from `YYYY-MM-DD` to "practiced".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DailyLog(BTreeMap<String, bool>);

impl DailyLog {
    pub fn date_key(date: NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    pub fn is_practiced(&self, date: NaiveDate) -> bool {
        self.0.get(&Self::date_key(date)).copied().unwrap_or(false)
    }

    /// Mark a day. Returns false if it was already marked.
    pub fn mark(&mut self, date: NaiveDate) -> bool {
        let key = Self::date_key(date);
        if self.0.get(&key).copied().unwrap_or(false) {
            return false;
        }
        self.0.insert(key, true);
        true
    }

    /// Consecutive practiced days ending at `today`.
    pub fn streak(&self, today: NaiveDate) -> u32 {
        let mut streak = 0;
        let mut day = today;
        while self.is_practiced(day) {
            streak += 1;
            day -= Duration::days(1);
        }
        streak
    }

    /// Practiced days within the given month.
    pub fn practiced_in_month(&self, year: i32, month: u32) -> Vec<NaiveDate> {
        self.0
            .iter()
            .filter(|(_, practiced)| **practiced)
            .filter_map(|(key, _)| NaiveDate::parse_from_str(key, "%Y-%m-%d").ok())
            .filter(|date| date.year() == year && date.month() == month)
            .collect()
    }
}

/// Aggregate learner progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressStats {
    pub words_learned: u32,
    pub lessons_completed: u32,
    pub streak_days: u32,
    pub weekly_goal: u32,
    pub weekly_progress: u32,
    pub level: u32,
    pub xp: u32,
    pub next_level_xp: u32,
}

impl Default for ProgressStats {
    fn default() -> Self {
        Self {
            words_learned: 0,
            lessons_completed: 0,
            streak_days: 0,
            weekly_goal: 3,
            weekly_progress: 0,
            level: 1,
            xp: 0,
            next_level_xp: 100,
        }
    }
}

const XP_PER_LESSON: u32 = 50;
const XP_PER_WORD: u32 = 5;

impl ProgressStats {
    /// Credit progress and apply level-ups. Returns the number of levels gained.
    pub fn record(&mut self, kind: ProgressKind, amount: u32) -> u32 {
        match kind {
            ProgressKind::Lesson => {
                self.lessons_completed = self.lessons_completed.saturating_add(amount);
                self.xp = self.xp.saturating_add(XP_PER_LESSON);
                self.weekly_progress = self.weekly_progress.saturating_add(1);
            }
            ProgressKind::Words => {
                self.words_learned = self.words_learned.saturating_add(amount);
                self.xp = self.xp.saturating_add(amount.saturating_mul(XP_PER_WORD));
            }
        }

        let mut gained = 0;
        // A zero threshold from a corrupt record would loop forever.
        self.next_level_xp = self.next_level_xp.max(1);
        while self.xp >= self.next_level_xp {
            self.xp -= self.next_level_xp;
            self.level += 1;
            self.next_level_xp = (self.next_level_xp as f64 * 1.5).floor() as u32;
            gained += 1;
        }
        gained
    }

    pub fn level_title(&self) -> &'static str {
        match self.level {
            0..=5 => "Cabin Boy",
            6..=10 => "Sailor",
            11..=20 => "Navigator",
            _ => "Captain",
        }
    }

    pub fn xp_percentage(&self) -> f64 {
        if self.next_level_xp == 0 {
            return 0.0;
        }
        self.xp as f64 / self.next_level_xp as f64 * 100.0
    }

    pub fn weekly_percentage(&self) -> f64 {
        if self.weekly_goal == 0 {
            return 100.0;
        }
        (self.weekly_progress as f64 / self.weekly_goal as f64 * 100.0).min(100.0)
    }

    /// Every fifth completed lesson is celebrated.
    pub fn is_milestone(&self) -> bool {
        self.lessons_completed > 0 && self.lessons_completed % 5 == 0
    }
}

/// Outcome of crediting progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub stats: ProgressStats,
    pub levels_gained: u32,
    pub milestone: bool,
}

/// Reads and writes progress through the storage port and announces changes.
#[derive(Debug, Clone)]
pub struct ProgressTracker<S> {
    store: S,
    events: EventBus,
    weekly_goal: Option<u32>,
}

impl<S: KeyValueStore> ProgressTracker<S> {
    pub fn new(store: S, events: EventBus) -> Self {
        Self {
            store,
            events,
            weekly_goal: None,
        }
    }

    /// Use the configured weekly lesson goal instead of the stored one.
    pub fn with_weekly_goal(mut self, goal: u32) -> Self {
        self.weekly_goal = Some(goal.max(1));
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn daily_log(&self) -> DailyLog {
        load_json(&self.store, keys::DAILY_LOG)
    }

    /// Record today as practiced. Only the first call per day writes and
    /// notifies; later calls return false.
    pub fn mark_day_practiced(&self, today: NaiveDate) -> bool {
        let mut log = self.daily_log();
        if !log.mark(today) {
            return false;
        }
        if let Err(e) = save_json(&self.store, keys::DAILY_LOG, &log) {
            tracing::warn!(error = %e, "failed to update daily practice log");
            return false;
        }
        tracing::info!(date = %today, "day marked as practiced");
        self.events.emit(&ProgressEvent::bare());
        true
    }

    /// Stored stats merged over defaults, with the streak recomputed and the
    /// configured weekly goal applied.
    pub fn stats(&self, today: NaiveDate) -> ProgressStats {
        let mut stats: ProgressStats = load_json(&self.store, keys::PROGRESS);
        stats.streak_days = self.daily_log().streak(today);
        if let Some(goal) = self.weekly_goal {
            stats.weekly_goal = goal;
        }
        stats
    }

    /// Credit progress, persist it and notify listeners.
    pub fn record(&self, kind: ProgressKind, amount: u32, today: NaiveDate) -> ProgressUpdate {
        let mut stats = self.stats(today);
        let levels_gained = stats.record(kind, amount);
        if let Err(e) = save_json(&self.store, keys::PROGRESS, &stats) {
            tracing::warn!(error = %e, "failed to save progress stats");
        }
        if levels_gained > 0 {
            tracing::info!(level = stats.level, "level up");
        }
        self.events.emit(&ProgressEvent::with_detail(kind, amount));

        ProgressUpdate {
            milestone: kind == ProgressKind::Lesson && stats.is_milestone(),
            stats,
            levels_gained,
        }
    }
}
