//! Simplified SM-2 scheduler.
//!
//! SuperMemo 2 without the ease factor: a failed recall restarts the curve,
//! otherwise the interval grows by a fixed multiplier per difficulty bucket.

use super::{ReviewAlgorithm, SchedulingResult};
use crate::types::{Difficulty, PracticeSettings, ReviewItem, VocabularyItem, MAX_INTERVAL_DAYS};
use chrono::{DateTime, Duration, Utc};

/// Simplified SM-2 with configurable multipliers.
#[derive(Debug, Clone)]
pub struct Sm2 {
    pub medium_multiplier: f64,
    pub easy_multiplier: f64,
    pub max_interval_days: u32,
}

impl Default for Sm2 {
    fn default() -> Self {
        Self {
            medium_multiplier: 1.3,
            easy_multiplier: 2.5,
            max_interval_days: MAX_INTERVAL_DAYS,
        }
    }
}

impl Sm2 {
    pub fn from_settings(settings: &PracticeSettings) -> Self {
        Self {
            max_interval_days: settings.max_interval_days.clamp(1, MAX_INTERVAL_DAYS),
            ..Self::default()
        }
    }

    /// Next interval in days for the given answer.
    pub fn next_interval(&self, interval: u32, performance: Difficulty) -> u32 {
        let max = self.max_interval_days.clamp(1, MAX_INTERVAL_DAYS);
        let current = interval.clamp(1, max) as f64;
        let next = match performance {
            Difficulty::Hard => 1.0,
            Difficulty::Medium => (current * self.medium_multiplier).ceil().max(1.0),
            Difficulty::Easy => (current * self.easy_multiplier).ceil().max(1.0),
        };
        (next as u32).min(max)
    }
}

impl ReviewAlgorithm for Sm2 {
    fn name(&self) -> &'static str {
        "sm2"
    }

    fn initial_item(&self, word: &VocabularyItem, now: DateTime<Utc>) -> ReviewItem {
        ReviewItem {
            id: word.english.clone(),
            english: word.english.clone(),
            turkish: word.turkish.clone(),
            category: word.category,
            difficulty: Difficulty::Medium,
            next_review: now,
            interval: 1,
            repetitions: 0,
        }
    }

    fn schedule(
        &self,
        item: &ReviewItem,
        performance: Difficulty,
        now: DateTime<Utc>,
    ) -> SchedulingResult {
        let interval = self.next_interval(item.interval, performance);
        let repetitions = match performance {
            Difficulty::Hard => 0,
            Difficulty::Medium | Difficulty::Easy => item.repetitions.saturating_add(1),
        };
        let next_review = now + Duration::days(i64::from(interval));

        SchedulingResult {
            item: ReviewItem {
                difficulty: performance,
                next_review,
                interval,
                repetitions,
                ..item.clone()
            },
            next_review,
        }
    }
}
