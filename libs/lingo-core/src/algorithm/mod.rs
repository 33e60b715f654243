//! Spaced repetition algorithm implementations.

pub mod sm2;

use crate::types::{Difficulty, ReviewItem, VocabularyItem};
use chrono::{DateTime, Utc};

/// Result of scheduling an item after review.
#[derive(Debug, Clone)]
pub struct SchedulingResult {
    pub item: ReviewItem,
    pub next_review: DateTime<Utc>,
}

/// Trait for spaced repetition algorithms.
pub trait ReviewAlgorithm: Send + Sync {
    /// Algorithm identifier.
    fn name(&self) -> &'static str;

    /// Calculate the next review state after an answer.
    fn schedule(&self, item: &ReviewItem, performance: Difficulty, now: DateTime<Utc>)
        -> SchedulingResult;

    /// Initial record for a word seen for the first time. Eligible immediately.
    fn initial_item(&self, word: &VocabularyItem, now: DateTime<Utc>) -> ReviewItem;
}
