//! Review sessions: merging persisted records with the vocabulary pool,
//! picking the session set and recording answers.

use crate::algorithm::ReviewAlgorithm;
use crate::storage::{load_review_items, upsert_review_item, KeyValueStore};
use crate::types::{Difficulty, PracticeSettings, ReviewItem, VocabularyItem, MAX_SESSION_SIZE};
use chrono::{DateTime, Utc};
use rand::Rng;
use std::collections::{HashSet, VecDeque};

/// Bring persisted records in line with the current pool.
///
/// Records whose word left the pool are dropped, words without a record get a
/// fresh one that is due immediately. Persisted order is kept, new records are
/// appended in pool order.
pub fn merge_records(
    pool: &[VocabularyItem],
    persisted: Vec<ReviewItem>,
    algorithm: &dyn ReviewAlgorithm,
    now: DateTime<Utc>,
) -> Vec<ReviewItem> {
    let in_pool: HashSet<&str> = pool.iter().map(|w| w.english.as_str()).collect();

    let mut records: Vec<ReviewItem> = persisted
        .into_iter()
        .filter(|r| in_pool.contains(r.english.as_str()))
        .collect();

    let mut known: HashSet<String> = records.iter().map(|r| r.english.clone()).collect();
    for word in pool {
        if known.insert(word.english.clone()) {
            records.push(algorithm.initial_item(word, now));
        }
    }

    records
}

/// Choose the items for one session.
///
/// Due items come first, followed by a random sample of the not-yet-due ones
/// (each included with `variety_probability`). The result is capped at
/// `min(review_session_cap, pool_size)`, and never above [`MAX_SESSION_SIZE`].
pub fn select_session<R: Rng + ?Sized>(
    records: &[ReviewItem],
    pool_size: usize,
    settings: &PracticeSettings,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<ReviewItem> {
    let limit = settings.review_session_cap.min(MAX_SESSION_SIZE).min(pool_size);
    if limit == 0 {
        return Vec::new();
    }

    let (due, later): (Vec<&ReviewItem>, Vec<&ReviewItem>) =
        records.iter().partition(|r| r.is_due(now));

    let probability = if settings.variety_probability.is_nan() {
        0.0
    } else {
        settings.variety_probability.clamp(0.0, 1.0)
    };
    let variety = later.into_iter().filter(|_| rng.gen_bool(probability));

    due.into_iter()
        .chain(variety)
        .take(limit)
        .cloned()
        .collect()
}

/// Schedule an answer and persist the updated record.
///
/// Storage failures are logged; the updated record is returned either way.
pub fn record_answer<S: KeyValueStore + ?Sized>(
    store: &S,
    algorithm: &dyn ReviewAlgorithm,
    item: &ReviewItem,
    performance: Difficulty,
    now: DateTime<Utc>,
) -> ReviewItem {
    let result = algorithm.schedule(item, performance, now);
    tracing::debug!(
        word = %item.english,
        ?performance,
        interval = result.item.interval,
        "review recorded"
    );
    if let Err(e) = upsert_review_item(store, &result.item) {
        tracing::warn!(word = %item.english, error = %e, "failed to persist review");
    }
    result.item
}

/// One pass through a selected review set.
#[derive(Debug, Clone)]
pub struct ReviewRun {
    remaining: VecDeque<ReviewItem>,
    correct: usize,
    total: usize,
}

impl ReviewRun {
    /// Merge the pool with persisted records and select today's items.
    pub fn start<S, R>(
        store: &S,
        pool: &[VocabularyItem],
        algorithm: &dyn ReviewAlgorithm,
        settings: &PracticeSettings,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Self
    where
        S: KeyValueStore + ?Sized,
        R: Rng + ?Sized,
    {
        let records = merge_records(pool, load_review_items(store), algorithm, now);
        let selected = select_session(&records, pool.len(), settings, now, rng);
        Self::from_items(selected)
    }

    pub fn from_items(items: Vec<ReviewItem>) -> Self {
        Self {
            remaining: items.into(),
            correct: 0,
            total: 0,
        }
    }

    pub fn current(&self) -> Option<&ReviewItem> {
        self.remaining.front()
    }

    /// Items left including the current one.
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_complete(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Answer the current item and move on. Returns the updated record, or
    /// `None` once the run is complete.
    pub fn answer<S: KeyValueStore + ?Sized>(
        &mut self,
        store: &S,
        algorithm: &dyn ReviewAlgorithm,
        performance: Difficulty,
        now: DateTime<Utc>,
    ) -> Option<ReviewItem> {
        let item = self.remaining.pop_front()?;
        let updated = record_answer(store, algorithm, &item, performance, now);
        self.total += 1;
        if performance.is_recalled() {
            self.correct += 1;
        }
        Some(updated)
    }

    pub fn correct(&self) -> usize {
        self.correct
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Rounded accuracy percentage, 0 when nothing was answered.
    pub fn accuracy(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.correct as f64 / self.total as f64) * 100.0).round() as u32
    }
}
