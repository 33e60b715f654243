//! Drill sessions: shuffle a pool, ask one question at a time, score answers.
//!
//! Two completion signals exist. Quiz-style drills complete when the learner
//! advances past the last shuffled question. Free-form browsing completes once
//! every index of the pool has been visited at least once, in any order.

use crate::shuffle::shuffled;
use crate::types::{Category, FillInBlanksItem, VocabularyItem};
use rand::Rng;
use std::collections::HashSet;

/// Anything with a single correct answer.
pub trait Question {
    fn correct_answer(&self) -> &str;
}

impl Question for FillInBlanksItem {
    fn correct_answer(&self) -> &str {
        &self.blank
    }
}

/// Feedback for the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    Incorrect,
}

impl Feedback {
    /// Exact comparison, no normalization.
    pub fn judge(candidate: &str, correct: &str) -> Self {
        if candidate == correct {
            Self::Correct
        } else {
            Self::Incorrect
        }
    }

    pub fn is_correct(self) -> bool {
        self == Self::Correct
    }
}

/// Whether a drill runs on its own screen or inside a larger flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrillMode {
    /// Restarts with a fresh shuffle after each completed pass.
    Standalone,
    /// Stops after one pass and hands control back to the host flow.
    Embedded,
}

/// Result of moving forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Next,
    /// Pass completed, a new shuffled pass has begun.
    Restarted,
    /// Pass completed and the drill is finished.
    Completed,
}

/// Score of a completed pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrillSummary {
    pub score: usize,
    pub total: usize,
}

/// One run of a shuffle-ask-score-advance drill.
#[derive(Debug, Clone)]
pub struct DrillSession<Q> {
    pool: Vec<Q>,
    size_limit: Option<usize>,
    mode: DrillMode,
    items: Vec<Q>,
    cursor: usize,
    score: usize,
    feedback: Option<Feedback>,
    finished: bool,
}

impl<Q: Question + Clone> DrillSession<Q> {
    /// Shuffle the pool, optionally truncated. `None` when there is nothing
    /// to ask.
    pub fn start<R: Rng + ?Sized>(
        pool: Vec<Q>,
        size_limit: Option<usize>,
        mode: DrillMode,
        rng: &mut R,
    ) -> Option<Self> {
        let items = Self::deal(&pool, size_limit, rng);
        if items.is_empty() {
            return None;
        }
        Some(Self {
            pool,
            size_limit,
            mode,
            items,
            cursor: 0,
            score: 0,
            feedback: None,
            finished: false,
        })
    }

    fn deal<R: Rng + ?Sized>(pool: &[Q], size_limit: Option<usize>, rng: &mut R) -> Vec<Q> {
        let mut items = shuffled(pool, rng);
        if let Some(limit) = size_limit {
            items.truncate(limit);
        }
        items
    }

    /// Current question, `None` after an embedded drill has finished.
    pub fn current(&self) -> Option<&Q> {
        if self.finished {
            return None;
        }
        self.items.get(self.cursor)
    }

    pub fn items(&self) -> &[Q] {
        &self.items
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn feedback(&self) -> Option<Feedback> {
        self.feedback
    }

    pub fn mode(&self) -> DrillMode {
        self.mode
    }

    pub fn is_last(&self) -> bool {
        self.cursor + 1 == self.items.len()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Judge an answer for the current question.
    ///
    /// Only the first submission per question counts; later calls return the
    /// recorded feedback and change nothing. Returns `None` once finished.
    pub fn submit(&mut self, candidate: &str) -> Option<Feedback> {
        if let Some(existing) = self.feedback {
            return Some(existing);
        }
        let question = self.current()?;
        let feedback = Feedback::judge(candidate, question.correct_answer());
        if feedback.is_correct() {
            self.score += 1;
        }
        self.feedback = Some(feedback);
        Some(feedback)
    }

    /// Move to the next question. On the last question the pass completes:
    /// `on_complete` runs once with the pass score, then a standalone drill
    /// reshuffles while an embedded one stays finished.
    pub fn advance<R, F>(&mut self, rng: &mut R, on_complete: F) -> Advance
    where
        R: Rng + ?Sized,
        F: FnOnce(&DrillSummary),
    {
        if self.finished {
            return Advance::Completed;
        }
        if !self.is_last() {
            self.feedback = None;
            self.cursor += 1;
            return Advance::Next;
        }

        let summary = DrillSummary {
            score: self.score,
            total: self.items.len(),
        };
        tracing::debug!(score = summary.score, total = summary.total, "drill pass complete");
        on_complete(&summary);

        match self.mode {
            DrillMode::Standalone => {
                self.reshuffle(rng);
                Advance::Restarted
            }
            DrillMode::Embedded => {
                self.finished = true;
                Advance::Completed
            }
        }
    }

    /// Start a new pass over the same pool.
    pub fn reshuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.items = Self::deal(&self.pool, self.size_limit, rng);
        self.cursor = 0;
        self.score = 0;
        self.feedback = None;
        self.finished = false;
    }
}

/// Tracks distinct visited indices for free-form browsing.
#[derive(Debug, Clone, Default)]
pub struct VisitTracker {
    visited: HashSet<usize>,
    pool_size: usize,
    practiced: bool,
}

impl VisitTracker {
    pub fn new(pool_size: usize) -> Self {
        Self {
            visited: HashSet::new(),
            pool_size,
            practiced: false,
        }
    }

    /// Record a visit. Returns true exactly once: on the visit that covers the
    /// last unseen index. Out-of-range indices are ignored.
    pub fn visit(&mut self, index: usize) -> bool {
        if index >= self.pool_size {
            return false;
        }
        self.visited.insert(index);
        if !self.practiced && self.visited.len() == self.pool_size {
            self.practiced = true;
            return true;
        }
        false
    }

    pub fn visited(&self) -> usize {
        self.visited.len()
    }

    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    pub fn is_practiced(&self) -> bool {
        self.practiced
    }

    pub fn reset(&mut self, pool_size: usize) {
        *self = Self::new(pool_size);
    }
}

/// Words of one category, or the whole pool for `None`.
pub fn filter_by_category(pool: &[VocabularyItem], category: Option<Category>) -> Vec<VocabularyItem> {
    match category {
        None => pool.to_vec(),
        Some(category) => pool
            .iter()
            .filter(|w| w.category == category)
            .cloned()
            .collect(),
    }
}

/// Flashcard browser: circular navigation over a shuffled deck with
/// visited-set completion.
#[derive(Debug, Clone)]
pub struct FlashcardDeck {
    source: Vec<VocabularyItem>,
    cards: Vec<VocabularyItem>,
    index: usize,
    flipped: bool,
    visits: VisitTracker,
}

impl FlashcardDeck {
    /// Shuffle the cards and show the first one. The first card counts as
    /// visited, so a one-card deck is practiced immediately.
    pub fn start<R, F>(cards: Vec<VocabularyItem>, rng: &mut R, on_practiced: F) -> Option<Self>
    where
        R: Rng + ?Sized,
        F: FnOnce(),
    {
        if cards.is_empty() {
            return None;
        }
        let mut deck = Self {
            cards: shuffled(&cards, rng),
            visits: VisitTracker::new(cards.len()),
            source: cards,
            index: 0,
            flipped: false,
        };
        deck.land(on_practiced);
        Some(deck)
    }

    fn land<F: FnOnce()>(&mut self, on_practiced: F) {
        if self.visits.visit(self.index) {
            tracing::debug!(cards = self.cards.len(), "flashcard deck fully browsed");
            on_practiced();
        }
    }

    pub fn current(&self) -> &VocabularyItem {
        &self.cards[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn flip(&mut self) {
        self.flipped = !self.flipped;
    }

    pub fn visits(&self) -> &VisitTracker {
        &self.visits
    }

    pub fn next<F: FnOnce()>(&mut self, on_practiced: F) {
        self.flipped = false;
        self.index = (self.index + 1) % self.cards.len();
        self.land(on_practiced);
    }

    pub fn prev<F: FnOnce()>(&mut self, on_practiced: F) {
        self.flipped = false;
        self.index = (self.index + self.cards.len() - 1) % self.cards.len();
        self.land(on_practiced);
    }

    /// New order, visited set cleared.
    pub fn reshuffle<R, F>(&mut self, rng: &mut R, on_practiced: F)
    where
        R: Rng + ?Sized,
        F: FnOnce(),
    {
        self.cards = shuffled(&self.source, rng);
        self.index = 0;
        self.flipped = false;
        self.visits.reset(self.cards.len());
        self.land(on_practiced);
    }
}

/// Multiple-choice prompt: show the Turkish, pick the English.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FishingQuestion {
    pub prompt: String,
    pub answer: String,
    pub options: Vec<String>,
}

impl Question for FishingQuestion {
    fn correct_answer(&self) -> &str {
        &self.answer
    }
}

/// Up to `distractors` other words from `pool` plus the correct one, shuffled.
pub fn multiple_choice<R: Rng + ?Sized>(
    pool: &[VocabularyItem],
    correct: &VocabularyItem,
    distractors: usize,
    rng: &mut R,
) -> Vec<String> {
    let mut seen = HashSet::new();
    seen.insert(correct.english.as_str());
    let others: Vec<&str> = pool
        .iter()
        .map(|w| w.english.as_str())
        .filter(|english| seen.insert(*english))
        .collect();

    let mut options: Vec<String> = shuffled(&others, rng)
        .into_iter()
        .take(distractors)
        .map(str::to_string)
        .collect();
    options.push(correct.english.clone());
    crate::shuffle::shuffle(&mut options, rng);
    options
}

/// Word fishing: endless multiple-choice over a category, wrapping around.
#[derive(Debug, Clone)]
pub struct FishingGame {
    pool: Vec<VocabularyItem>,
    order: Vec<VocabularyItem>,
    index: usize,
    question: FishingQuestion,
    feedback: Option<Feedback>,
    score: u32,
    correct_count: usize,
}

impl FishingGame {
    pub const DISTRACTORS: usize = 3;
    pub const POINTS_PER_CATCH: u32 = 10;
    /// Correct catches that count as a day's practice.
    pub const PRACTICE_GOAL: usize = 5;

    /// Distractors are drawn from the whole pool, questions from the category.
    pub fn start<R: Rng + ?Sized>(
        pool: Vec<VocabularyItem>,
        category: Option<Category>,
        rng: &mut R,
    ) -> Option<Self> {
        let order = shuffled(&filter_by_category(&pool, category), rng);
        let first = order.first()?;
        let question = Self::ask(&pool, first, rng);
        Some(Self {
            pool,
            order,
            index: 0,
            question,
            feedback: None,
            score: 0,
            correct_count: 0,
        })
    }

    fn ask<R: Rng + ?Sized>(pool: &[VocabularyItem], word: &VocabularyItem, rng: &mut R) -> FishingQuestion {
        FishingQuestion {
            prompt: word.turkish.clone(),
            answer: word.english.clone(),
            options: multiple_choice(pool, word, Self::DISTRACTORS, rng),
        }
    }

    pub fn question(&self) -> &FishingQuestion {
        &self.question
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn feedback(&self) -> Option<Feedback> {
        self.feedback
    }

    /// First answer per question counts. `on_practiced` runs on the catch that
    /// reaches the practice goal.
    pub fn answer<F: FnOnce()>(&mut self, choice: &str, on_practiced: F) -> Feedback {
        if let Some(existing) = self.feedback {
            return existing;
        }
        let feedback = Feedback::judge(choice, &self.question.answer);
        if feedback.is_correct() {
            self.score += Self::POINTS_PER_CATCH;
            self.correct_count += 1;
            if self.correct_count == Self::PRACTICE_GOAL {
                on_practiced();
            }
        }
        self.feedback = Some(feedback);
        feedback
    }

    /// Next word, wrapping to the start of the shuffled order.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.index = (self.index + 1) % self.order.len();
        self.question = Self::ask(&self.pool, &self.order[self.index], rng);
        self.feedback = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::cell::Cell;

    fn blank(word: &str) -> FillInBlanksItem {
        FillInBlanksItem {
            sentence: format!("The ___ is {word}."),
            turkish: String::new(),
            blank: word.into(),
            options: vec![word.into(), "other".into()],
        }
    }

    fn words(n: usize) -> Vec<VocabularyItem> {
        (0..n)
            .map(|i| VocabularyItem::new(format!("word{i}"), format!("kelime{i}"), Category::Marine))
            .collect()
    }

    #[test]
    fn empty_pool_does_not_start() {
        let mut rng = StdRng::seed_from_u64(1);
        let session = DrillSession::<FillInBlanksItem>::start(vec![], None, DrillMode::Standalone, &mut rng);
        assert!(session.is_none());
        assert!(FlashcardDeck::start(vec![], &mut rng, || {}).is_none());
        assert!(FishingGame::start(words(3), Some(Category::Business), &mut rng).is_none());
    }

    #[test]
    fn size_limit_truncates() {
        let mut rng = StdRng::seed_from_u64(2);
        let pool: Vec<_> = ["a", "b", "c", "d"].into_iter().map(blank).collect();
        let session = DrillSession::start(pool, Some(2), DrillMode::Standalone, &mut rng).unwrap();
        assert_eq!(session.total(), 2);
    }

    #[test]
    fn submit_is_idempotent() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut session =
            DrillSession::start(vec![blank("anchor")], None, DrillMode::Standalone, &mut rng).unwrap();

        assert_eq!(session.submit("anchor"), Some(Feedback::Correct));
        assert_eq!(session.submit("wrong"), Some(Feedback::Correct));
        assert_eq!(session.submit("anchor"), Some(Feedback::Correct));
        assert_eq!(session.score(), 1);

        let mut session =
            DrillSession::start(vec![blank("anchor")], None, DrillMode::Standalone, &mut rng).unwrap();
        assert_eq!(session.submit("Anchor"), Some(Feedback::Incorrect));
        assert_eq!(session.submit("anchor"), Some(Feedback::Incorrect));
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn standalone_completes_once_then_reshuffles() {
        let mut rng = StdRng::seed_from_u64(4);
        let pool: Vec<_> = ["a", "b", "c"].into_iter().map(blank).collect();
        let mut session = DrillSession::start(pool, None, DrillMode::Standalone, &mut rng).unwrap();
        let completions = Cell::new(0);

        for step in 0..3 {
            let answer = session.current().unwrap().blank.clone();
            session.submit(&answer);
            let outcome = session.advance(&mut rng, |summary| {
                assert_eq!(*summary, DrillSummary { score: 3, total: 3 });
                completions.set(completions.get() + 1);
            });
            let expected = if step < 2 { Advance::Next } else { Advance::Restarted };
            assert_eq!(outcome, expected);
        }
        assert_eq!(completions.get(), 1);
        assert_eq!(session.position(), 0);
        assert_eq!(session.score(), 0);
        assert_eq!(session.feedback(), None);
    }

    #[test]
    fn embedded_stays_finished() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut session =
            DrillSession::start(vec![blank("mast")], None, DrillMode::Embedded, &mut rng).unwrap();
        let completions = Cell::new(0);

        assert_eq!(
            session.advance(&mut rng, |_| completions.set(completions.get() + 1)),
            Advance::Completed
        );
        assert_eq!(
            session.advance(&mut rng, |_| completions.set(completions.get() + 1)),
            Advance::Completed
        );
        assert_eq!(completions.get(), 1);
        assert!(session.current().is_none());
        assert_eq!(session.submit("mast"), None);
    }

    #[test]
    fn nine_word_browse_marks_practiced_once() {
        let mut tracker = VisitTracker::new(9);
        let mut fired = 0;
        for index in [0, 3, 3, 1, 0, 8, 2, 4, 4, 5, 7, 1] {
            if tracker.visit(index) {
                fired += 1;
            }
        }
        assert_eq!(fired, 0);
        assert_eq!(tracker.visited(), 8);

        assert!(tracker.visit(6));
        fired += 1;
        for index in 0..9 {
            if tracker.visit(index) {
                fired += 1;
            }
        }
        assert_eq!(fired, 1);
        assert!(tracker.is_practiced());
        assert!(!tracker.visit(42));
    }

    #[test]
    fn deck_navigation_wraps_and_completes_once() {
        let mut rng = StdRng::seed_from_u64(6);
        let fired = Cell::new(0);
        let bump = || fired.set(fired.get() + 1);
        let mut deck = FlashcardDeck::start(words(9), &mut rng, bump).unwrap();

        deck.prev(bump);
        assert_eq!(deck.index(), 8);
        deck.next(bump);
        assert_eq!(deck.index(), 0);
        deck.flip();
        for _ in 0..7 {
            deck.prev(bump);
        }
        assert!(!deck.is_flipped());
        assert_eq!(fired.get(), 0);

        deck.prev(bump);
        assert_eq!(fired.get(), 1);
        for _ in 0..20 {
            deck.next(bump);
        }
        assert_eq!(fired.get(), 1);

        deck.reshuffle(&mut rng, bump);
        assert_eq!(deck.visits().visited(), 1);
        assert!(!deck.visits().is_practiced());
    }

    #[test]
    fn single_card_deck_is_practiced_on_start() {
        let mut rng = StdRng::seed_from_u64(7);
        let fired = Cell::new(false);
        FlashcardDeck::start(words(1), &mut rng, || fired.set(true)).unwrap();
        assert!(fired.get());
    }

    #[test]
    fn multiple_choice_contains_answer_and_distinct_distractors() {
        let mut rng = StdRng::seed_from_u64(8);
        let pool = words(6);
        let options = multiple_choice(&pool, &pool[2], 3, &mut rng);
        assert_eq!(options.len(), 4);
        assert!(options.contains(&"word2".to_string()));
        let distinct: HashSet<_> = options.iter().collect();
        assert_eq!(distinct.len(), 4);

        let tiny = multiple_choice(&pool[..2], &pool[0], 3, &mut rng);
        assert_eq!(tiny.len(), 2);
    }

    #[test]
    fn category_filter() {
        let mut pool = words(2);
        pool.push(VocabularyItem::new("Lens", "Lens", Category::Eyewear));
        assert_eq!(filter_by_category(&pool, Some(Category::Eyewear)).len(), 1);
        assert_eq!(filter_by_category(&pool, None).len(), 3);
    }

    #[test]
    fn fishing_practiced_after_five_catches() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut game = FishingGame::start(words(4), None, &mut rng).unwrap();
        let fired = Cell::new(0);

        for _ in 0..7 {
            let answer = game.question().answer.clone();
            assert_eq!(
                game.answer(&answer, || fired.set(fired.get() + 1)),
                Feedback::Correct
            );
            game.answer("nope", || fired.set(fired.get() + 1));
            game.advance(&mut rng);
        }
        assert_eq!(game.score(), 70);
        assert_eq!(fired.get(), 1);
    }
}
