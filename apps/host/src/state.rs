//! Application state.

use crate::conversation::ConversationService;
use crate::error::Result;
use crate::gemini::GeminiClient;
use crate::store::SqliteStore;
use chrono::{NaiveDate, Utc};
use lingo_core::algorithm::sm2::Sm2;
use lingo_core::progress::ProgressUpdate;
use lingo_core::speech::{PronunciationSession, SpeechCapture};
use lingo_core::storage::{load_settings, save_settings};
use lingo_core::{
    ChatSession, DailyLesson, Difficulty, EventBus, PracticeOverrides, PracticeSettings,
    ProgressKind, ProgressTracker, ReviewItem, ReviewRun, VocabularyItem,
};
use rand::Rng;
use std::sync::Arc;

/// Shared state for one learner.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<SqliteStore>,
    pub events: EventBus,
    pub settings: PracticeSettings,
    pub model: Option<GeminiClient>,
}

impl AppState {
    pub fn new(store: SqliteStore, model: Option<GeminiClient>) -> Self {
        let settings = load_settings(&store);
        Self {
            store: Arc::new(store),
            events: EventBus::new(),
            settings,
            model,
        }
    }

    /// In-memory state without a language model (for testing).
    pub fn in_memory() -> Result<Self> {
        Ok(Self::new(SqliteStore::open_in_memory()?, None))
    }

    pub fn progress(&self) -> ProgressTracker<Arc<SqliteStore>> {
        ProgressTracker::new(self.store.clone(), self.events.clone())
            .with_weekly_goal(self.settings.weekly_goal)
    }

    /// Practice-log day. Days roll over at UTC midnight.
    pub fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    pub fn scheduler(&self) -> Sm2 {
        Sm2::from_settings(&self.settings)
    }

    /// Persist new overrides and apply them.
    pub fn update_settings(&mut self, overrides: &PracticeOverrides) -> Result<()> {
        save_settings(self.store.as_ref(), overrides)?;
        self.settings = PracticeSettings::merge(&PracticeSettings::default(), overrides);
        tracing::info!(?overrides, "practice settings updated");
        Ok(())
    }

    pub fn start_review<R: Rng + ?Sized>(&self, pool: &[VocabularyItem], rng: &mut R) -> ReviewRun {
        ReviewRun::start(
            self.store.as_ref(),
            pool,
            &self.scheduler(),
            &self.settings,
            Utc::now(),
            rng,
        )
    }

    /// Answer the current review item. When the run completes, recalled words
    /// are credited to progress.
    pub fn answer_review(&self, run: &mut ReviewRun, performance: Difficulty) -> Option<ReviewItem> {
        let updated = run.answer(self.store.as_ref(), &self.scheduler(), performance, Utc::now())?;
        if run.is_complete() && run.correct() > 0 {
            let words = u32::try_from(run.correct()).unwrap_or(u32::MAX);
            self.progress().record(ProgressKind::Words, words, Self::today());
        }
        Some(updated)
    }

    /// Wrap up a daily lesson: marks the day and credits the lesson.
    pub fn finish_lesson(&self, lesson: &mut DailyLesson) -> Option<ProgressUpdate> {
        let today = Self::today();
        let progress = self.progress();
        let mut update = None;
        lesson.finish(|| {
            progress.mark_day_practiced(today);
            update = Some(progress.record(ProgressKind::Lesson, 1, today));
        });
        update
    }

    pub fn chat_session(&self) -> ChatSession {
        ChatSession::new(self.settings.conversation_goal)
    }

    pub fn pronunciation_session<C: SpeechCapture>(&self, capture: C) -> PronunciationSession<C> {
        PronunciationSession::new(capture, self.settings.pronunciation_goal)
    }

    /// Conversation practice, if a model is configured.
    pub fn conversation(&self) -> Option<ConversationService<GeminiClient, Arc<SqliteStore>>> {
        let model = self.model.clone()?;
        Some(ConversationService::new(model, self.progress()))
    }
}
