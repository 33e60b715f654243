//! Conversation practice wired to progress tracking.

use chrono::{NaiveDate, Utc};
use lingo_core::{send_message, ChatError, ChatSession, KeyValueStore, LanguageModel, ProgressTracker};

/// Sends chat turns through a language model and marks the day practiced
/// once a session reaches its goal.
#[derive(Debug, Clone)]
pub struct ConversationService<M, S> {
    model: M,
    progress: ProgressTracker<S>,
}

impl<M, S> ConversationService<M, S>
where
    M: LanguageModel,
    S: KeyValueStore,
{
    pub fn new(model: M, progress: ProgressTracker<S>) -> Self {
        Self { model, progress }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub async fn send(&self, session: &mut ChatSession, input: &str) -> Result<String, ChatError> {
        self.send_on(session, input, Utc::now().date_naive()).await
    }

    /// Same as [`Self::send`] with an explicit calendar day.
    pub async fn send_on(
        &self,
        session: &mut ChatSession,
        input: &str,
        today: NaiveDate,
    ) -> Result<String, ChatError> {
        send_message(session, &self.model, input, || {
            self.progress.mark_day_practiced(today);
        })
        .await
    }

    /// Turkish rendering of an English sentence.
    pub async fn explain(&self, text: &str) -> Result<String, ChatError> {
        self.model.translate(text).await.map_err(|e| {
            tracing::warn!(error = %e, "translation failed");
            e
        })
    }
}
