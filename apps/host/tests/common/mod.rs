//! Shared helpers for host integration tests.
//!
//! Everything runs against an in-memory SQLite store and a scripted language
//! model, so no network or API key is needed.

#![allow(dead_code)]

pub mod fixtures;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use lingo_core::{ChatError, ChatMessage, EventBus, LanguageModel, ProgressTracker};
use lingo_host::{ConversationService, SqliteStore};

/// Language model that plays back queued replies and records every history
/// it was sent.
#[derive(Debug, Default)]
pub struct FakeModel {
    replies: Mutex<VecDeque<Result<String, ChatError>>>,
    pub histories: Mutex<Vec<Vec<ChatMessage>>>,
}

impl FakeModel {
    pub fn with_replies<I>(replies: I) -> Self
    where
        I: IntoIterator<Item = Result<String, ChatError>>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            histories: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<Vec<ChatMessage>> {
        self.histories.lock().unwrap().clone()
    }

    fn next_reply(&self) -> Result<String, ChatError> {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ChatError::Service("no scripted reply".into())))
    }
}

impl LanguageModel for FakeModel {
    async fn translate(&self, text: &str) -> Result<String, ChatError> {
        Ok(format!("tr: {text}"))
    }

    async fn chat(&self, history: &[ChatMessage]) -> Result<String, ChatError> {
        self.histories.lock().unwrap().push(history.to_vec());
        self.next_reply()
    }
}

/// In-memory store plus a conversation service over a scripted model.
pub struct TestContext {
    pub store: Arc<SqliteStore>,
    pub events: EventBus,
    pub service: ConversationService<FakeModel, Arc<SqliteStore>>,
}

impl TestContext {
    pub fn new(model: FakeModel) -> Self {
        let store = Arc::new(SqliteStore::open_in_memory().expect("in-memory sqlite"));
        let events = EventBus::new();
        let progress = ProgressTracker::new(store.clone(), events.clone());
        Self {
            service: ConversationService::new(model, progress),
            store,
            events,
        }
    }

    pub fn progress(&self) -> ProgressTracker<Arc<SqliteStore>> {
        ProgressTracker::new(self.store.clone(), self.events.clone())
    }
}
