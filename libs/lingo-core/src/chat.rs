//! Conversation practice against a language model.
//!
//! A [`ChatSession`] owns the history of one conversation. Sending is split in
//! two halves so the caller can release the session between them:
//! [`ChatSession::begin_send`] records the user turn and marks the session
//! pending, [`ChatSession::complete`] records the reply or the failure.
//! [`send_message`] runs both halves around a [`LanguageModel`] call.

use crate::error::ChatError;
use crate::types::{ChatMessage, Role};
use std::future::Future;
use uuid::Uuid;

/// Shown in place of a reply when the model call fails.
pub const CONNECTION_ERROR_MESSAGE: &str = "Arr! The connection be faulty. Try again, matey.";

/// Remote language model.
pub trait LanguageModel: Send + Sync {
    /// Plain Turkish translation of an English sentence.
    fn translate(&self, text: &str) -> impl Future<Output = Result<String, ChatError>> + Send;

    /// Reply to a conversation. The last message must be from the user.
    fn chat(&self, history: &[ChatMessage])
        -> impl Future<Output = Result<String, ChatError>> + Send;
}

/// Check that a history ends with a user turn.
pub fn validate_history(history: &[ChatMessage]) -> Result<&ChatMessage, ChatError> {
    match history.last() {
        Some(last) if last.role == Role::User => Ok(last),
        _ => Err(ChatError::LastMessageNotFromUser),
    }
}

/// One conversation with its history and request state.
#[derive(Debug, Clone)]
pub struct ChatSession {
    id: Uuid,
    messages: Vec<ChatMessage>,
    pending: bool,
    error: Option<String>,
    goal: usize,
    practice_logged: bool,
}

impl ChatSession {
    /// Empty conversation. `goal` user messages count as practice.
    pub fn new(goal: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            messages: Vec::new(),
            pending: false,
            error: None,
            goal,
            practice_logged: false,
        }
    }

    /// Conversation opened by the model, e.g. from a lesson's prompt.
    pub fn with_opening_prompt(goal: usize, prompt: impl Into<String>) -> Self {
        let mut session = Self::new(goal);
        session.messages.push(ChatMessage::model(prompt));
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Themed error from the last failed send, cleared by the next send.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn user_message_count(&self) -> usize {
        self.messages.iter().filter(|m| m.role == Role::User).count()
    }

    pub fn practice_logged(&self) -> bool {
        self.practice_logged
    }

    /// Record the user's turn and return the history to send.
    ///
    /// Rejects blank input and a second send while one is pending.
    /// `on_practiced` runs once, on the message that reaches the goal.
    pub fn begin_send<F: FnOnce()>(
        &mut self,
        input: &str,
        on_practiced: F,
    ) -> Result<Vec<ChatMessage>, ChatError> {
        if input.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if self.pending {
            return Err(ChatError::RequestPending);
        }

        self.messages.push(ChatMessage::user(input));
        self.pending = true;
        self.error = None;

        if !self.practice_logged && self.user_message_count() >= self.goal {
            self.practice_logged = true;
            tracing::info!(session = %self.id, "conversation counted as practice");
            on_practiced();
        }
        Ok(self.messages.clone())
    }

    /// Finish the pending request. Failures keep the history and set the
    /// themed error so the learner can retry.
    pub fn complete(&mut self, reply: Result<String, ChatError>) {
        self.pending = false;
        match reply {
            Ok(text) => self.messages.push(ChatMessage::model(text)),
            Err(e) => {
                tracing::warn!(session = %self.id, error = %e, "chat request failed");
                self.error = Some(CONNECTION_ERROR_MESSAGE.to_string());
            }
        }
    }
}

/// Send one user message and wait for the reply.
pub async fn send_message<M, F>(
    session: &mut ChatSession,
    model: &M,
    input: &str,
    on_practiced: F,
) -> Result<String, ChatError>
where
    M: LanguageModel + ?Sized,
    F: FnOnce(),
{
    let history = session.begin_send(input, on_practiced)?;
    let reply = model.chat(&history).await;
    session.complete(reply.clone());
    reply
}
