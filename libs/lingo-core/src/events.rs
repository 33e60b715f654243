//! Progress change notifications.
//!
//! Payloads are advisory: some emitters attach a kind and amount, others
//! nothing. Listeners should re-read persisted state instead of trusting the
//! payload.

use crate::progress::ProgressKind;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

/// Optional detail attached to a progress notification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ProgressKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<u32>,
}

impl ProgressEvent {
    /// Notification without a payload.
    pub fn bare() -> Self {
        Self::default()
    }

    pub fn with_detail(kind: ProgressKind, amount: u32) -> Self {
        Self {
            kind: Some(kind),
            amount: Some(amount),
        }
    }
}

/// Receiver of progress notifications.
pub trait ProgressListener: Send + Sync {
    fn progress_changed(&self, event: &ProgressEvent);
}

impl<F> ProgressListener for F
where
    F: Fn(&ProgressEvent) + Send + Sync,
{
    fn progress_changed(&self, event: &ProgressEvent) {
        self(event)
    }
}

/// Process-wide fan-out of progress notifications.
#[derive(Default, Clone)]
pub struct EventBus {
    listeners: Arc<RwLock<Vec<Arc<dyn ProgressListener>>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: Arc<dyn ProgressListener>) {
        match self.listeners.write() {
            Ok(mut listeners) => listeners.push(listener),
            Err(_) => tracing::warn!("event bus lock poisoned, listener dropped"),
        }
    }

    pub fn emit(&self, event: &ProgressEvent) {
        // Snapshot so a listener may subscribe without deadlocking.
        let listeners = match self.listeners.read() {
            Ok(listeners) => listeners.clone(),
            Err(_) => {
                tracing::warn!("event bus lock poisoned, event dropped");
                return;
            }
        };
        for listener in listeners {
            listener.progress_changed(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().map(|l| l.len()).unwrap_or(0)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn emits_to_every_listener() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for _ in 0..2 {
            let seen = seen.clone();
            bus.subscribe(Arc::new(move |event: &ProgressEvent| {
                seen.lock().unwrap().push(event.clone());
            }));
        }

        bus.emit(&ProgressEvent::with_detail(ProgressKind::Words, 4));
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].amount, Some(4));
    }

    #[test]
    fn tolerates_partial_payloads() {
        let bare: ProgressEvent = serde_json::from_str("{}").unwrap();
        assert_eq!(bare, ProgressEvent::bare());

        let partial: ProgressEvent = serde_json::from_str(r#"{"type":"lesson"}"#).unwrap();
        assert_eq!(partial.kind, Some(ProgressKind::Lesson));
        assert_eq!(partial.amount, None);
    }
}
