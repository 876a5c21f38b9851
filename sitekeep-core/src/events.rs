//! Save notifications.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Buffer per subscriber before old events are dropped.
const CHANNEL_CAPACITY: usize = 16;

/// Outcome of one save attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveEvent {
    /// Whether the remote store accepted the document
    pub success: bool,
    /// Set when the remote write failed but the local cache holds the document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_to_local: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SaveEvent {
    pub fn saved() -> Self {
        Self {
            success: true,
            saved_to_local: None,
            error: None,
        }
    }

    pub fn failed() -> Self {
        Self {
            success: false,
            saved_to_local: None,
            error: None,
        }
    }

    pub fn saved_locally() -> Self {
        Self {
            saved_to_local: Some(true),
            ..Self::failed()
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

/// Broadcast hub for [`SaveEvent`]s.
#[derive(Debug, Clone)]
pub struct SaveEvents {
    sender: broadcast::Sender<SaveEvent>,
}

impl SaveEvents {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SaveEvent> {
        self.sender.subscribe()
    }

    pub fn emit(&self, event: SaveEvent) {
        tracing::debug!(?event, "content saved event");
        // Ignore send errors (no subscribers)
        let _ = self.sender.send(event);
    }
}

impl Default for SaveEvents {
    fn default() -> Self {
        Self::new()
    }
}
