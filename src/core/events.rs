//! Notification side channel for fetch and mutation outcomes
//!
//! Loaders and dispatchers publish a [`Notification`] for every user-visible
//! outcome; whatever renders toasts subscribes to the [`NotificationBus`].
//!
//! ```text
//! ListLoader ─────────┐
//!                     ├──▶ NotificationBus::publish() ──▶ broadcast channel ──▶ toast renderer
//! MutationDispatcher ─┘                                                   ──▶ tests / logs
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! let bus = NotificationBus::new(64);
//! let mut rx = bus.subscribe();
//!
//! bus.publish(Notification::success("lead", Action::Create, "Lead created successfully"));
//!
//! if let Ok(n) = rx.recv().await {
//!     println!("[{:?}] {}", n.level, n.message);
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// The operation a notification reports on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Fetch,
    Create,
    Update,
    Delete,
}

impl Action {
    /// Past-tense verb used in success messages
    pub fn past_tense(&self) -> &'static str {
        match self {
            Action::Fetch => "loaded",
            Action::Create => "created",
            Action::Update => "updated",
            Action::Delete => "deleted",
        }
    }
}

/// A user-facing outcome message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Unique notification ID
    pub id: Uuid,
    /// When the outcome happened
    pub timestamp: DateTime<Utc>,
    pub level: NotificationLevel,
    /// Singular resource name (e.g., "lead")
    pub resource: String,
    pub action: Action,
    /// Human-readable text; never empty
    pub message: String,
}

impl Notification {
    pub fn new(
        level: NotificationLevel,
        resource: impl Into<String>,
        action: Action,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            level,
            resource: resource.into(),
            action,
            message: message.into(),
        }
    }

    pub fn success(resource: impl Into<String>, action: Action, message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, resource, action, message)
    }

    pub fn error(resource: impl Into<String>, action: Action, message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, resource, action, message)
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

/// Broadcast-based notification bus
///
/// Cheap to clone; every clone publishes into the same channel.
#[derive(Debug, Clone)]
pub struct NotificationBus {
    sender: broadcast::Sender<Notification>,
}

impl NotificationBus {
    /// Create a bus buffering up to `capacity` notifications per slow receiver
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish to all subscribers
    ///
    /// Never fails. Without subscribers the notification is dropped.
    /// Returns the number of receivers reached.
    pub fn publish(&self, notification: Notification) -> usize {
        match notification.level {
            NotificationLevel::Success => tracing::info!(
                resource = %notification.resource,
                action = ?notification.action,
                "{}",
                notification.message
            ),
            NotificationLevel::Error => tracing::warn!(
                resource = %notification.resource,
                action = ?notification.action,
                "{}",
                notification.message
            ),
        }
        self.sender.send(notification).unwrap_or(0)
    }

    /// Subscribe to notifications published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new(64)
    }
}
