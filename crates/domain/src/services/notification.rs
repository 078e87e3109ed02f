//! Operation notifications.
//!
//! Every mutation reports its outcome as a short titled message. Where the
//! message goes is up to the [`Notifier`] the caller plugs in.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Visual variant of a notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationVariant {
    #[default]
    Success,
    Destructive,
}

impl std::fmt::Display for NotificationVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationVariant::Success => write!(f, "success"),
            NotificationVariant::Destructive => write!(f, "destructive"),
        }
    }
}

/// A user-visible outcome message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NotificationVariant::Success,
            timestamp: Utc::now(),
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NotificationVariant::Destructive,
            timestamp: Utc::now(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.variant == NotificationVariant::Destructive
    }
}

/// Sink for notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification)
    }
}

/// Writes notifications to the tracing log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.variant {
            NotificationVariant::Success => tracing::info!(
                title = %notification.title,
                description = %notification.description,
                "Notification"
            ),
            NotificationVariant::Destructive => tracing::warn!(
                title = %notification.title,
                description = %notification.description,
                "Notification"
            ),
        }
    }
}

/// Keeps every notification in memory.
///
/// Used by tests to assert on what the user would have seen.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    received: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything received so far, oldest first.
    pub fn notifications(&self) -> Vec<Notification> {
        self.received
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.received.lock().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn last(&self) -> Option<Notification> {
        self.received
            .lock()
            .ok()
            .and_then(|guard| guard.last().cloned())
    }

    pub fn clear(&self) {
        if let Ok(mut guard) = self.received.lock() {
            guard.clear();
        }
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut guard) = self.received.lock() {
            guard.push(notification);
        }
    }
}

/// Forwards notifications to an async consumer.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    /// Creates the notifier and the receiving half.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        if self.sender.send(notification).is_err() {
            tracing::debug!("Notification receiver dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_display() {
        assert_eq!(NotificationVariant::Success.to_string(), "success");
        assert_eq!(NotificationVariant::Destructive.to_string(), "destructive");
    }

    #[test]
    fn test_notification_serialization() {
        let notification = Notification::destructive("Error", "Failed to delete product");
        let json = serde_json::to_string(&notification).unwrap();
        assert!(json.contains("\"variant\":\"destructive\""));
        assert!(json.contains("Failed to delete product"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_recording_notifier_keeps_order() {
        let notifier = RecordingNotifier::new();
        assert!(notifier.is_empty());

        notifier.notify(Notification::success("Success", "Product created successfully"));
        notifier.notify(Notification::destructive("Error", "Failed to update product"));

        let received = notifier.notifications();
        assert_eq!(received.len(), 2);
        assert!(!received[0].is_error());
        assert!(received[1].is_error());
        assert_eq!(
            notifier.last().unwrap().description,
            "Failed to update product"
        );

        notifier.clear();
        assert!(notifier.is_empty());
    }

    #[test]
    fn test_recording_notifier_clones_share_storage() {
        let notifier = RecordingNotifier::new();
        let shared: Arc<dyn Notifier> = Arc::new(notifier.clone());
        shared.notify(Notification::success("Success", "Event deleted successfully"));
        assert_eq!(notifier.len(), 1);
    }

    #[tokio::test]
    async fn test_channel_notifier_delivers() {
        let (notifier, mut receiver) = ChannelNotifier::channel();
        notifier.notify(Notification::success("Success", "Partner status updated"));

        let received = receiver.recv().await.unwrap();
        assert_eq!(received.title, "Success");
    }

    #[test]
    fn test_channel_notifier_tolerates_dropped_receiver() {
        let (notifier, receiver) = ChannelNotifier::channel();
        drop(receiver);
        notifier.notify(Notification::success("Success", "ignored"));
    }
}
