//! Notification sink for cart feedback.
//!
//! The store reports the outcome of user-facing operations through a
//! [`Notifier`]. How a notification is shown (toast, log line, terminal
//! output) is up to the implementation.

use std::fmt;

/// Outcome class of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Success,
    Error,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// A single delivered notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

/// Receives cart notifications.
///
/// Called synchronously at the point of success or failure, exactly once
/// per event. Implementations must not block.
pub trait Notifier {
    fn notify(&mut self, kind: NotificationKind, message: &str);

    /// Report a success.
    fn success(&mut self, message: &str) {
        self.notify(NotificationKind::Success, message);
    }

    /// Report a failure.
    fn error(&mut self, message: &str) {
        self.notify(NotificationKind::Error, message);
    }
}

impl<N: Notifier + ?Sized> Notifier for &mut N {
    fn notify(&mut self, kind: NotificationKind, message: &str) {
        (**self).notify(kind, message);
    }
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn notify(&mut self, kind: NotificationKind, message: &str) {
        (**self).notify(kind, message);
    }
}

/// Writes notifications to the tracing subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&mut self, kind: NotificationKind, message: &str) {
        match kind {
            NotificationKind::Success => tracing::info!(%kind, "{message}"),
            NotificationKind::Error => tracing::warn!(%kind, "{message}"),
        }
    }
}

/// Keeps every notification in memory, in delivery order.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    notifications: Vec<Notification>,
}

impl RecordingNotifier {
    /// Notifications received so far.
    #[must_use]
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Take the recorded notifications, leaving the recorder empty.
    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// The most recent notification, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Notification> {
        self.notifications.last()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, kind: NotificationKind, message: &str) {
        self.notifications.push(Notification {
            kind,
            message: message.to_owned(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_notifier_keeps_order() {
        let mut notifier = RecordingNotifier::default();
        notifier.success("first");
        notifier.error("second");

        let kinds: Vec<_> = notifier.notifications().iter().map(|n| n.kind).collect();
        assert_eq!(kinds, [NotificationKind::Success, NotificationKind::Error]);
        assert_eq!(notifier.last().map(|n| n.message.as_str()), Some("second"));
    }

    #[test]
    fn test_drain_empties_recorder() {
        let mut notifier = RecordingNotifier::default();
        notifier.success("added");
        assert_eq!(notifier.drain().len(), 1);
        assert!(notifier.notifications().is_empty());
    }

    #[test]
    fn test_forwarding_through_mut_ref() {
        let mut inner = RecordingNotifier::default();
        {
            let mut forward = &mut inner;
            forward.error("boom");
        }
        assert_eq!(inner.notifications().len(), 1);
    }
}
