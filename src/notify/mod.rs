//! Notification subsystem.
//!
//! Transient user-facing notifications ("5 images added", "Compression
//! complete!") with a process-scoped monotonic id owned by the subsystem.
//! The rendering target is injected as a [`Notifier`] at construction rather
//! than resolved from ambient global state; [`NotificationCenter`] is the
//! default implementation and mirrors every notification to `tracing`.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Severity of a notification, mapped to presentation style by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
    Info,
}

/// One transient notification.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Monotonically increasing id, unique within the process
    pub id: u64,
    pub level: NotificationLevel,
    pub message: String,
    /// Optional structured payload for richer presentation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// Sink for notifications, injected into the orchestrator at construction.
pub trait Notifier: Send + Sync {
    fn notify(&self, level: NotificationLevel, message: &str) {
        self.notify_with_metadata(level, message, None);
    }

    fn notify_with_metadata(
        &self,
        level: NotificationLevel,
        message: &str,
        metadata: Option<serde_json::Value>,
    );
}

/// Default notifier: keeps active notifications for the UI to drain and
/// dismiss, and logs each one.
pub struct NotificationCenter {
    next_id: AtomicU64,
    active: Mutex<Vec<Notification>>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            active: Mutex::new(Vec::new()),
        }
    }

    /// Active notifications in arrival order.
    pub fn active(&self) -> Vec<Notification> {
        self.active.lock().expect("notification lock poisoned").clone()
    }

    /// Dismisses one notification. Unknown ids are ignored.
    pub fn dismiss(&self, id: u64) {
        let mut active = self.active.lock().expect("notification lock poisoned");
        active.retain(|n| n.id != id);
    }

    pub fn dismiss_all(&self) {
        self.active.lock().expect("notification lock poisoned").clear();
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for NotificationCenter {
    fn notify_with_metadata(
        &self,
        level: NotificationLevel,
        message: &str,
        metadata: Option<serde_json::Value>,
    ) {
        match level {
            NotificationLevel::Success => info!("{message}"),
            NotificationLevel::Error => warn!("{message}"),
            NotificationLevel::Info => debug!("{message}"),
        }

        let notification = Notification {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            level,
            message: message.to_string(),
            metadata,
        };

        let mut active = self.active.lock().expect("notification lock poisoned");
        active.push(notification);
    }
}

/// Notifier that drops everything, for headless use of the orchestrator.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify_with_metadata(
        &self,
        _level: NotificationLevel,
        _message: &str,
        _metadata: Option<serde_json::Value>,
    ) {
    }
}
