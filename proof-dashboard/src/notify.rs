//! User-facing notifications
//!
//! Fire-and-forget toasts. Callers never depend on delivery.

use std::collections::VecDeque;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Success,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl Notification {
    pub fn new(severity: Severity, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(Severity::Destructive, title, description)
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Destructive => error!(
                title = %notification.title,
                description = %notification.description,
                "Notification"
            ),
            Severity::Info | Severity::Success => info!(
                title = %notification.title,
                description = %notification.description,
                "Notification"
            ),
        }
    }
}

/// Keeps the most recent notifications for the UI to poll, and logs them
#[derive(Debug)]
pub struct MemoryNotifier {
    capacity: usize,
    recent: Mutex<VecDeque<Notification>>,
}

impl MemoryNotifier {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            recent: Mutex::new(VecDeque::new()),
        }
    }

    /// Oldest first
    pub fn recent(&self) -> Vec<Notification> {
        match self.recent.lock() {
            Ok(recent) => recent.iter().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().iter().cloned().collect(),
        }
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notification: Notification) {
        TracingNotifier.notify(notification.clone());

        let mut recent = match self.recent.lock() {
            Ok(recent) => recent,
            Err(poisoned) => poisoned.into_inner(),
        };
        if recent.len() == self.capacity {
            recent.pop_front();
        }
        recent.push_back(notification);
    }
}
