//! User-facing notifications raised by the visualizer
//!
//! The host decides how to show them (toast, status bar, log line); the
//! visualizer only records what happened.

use serde::Serialize;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationVariant {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub variant: NotificationVariant,
}

impl Notification {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(title, message, NotificationVariant::Info)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(title, message, NotificationVariant::Error)
    }

    fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        variant: NotificationVariant,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            variant,
        }
    }

    pub fn is_error(&self) -> bool {
        self.variant == NotificationVariant::Error
    }
}

/// Pending notifications, oldest first
#[derive(Debug, Default)]
pub struct NotificationQueue {
    pending: Vec<Notification>,
}

impl NotificationQueue {
    pub fn push(&mut self, notification: Notification) {
        match notification.variant {
            NotificationVariant::Error => error!(
                title = %notification.title,
                message = %notification.message,
                "notification"
            ),
            _ => info!(
                title = %notification.title,
                message = %notification.message,
                "notification"
            ),
        }
        self.pending.push(notification);
    }

    pub fn pending(&self) -> &[Notification] {
        &self.pending
    }

    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
