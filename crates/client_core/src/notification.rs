//! User-facing status messages and the region that displays them.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

impl NotificationLevel {
    /// Style class suffix, `status-success` / `status-error`.
    pub fn style(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub auto_clear_after: Option<Duration>,
    pub scroll_into_view: bool,
}

impl Notification {
    pub fn success(message: impl Into<String>, auto_clear_after: Option<Duration>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
            auto_clear_after,
            scroll_into_view: false,
        }
    }

    pub fn error(message: impl Into<String>, scroll_into_view: bool) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
            auto_clear_after: None,
            scroll_into_view,
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

/// Holds at most one notification; a newer post replaces the older one and
/// auto-clearing notifications disappear once their delay has elapsed.
#[derive(Debug, Default)]
pub struct StatusRegion {
    current: Option<(Notification, Instant)>,
}

impl StatusRegion {
    pub fn post(&mut self, notification: Notification, now: Instant) {
        self.current = Some((notification, now));
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn visible(&mut self, now: Instant) -> Option<&Notification> {
        let expired = match &self.current {
            Some((notification, posted_at)) => notification
                .auto_clear_after
                .is_some_and(|delay| now.saturating_duration_since(*posted_at) >= delay),
            None => false,
        };
        if expired {
            self.current = None;
        }
        self.current.as_ref().map(|(notification, _)| notification)
    }
}
