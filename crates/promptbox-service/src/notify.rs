use std::time::{Duration, Instant};

const INFO_DURATION: Duration = Duration::from_millis(3000);
const ERROR_DURATION: Duration = Duration::from_millis(4000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A transient message that dismisses itself after `duration`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NoticeLevel,
    pub duration: Duration,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NoticeLevel::Info,
            duration: INFO_DURATION,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NoticeLevel::Error,
            duration: ERROR_DURATION,
        }
    }

    /// Whether a notice first shown at `shown_at` should be gone by `now`.
    pub fn is_expired(&self, shown_at: Instant, now: Instant) -> bool {
        now.saturating_duration_since(shown_at) >= self.duration
    }
}
