//! Notification model.

use std::fmt;

use serde::Serialize;

/// Notification kind; selects icon and colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationKind {
    /// Glyph shown next to the notification.
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Info => "ℹ",
            Self::Success => "✓",
            Self::Warning | Self::Error => "⚠",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        };
        f.write_str(s)
    }
}

/// A notification shown in the top bar and the alerts panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    /// Relative time label ("2 hours ago")
    pub time: String,
}

impl Notification {
    pub fn new(
        id: impl Into<String>,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            title: title.into(),
            message: message.into(),
            time: time.into(),
        }
    }
}

/// Canned notifications used when a dashboard supplies none.
pub fn default_notifications() -> Vec<Notification> {
    vec![
        Notification::new(
            "1",
            NotificationKind::Info,
            "System Update",
            "System maintenance scheduled for tonight",
            "2 hours ago",
        ),
        Notification::new(
            "2",
            NotificationKind::Success,
            "Payment Confirmed",
            "Fee payment has been processed successfully",
            "1 day ago",
        ),
        Notification::new(
            "3",
            NotificationKind::Warning,
            "Assignment Due",
            "Database project submission due tomorrow",
            "2 days ago",
        ),
    ]
}

/// Number shown on the notification badge.
pub fn badge_count(notifications: &[Notification]) -> usize {
    notifications.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_set() {
        let defaults = default_notifications();
        assert_eq!(defaults.len(), 3);
        assert_eq!(badge_count(&defaults), 3);
        assert_eq!(defaults[0].title, "System Update");
    }

    #[test]
    fn test_badge_count_empty() {
        assert_eq!(badge_count(&[]), 0);
    }

    #[test]
    fn test_kind_ordering() {
        assert!(NotificationKind::Error > NotificationKind::Warning);
        assert!(NotificationKind::Info < NotificationKind::Success);
        assert_eq!(NotificationKind::Warning.to_string(), "warning");
    }
}
