//! Single-slot notice channel.
//!
//! At most one notice is active. Posting an error hides any success and
//! vice versa. Success notices carry an id so a delayed expiry only hides
//! the notice it was scheduled for, never a newer one.

/// Notice severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Error,
    Success,
}

impl NoticeKind {
    /// Get CSS class for styling.
    pub fn css_class(&self) -> &'static str {
        match self {
            NoticeKind::Error => "error-message",
            NoticeKind::Success => "success-message",
        }
    }

    /// Get emoji prefix for display.
    pub fn emoji(&self) -> &'static str {
        match self {
            NoticeKind::Error => "❌",
            NoticeKind::Success => "✅",
        }
    }

    /// Whether notices of this kind hide themselves.
    pub fn auto_hides(&self) -> bool {
        matches!(self, NoticeKind::Success)
    }
}

/// A user-visible message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    /// Message with its emoji prefix.
    pub fn text(&self) -> String {
        format!("{} {}", self.kind.emoji(), self.message)
    }
}

#[derive(Debug, Default)]
pub struct NoticeChannel {
    active: Option<Notice>,
    next_id: u64,
}

impl NoticeChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the active notice.
    pub fn post(&mut self, kind: NoticeKind, message: impl Into<String>) -> Notice {
        self.next_id += 1;
        let notice = Notice {
            id: self.next_id,
            kind,
            message: message.into(),
        };
        self.active = Some(notice.clone());
        notice
    }

    /// Hide notice `id` if it is still the active one and auto-hides.
    ///
    /// Returns `true` when something was hidden.
    pub fn expire(&mut self, id: u64) -> bool {
        match &self.active {
            Some(notice) if notice.id == id && notice.kind.auto_hides() => {
                self.active = None;
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        self.active = None;
    }

    pub fn active(&self) -> Option<&Notice> {
        self.active.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_posting_replaces_active_notice() {
        let mut channel = NoticeChannel::new();
        channel.post(NoticeKind::Error, "first");
        let success = channel.post(NoticeKind::Success, "second");

        assert_eq!(channel.active(), Some(&success));
        assert_eq!(channel.active().unwrap().kind, NoticeKind::Success);
    }

    #[test]
    fn test_success_expires() {
        let mut channel = NoticeChannel::new();
        let notice = channel.post(NoticeKind::Success, "done");

        assert!(channel.expire(notice.id));
        assert!(channel.active().is_none());
    }

    #[test]
    fn test_error_never_expires() {
        let mut channel = NoticeChannel::new();
        let notice = channel.post(NoticeKind::Error, "broken");

        assert!(!channel.expire(notice.id));
        assert_eq!(channel.active(), Some(&notice));
    }

    #[test]
    fn test_stale_expiry_leaves_newer_notice() {
        let mut channel = NoticeChannel::new();
        let old = channel.post(NoticeKind::Success, "selected");
        let newer = channel.post(NoticeKind::Success, "completed");

        assert!(!channel.expire(old.id));
        assert_eq!(channel.active(), Some(&newer));
    }

    #[test]
    fn test_text_has_prefix() {
        let mut channel = NoticeChannel::new();
        assert_eq!(channel.post(NoticeKind::Error, "nope").text(), "❌ nope");
    }
}
