//! Transient user-facing notifications.

use std::time::{Duration, Instant};

use feedback_dom::DomNode;

/// How long a notice stays on the page after it was raised.
pub const TOAST_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Destructive,
}

impl NoticeKind {
    fn css(self) -> &'static str {
        match self {
            NoticeKind::Success => "toast",
            NoticeKind::Destructive => "toast destructive",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub description: String,
}

/// Capability handed to the form so it can tell the user what happened.
pub trait Notify {
    fn notify(&mut self, kind: NoticeKind, title: &str, description: &str);
}

/// Keeps the most recent notice for rendering into the page. A new notice
/// replaces the old one, and a notice older than the ttl is gone.
#[derive(Debug)]
pub struct Toasts {
    current: Option<(Notice, Instant)>,
    ttl: Duration,
    // Bumped on every notice so the client can replay its entry animation
    // even when the same message repeats.
    generation: u64,
}

impl Default for Toasts {
    fn default() -> Self {
        Self::with_ttl(TOAST_TTL)
    }
}

impl Toasts {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self { current: None, ttl, generation: 0 }
    }

    pub fn current(&self) -> Option<&Notice> {
        self.current
            .as_ref()
            .filter(|(_, raised)| raised.elapsed() < self.ttl)
            .map(|(notice, _)| notice)
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }

    pub fn render(&self) -> Option<DomNode> {
        let notice = self.current()?;
        Some(
            DomNode::new("div")
                .keyed("toast")
                .class(notice.kind.css())
                .attr("role", "status")
                .attr("data-gen", self.generation.to_string())
                .attr("data-ttl-ms", self.ttl.as_millis().to_string())
                .child(DomNode::text("strong", &notice.title).keyed("toast-title"))
                .child(DomNode::text("p", &notice.description).keyed("toast-desc"))
                .child(
                    DomNode::text("button", "\u{00d7}")
                        .keyed("toast-close")
                        .attr("type", "button")
                        .attr("aria-label", "Dismiss")
                        .on("click", "dismiss_toast"),
                ),
        )
    }
}

impl Notify for Toasts {
    fn notify(&mut self, kind: NoticeKind, title: &str, description: &str) {
        tracing::debug!(?kind, title, "notice");
        self.generation += 1;
        let notice = Notice {
            kind,
            title: title.to_string(),
            description: description.to_string(),
        };
        self.current = Some((notice, Instant::now()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_notice_wins() {
        let mut toasts = Toasts::default();
        assert!(toasts.render().is_none());

        toasts.notify(NoticeKind::Destructive, "Invalid Email", "Please enter a valid email address.");
        toasts.notify(NoticeKind::Success, "Feedback Submitted!", "Thank you for your valuable feedback.");

        let notice = toasts.current().unwrap();
        assert_eq!(notice.kind, NoticeKind::Success);
        assert_eq!(notice.title, "Feedback Submitted!");

        let node = toasts.render().unwrap();
        assert!(node.has_class("toast"));
        assert!(!node.has_class("destructive"));
        assert_eq!(node.attrs.get("data-gen").map(String::as_str), Some("2"));
        assert_eq!(node.find("toast-close").unwrap().event("click"), Some("dismiss_toast"));
    }

    #[test]
    fn test_dismiss() {
        let mut toasts = Toasts::default();
        toasts.notify(NoticeKind::Destructive, "Missing Information", "Please fill in all fields before submitting.");
        assert!(toasts.render().unwrap().has_class("destructive"));
        toasts.dismiss();
        assert!(toasts.current().is_none());
        assert!(toasts.render().is_none());
    }

    #[test]
    fn test_notice_expires() {
        let mut toasts = Toasts::with_ttl(Duration::ZERO);
        toasts.notify(NoticeKind::Success, "Feedback Submitted!", "Thank you for your valuable feedback.");
        assert!(toasts.current().is_none());
        assert!(toasts.render().is_none());

        let mut toasts = Toasts::with_ttl(Duration::from_secs(60));
        toasts.notify(NoticeKind::Success, "Feedback Submitted!", "Thank you for your valuable feedback.");
        let node = toasts.render().unwrap();
        assert_eq!(node.attrs.get("data-ttl-ms").map(String::as_str), Some("60000"));
    }
}
