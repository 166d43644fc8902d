//! Simulated contact form.
//!
//! Submission never leaves the process. A form with any required field
//! blank yields a failure banner and keeps its values; a complete form
//! yields a success banner, is logged and then cleared. Banners live in a
//! [`BannerStack`] that expires them on the shared millisecond timeline.

use tracing::info;

use crate::timer::{Deferred, Millis};

/// How long a banner is fully shown.
pub const BANNER_VISIBLE_MS: Millis = 5000;

/// Length of the slide-out before removal.
pub const BANNER_LEAVE_MS: Millis = 500;

/// Fixed message for a submission with missing fields.
pub const MISSING_FIELDS_MESSAGE: &str = "Please fill in all fields.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Failure,
}

/// An alert requested by a form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub title: String,
    pub body: String,
}

impl Banner {
    /// Confirmation addressed to the sender.
    pub fn success(name: &str) -> Self {
        Self {
            kind: BannerKind::Success,
            title: "[SUCCESS] Message Sent!".into(),
            body: format!("Thank you, {name}! Your message has been received."),
        }
    }

    /// The fixed "fill in every field" alert.
    pub fn missing_fields() -> Self {
        Self {
            kind: BannerKind::Failure,
            title: "[ERROR]".into(),
            body: MISSING_FIELDS_MESSAGE.into(),
        }
    }
}

/// The three required text fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactForm {
    pub fn new(name: impl Into<String>, email: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }

    /// Whether any required field is blank (whitespace counts as blank).
    pub fn has_missing_fields(&self) -> bool {
        [&self.name, &self.email, &self.message]
            .iter()
            .any(|field| field.trim().is_empty())
    }

    /// Simulate sending the form and return the banner to show.
    pub fn submit(&mut self) -> Banner {
        if self.has_missing_fields() {
            return Banner::missing_fields();
        }

        info!(
            name = %self.name,
            email = %self.email,
            message_len = self.message.chars().count(),
            "contact form submitted"
        );
        let banner = Banner::success(&self.name);
        self.clear();
        banner
    }

    pub fn clear(&mut self) {
        self.name.clear();
        self.email.clear();
        self.message.clear();
    }
}

/// Lifecycle stage of a shown banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerStage {
    Visible,
    /// Sliding out; removed when this stage's timer fires.
    Leaving,
}

#[derive(Debug, Clone)]
struct ShownBanner {
    banner: Banner,
    stage: BannerStage,
    timer: Deferred,
}

/// Banners currently on screen, oldest first.
#[derive(Debug, Clone, Default)]
pub struct BannerStack {
    shown: Vec<ShownBanner>,
}

impl BannerStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `banner` from `now` on.
    pub fn push(&mut self, banner: Banner, now: Millis) {
        self.shown.push(ShownBanner {
            banner,
            stage: BannerStage::Visible,
            timer: Deferred::after(now, BANNER_VISIBLE_MS),
        });
    }

    /// Advance every banner's stage and drop the ones that finished leaving.
    pub fn update(&mut self, now: Millis) {
        for shown in &mut self.shown {
            if let Some(due) = shown.timer.fire(now) {
                if shown.stage == BannerStage::Visible {
                    shown.stage = BannerStage::Leaving;
                    shown.timer.schedule(due, BANNER_LEAVE_MS);
                    // A long stall can cover both stages at once.
                    shown.timer.fire(now);
                }
            }
        }
        // Only a banner that finished leaving has no pending timer.
        self.shown.retain(|s| s.timer.is_pending());
    }

    /// Banners with their current stage.
    pub fn iter(&self) -> impl Iterator<Item = (&Banner, BannerStage)> {
        self.shown.iter().map(|s| (&s.banner, s.stage))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.shown.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shown.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_message_fails_and_keeps_values() {
        let mut form = ContactForm::new("Ada", "ada@example.com", "");
        let banner = form.submit();

        assert_eq!(banner.kind, BannerKind::Failure);
        assert_eq!(banner.body, MISSING_FIELDS_MESSAGE);
        assert_eq!(form, ContactForm::new("Ada", "ada@example.com", ""));
    }

    #[test]
    fn test_whitespace_only_counts_as_missing() {
        let mut form = ContactForm::new("   ", "a@b.c", "hi");
        assert_eq!(form.submit().kind, BannerKind::Failure);
        assert_eq!(form.name, "   ");
    }

    #[test]
    fn test_complete_form_succeeds_and_clears() {
        let mut form = ContactForm::new("Ada", "ada@example.com", "Hello");
        let banner = form.submit();

        assert_eq!(banner.kind, BannerKind::Success);
        assert_eq!(banner.body, "Thank you, Ada! Your message has been received.");
        assert_eq!(form, ContactForm::default());
    }

    #[test]
    fn test_banner_stages_and_removal() {
        let mut stack = BannerStack::new();
        stack.push(Banner::missing_fields(), 0);

        stack.update(4999);
        assert_eq!(stack.iter().next().map(|(_, s)| s), Some(BannerStage::Visible));

        stack.update(5000);
        assert_eq!(stack.iter().next().map(|(_, s)| s), Some(BannerStage::Leaving));

        stack.update(5499);
        assert_eq!(stack.len(), 1);

        stack.update(5500);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_stalled_update_removes_in_one_call() {
        let mut stack = BannerStack::new();
        stack.push(Banner::success("x"), 0);
        stack.push(Banner::success("y"), 4000);

        stack.update(6000);
        // First is gone, second is still visible.
        assert_eq!(stack.len(), 1);
        let (banner, stage) = stack.iter().next().unwrap();
        assert_eq!(banner, &Banner::success("y"));
        assert_eq!(stage, BannerStage::Visible);
    }
}
