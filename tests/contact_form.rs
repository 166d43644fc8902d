//! Integration tests for the simulated contact form and its banners.

use plexus::contact::{
    Banner, BannerKind, BannerStack, BannerStage, ContactForm, BANNER_LEAVE_MS,
    BANNER_VISIBLE_MS, MISSING_FIELDS_MESSAGE,
};
use plexus::overlay::Overlay;

#[test]
fn test_empty_message_fails_and_keeps_values() {
    let mut form = ContactForm::new("Grace", "grace@example.com", "");
    let before = form.clone();

    let banner = form.submit();

    assert_eq!(banner.kind, BannerKind::Failure);
    assert_eq!(banner.body, MISSING_FIELDS_MESSAGE);
    assert_eq!(form, before);
}

#[test]
fn test_each_missing_field_fails() {
    let cases = [
        ContactForm::new("", "a@b.c", "hello"),
        ContactForm::new("Ann", "", "hello"),
        ContactForm::new("Ann", "a@b.c", "   "),
    ];
    for mut form in cases {
        assert_eq!(form.submit(), Banner::missing_fields());
    }
}

#[test]
fn test_complete_form_succeeds_and_clears() {
    let mut form = ContactForm::new("Grace", "grace@example.com", "Let's talk.");

    let banner = form.submit();

    assert_eq!(banner.kind, BannerKind::Success);
    assert_eq!(banner.body, "Thank you, Grace! Your message has been received.");
    assert_eq!(form, ContactForm::default());
}

#[test]
fn test_resubmitting_a_cleared_form_fails() {
    let mut form = ContactForm::new("Grace", "grace@example.com", "hi");
    form.submit();
    assert_eq!(form.submit().kind, BannerKind::Failure);
}

#[test]
fn test_banners_expire_independently() {
    let mut stack = BannerStack::new();
    stack.push(Banner::missing_fields(), 0);
    stack.push(Banner::success("Ann"), 1_000);

    stack.update(BANNER_VISIBLE_MS);
    let stages: Vec<_> = stack.iter().map(|(_, stage)| stage).collect();
    assert_eq!(stages, [BannerStage::Leaving, BannerStage::Visible]);

    stack.update(BANNER_VISIBLE_MS + BANNER_LEAVE_MS);
    assert_eq!(stack.len(), 1);

    stack.update(1_000 + BANNER_VISIBLE_MS + BANNER_LEAVE_MS);
    assert!(stack.is_empty());
}

#[test]
fn test_overlay_caption_shows_banner_text() {
    let mut overlay = Overlay::new();
    let mut form = ContactForm::new("", "", "");
    assert_eq!(overlay.submit(&mut form, 0), BannerKind::Failure);
    assert_eq!(overlay.caption(), format!("[ERROR] {MISSING_FIELDS_MESSAGE}"));
}
