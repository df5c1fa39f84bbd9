use anchorwatch_probe::selectors::{
    AUDIO_ERROR_SELECTOR, BOT_HEADER_SELECTOR, CHALLENGE_FRAME_PATTERN, CHECKBOX_ANCHOR_SELECTOR,
    CHECKBOX_FRAME_PATTERN, CHECKED_ATTRIBUTE, RETRY_IN_PROGRESS_TEXT,
};
use anchorwatch_probe::{
    Classification, DetectionProbe, FrameHandle, FrameLocator, ResultChannel, SnapshotFrame,
    SnapshotLocator,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const ANCHOR_SRC: &str = "https://www.google.com/recaptcha/api2/anchor?ar=1&k=site-key&co=aHR0cHM6";
const BFRAME_SRC: &str = "https://www.google.com/recaptcha/api2/bframe?hl=en&v=abc&k=site-key";

/// Page state shorthand used to build every combination of conditions.
#[derive(Debug, Clone, Copy)]
struct Conditions {
    blocked: bool,
    retry: bool,
    checked: Option<&'static str>,
}

fn page(conditions: Conditions) -> (SnapshotLocator, SnapshotFrame) {
    let mut challenge = SnapshotFrame::new();
    if conditions.blocked {
        challenge = challenge.with_text(
            BOT_HEADER_SELECTOR,
            "Try again later\nYour computer or network may be sending automated queries.",
        );
    }
    if conditions.retry {
        challenge = challenge.with_text(
            AUDIO_ERROR_SELECTOR,
            "Multiple correct solutions required - please solve more.",
        );
    }

    let mut locator = SnapshotLocator::new().with_frame(BFRAME_SRC, challenge.clone());
    if let Some(value) = conditions.checked {
        locator = locator.with_frame(
            ANCHOR_SRC,
            SnapshotFrame::new().with_attribute(CHECKBOX_ANCHOR_SELECTOR, CHECKED_ATTRIBUTE, value),
        );
    }
    (locator, challenge)
}

fn expected(conditions: Conditions) -> Classification {
    if conditions.blocked {
        Classification::Blocked
    } else if conditions.retry {
        Classification::RetryRequested
    } else if conditions.checked == Some("true") {
        Classification::Solved
    } else {
        Classification::Pending
    }
}

#[tokio::test]
async fn test_priority_across_all_combinations() {
    for blocked in [false, true] {
        for retry in [false, true] {
            for checked in [None, Some("false"), Some("true")] {
                let conditions = Conditions {
                    blocked,
                    retry,
                    checked,
                };
                let (locator, _) = page(conditions);
                let probe = DetectionProbe::new(locator);
                let mut channel = ResultChannel::new();

                let got = probe.inspect_into(&mut channel).await;
                let want = expected(conditions);
                assert_eq!(got, want, "conditions: {conditions:?}");

                // Exactly the matching slot is raised, or none for Pending
                let raised = [channel.was_detected, channel.try_again, channel.success];
                assert_eq!(
                    raised.iter().filter(|r| **r).count(),
                    usize::from(want.is_terminal()),
                    "conditions: {conditions:?}"
                );
            }
        }
    }
}

#[tokio::test]
async fn test_retry_message_only_rewritten_on_retry() {
    let (locator, challenge) = page(Conditions {
        blocked: true,
        retry: true,
        checked: None,
    });
    let probe = DetectionProbe::new(locator);

    assert_eq!(probe.inspect().await, Classification::Blocked);
    // Blocked short-circuits before the audio check, so nothing is rewritten
    assert!(challenge
        .text(AUDIO_ERROR_SELECTOR)
        .is_some_and(|t| t.contains("please solve more")));

    let (locator, challenge) = page(Conditions {
        blocked: false,
        retry: true,
        checked: None,
    });
    assert_eq!(
        DetectionProbe::new(locator).inspect().await,
        Classification::RetryRequested
    );
    assert_eq!(
        challenge.text(AUDIO_ERROR_SELECTOR).as_deref(),
        Some(RETRY_IN_PROGRESS_TEXT)
    );
}

#[tokio::test]
async fn test_channel_is_monotonic_across_passes() {
    let (locator, _) = page(Conditions {
        blocked: false,
        retry: false,
        checked: Some("true"),
    });
    let probe = DetectionProbe::new(locator);
    let mut channel = ResultChannel::new();

    for _ in 0..3 {
        assert_eq!(probe.inspect_into(&mut channel).await, Classification::Solved);
        assert!(channel.success);
    }

    // A later pending pass on a different page never lowers the flag
    let empty = DetectionProbe::new(SnapshotLocator::new());
    assert_eq!(empty.inspect_into(&mut channel).await, Classification::Pending);
    assert!(channel.success);
}

/// Locator whose frames never resolve, counting lookups.
#[derive(Default)]
struct AbsentLocator {
    lookups: Arc<AtomicUsize>,
}

struct NeverFrame;

#[async_trait]
impl FrameHandle for NeverFrame {
    async fn text_of(&self, _selector: &str) -> Option<String> {
        None
    }

    async fn attribute_of(&self, _selector: &str, _attribute: &str) -> Option<String> {
        None
    }

    async fn set_text(&self, _selector: &str, _text: &str) -> bool {
        false
    }
}

#[async_trait]
impl FrameLocator for AbsentLocator {
    type Frame = NeverFrame;

    async fn find_frame_by_source_pattern(&self, pattern: &str) -> Option<NeverFrame> {
        assert!(pattern == CHALLENGE_FRAME_PATTERN || pattern == CHECKBOX_FRAME_PATTERN);
        self.lookups.fetch_add(1, Ordering::SeqCst);
        None
    }
}

#[tokio::test]
async fn test_frames_relocated_every_pass() {
    let lookups = Arc::new(AtomicUsize::new(0));
    let probe = DetectionProbe::new(AbsentLocator {
        lookups: Arc::clone(&lookups),
    });

    assert_eq!(probe.inspect().await, Classification::Pending);
    assert_eq!(probe.inspect().await, Classification::Pending);
    assert_eq!(lookups.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_frames_present_but_elements_missing() {
    let probe = DetectionProbe::new(NeverFrameLocator);
    let mut channel = ResultChannel::new();
    assert_eq!(probe.inspect_into(&mut channel).await, Classification::Pending);
    assert!(!channel.any());
}

struct NeverFrameLocator;

#[async_trait]
impl FrameLocator for NeverFrameLocator {
    type Frame = NeverFrame;

    async fn find_frame_by_source_pattern(&self, _pattern: &str) -> Option<NeverFrame> {
        Some(NeverFrame)
    }
}
