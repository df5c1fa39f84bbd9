//! Terminal-state detection for the checkbox widget.

use crate::channel::ResultChannel;
use crate::classification::Classification;
use crate::frame::{FrameHandle, FrameLocator};
use crate::selectors::{
    AUDIO_ERROR_MARKER, AUDIO_ERROR_SELECTOR, BOT_HEADER_MARKER, BOT_HEADER_SELECTOR,
    CHALLENGE_FRAME_PATTERN, CHECKBOX_ANCHOR_SELECTOR, CHECKBOX_FRAME_PATTERN, CHECKED_ATTRIBUTE,
    CHECKED_VALUE, RETRY_IN_PROGRESS_TEXT,
};

/// Classifies the widget's current DOM.
///
/// The probe holds nothing but its locator. Every call re-locates both frames
/// and evaluates the checks in priority order: blocked, retry, solved. The
/// first match wins. Missing frames or elements are treated as "no match".
#[derive(Debug, Clone)]
pub struct DetectionProbe<L> {
    locator: L,
}

impl<L: FrameLocator> DetectionProbe<L> {
    /// Create a probe reading frames through `locator`.
    pub fn new(locator: L) -> Self {
        Self { locator }
    }

    /// Inspect the page once.
    pub async fn inspect(&self) -> Classification {
        if let Some(challenge) = self
            .locator
            .find_frame_by_source_pattern(CHALLENGE_FRAME_PATTERN)
            .await
        {
            if text_contains(&challenge, BOT_HEADER_SELECTOR, BOT_HEADER_MARKER).await {
                tracing::debug!("bot-detection header present");
                return Classification::Blocked;
            }

            if text_contains(&challenge, AUDIO_ERROR_SELECTOR, AUDIO_ERROR_MARKER).await {
                // Cosmetic only; later passes do not depend on it.
                if !challenge
                    .set_text(AUDIO_ERROR_SELECTOR, RETRY_IN_PROGRESS_TEXT)
                    .await
                {
                    tracing::debug!("audio error message vanished before rewrite");
                }
                tracing::debug!("audio challenge requested another attempt");
                return Classification::RetryRequested;
            }
        }

        if let Some(checkbox) = self
            .locator
            .find_frame_by_source_pattern(CHECKBOX_FRAME_PATTERN)
            .await
        {
            let checked = checkbox
                .attribute_of(CHECKBOX_ANCHOR_SELECTOR, CHECKED_ATTRIBUTE)
                .await;
            if checked.as_deref() == Some(CHECKED_VALUE) {
                tracing::debug!("checkbox anchor reports checked");
                return Classification::Solved;
            }
        }

        Classification::Pending
    }

    /// Inspect the page once and record the result in `channel`.
    pub async fn inspect_into(&self, channel: &mut ResultChannel) -> Classification {
        let classification = self.inspect().await;
        if channel.record(classification) {
            tracing::info!(%classification, "terminal state observed");
        }
        classification
    }
}

async fn text_contains<F: FrameHandle>(frame: &F, selector: &str, marker: &str) -> bool {
    frame
        .text_of(selector)
        .await
        .is_some_and(|text| text.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{SnapshotFrame, SnapshotLocator};

    const ANCHOR_SRC: &str = "https://www.google.com/recaptcha/api2/anchor?ar=1&k=key";
    const BFRAME_SRC: &str = "https://www.google.com/recaptcha/api2/bframe?hl=en&k=key";

    fn checked_anchor(value: &str) -> SnapshotFrame {
        SnapshotFrame::new().with_attribute(CHECKBOX_ANCHOR_SELECTOR, CHECKED_ATTRIBUTE, value)
    }

    #[tokio::test]
    async fn test_no_frames_is_pending() {
        let probe = DetectionProbe::new(SnapshotLocator::new());
        let mut channel = ResultChannel::new();

        assert_eq!(probe.inspect_into(&mut channel).await, Classification::Pending);
        assert!(!channel.any());
    }

    #[tokio::test]
    async fn test_blocked() {
        let locator = SnapshotLocator::new().with_frame(
            BFRAME_SRC,
            SnapshotFrame::new().with_text(BOT_HEADER_SELECTOR, "Try again later"),
        );
        let probe = DetectionProbe::new(locator);
        let mut channel = ResultChannel::new();

        assert_eq!(probe.inspect_into(&mut channel).await, Classification::Blocked);
        assert_eq!(
            channel,
            ResultChannel {
                was_detected: true,
                try_again: false,
                success: false,
            }
        );
    }

    #[tokio::test]
    async fn test_bot_header_without_marker_is_ignored() {
        let locator = SnapshotLocator::new().with_frame(
            BFRAME_SRC,
            SnapshotFrame::new().with_text(BOT_HEADER_SELECTOR, "Please wait"),
        );
        let probe = DetectionProbe::new(locator);
        assert_eq!(probe.inspect().await, Classification::Pending);
    }

    #[tokio::test]
    async fn test_retry_rewrites_message() {
        let challenge = SnapshotFrame::new().with_text(
            AUDIO_ERROR_SELECTOR,
            "Multiple correct solutions required - please solve more.",
        );
        let locator = SnapshotLocator::new().with_frame(BFRAME_SRC, challenge.clone());
        let probe = DetectionProbe::new(locator);
        let mut channel = ResultChannel::new();

        assert_eq!(
            probe.inspect_into(&mut channel).await,
            Classification::RetryRequested
        );
        assert!(channel.try_again);
        assert!(!channel.was_detected);
        assert!(!channel.success);
        assert_eq!(
            challenge.text(AUDIO_ERROR_SELECTOR).as_deref(),
            Some(RETRY_IN_PROGRESS_TEXT)
        );
    }

    #[tokio::test]
    async fn test_retry_rewrite_does_not_mask_solved() {
        let challenge =
            SnapshotFrame::new().with_text(AUDIO_ERROR_SELECTOR, "please solve more.");
        let locator = SnapshotLocator::new()
            .with_frame(BFRAME_SRC, challenge)
            .with_frame(ANCHOR_SRC, checked_anchor("true"));
        let probe = DetectionProbe::new(locator);

        assert_eq!(probe.inspect().await, Classification::RetryRequested);
        // The rewritten text no longer matches, so the next pass falls through.
        assert_eq!(probe.inspect().await, Classification::Solved);
    }

    #[tokio::test]
    async fn test_solved() {
        let locator = SnapshotLocator::new().with_frame(ANCHOR_SRC, checked_anchor("true"));
        let probe = DetectionProbe::new(locator);
        let mut channel = ResultChannel::new();

        assert_eq!(probe.inspect_into(&mut channel).await, Classification::Solved);
        assert!(channel.success);
        assert!(!channel.was_detected);
        assert!(!channel.try_again);
    }

    #[tokio::test]
    async fn test_unchecked_is_pending() {
        let locator = SnapshotLocator::new()
            .with_frame(ANCHOR_SRC, checked_anchor("false"))
            .with_frame(BFRAME_SRC, SnapshotFrame::new());
        let probe = DetectionProbe::new(locator);
        let mut channel = ResultChannel::new();

        assert_eq!(probe.inspect_into(&mut channel).await, Classification::Pending);
        assert_eq!(channel, ResultChannel::default());
    }

    #[tokio::test]
    async fn test_checked_value_is_exact() {
        let locator = SnapshotLocator::new().with_frame(ANCHOR_SRC, checked_anchor("TRUE"));
        let probe = DetectionProbe::new(locator);
        assert_eq!(probe.inspect().await, Classification::Pending);
    }

    #[tokio::test]
    async fn test_blocked_wins_over_solved() {
        let locator = SnapshotLocator::new()
            .with_frame(
                BFRAME_SRC,
                SnapshotFrame::new().with_text(BOT_HEADER_SELECTOR, "Try again later"),
            )
            .with_frame(ANCHOR_SRC, checked_anchor("true"));
        let probe = DetectionProbe::new(locator);
        let mut channel = ResultChannel::new();

        assert_eq!(probe.inspect_into(&mut channel).await, Classification::Blocked);
        assert!(channel.was_detected);
        assert!(!channel.success);
    }

    #[tokio::test]
    async fn test_solved_is_idempotent() {
        let locator = SnapshotLocator::new().with_frame(ANCHOR_SRC, checked_anchor("true"));
        let probe = DetectionProbe::new(locator);
        let mut channel = ResultChannel::new();

        assert_eq!(probe.inspect_into(&mut channel).await, Classification::Solved);
        assert!(channel.success);
        assert_eq!(probe.inspect_into(&mut channel).await, Classification::Solved);
        assert!(channel.success);
    }
}
