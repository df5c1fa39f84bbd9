//! Polling loop that drives the probe until a terminal state or timeout.

use crate::channel::ResultChannel;
use crate::frame::FrameLocator;
use crate::probe::DetectionProbe;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// How a detection watch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchOutcome {
    /// The session was flagged as automated
    Detected,
    /// The checkbox was verified
    Solved,
    /// The audio challenge wants another attempt; the retry flag has been consumed
    TryAgain,
    /// No terminal state appeared before the timeout; the challenge is still open
    SafePassage,
}

/// Repeatedly invokes a [`DetectionProbe`] on a fixed cadence.
#[derive(Debug, Clone, Copy)]
pub struct DetectionWatch {
    poll_interval: Duration,
    timeout: Duration,
}

impl DetectionWatch {
    /// Create a watch polling every `poll_interval` for at most `timeout`.
    ///
    /// A zero interval is bumped to one millisecond.
    #[must_use]
    pub fn new(poll_interval: Duration, timeout: Duration) -> Self {
        Self {
            poll_interval: poll_interval.max(Duration::from_millis(1)),
            timeout,
        }
    }

    /// Poll until the probe reports a terminal classification or the timeout elapses.
    ///
    /// Each pass is recorded in `channel`. The outcome is then read back from
    /// the channel with detection taking precedence over success, and success
    /// over retry.
    pub async fn run<L: FrameLocator>(
        &self,
        probe: &DetectionProbe<L>,
        channel: &mut ResultChannel,
    ) -> WatchOutcome {
        let poll = async {
            let mut ticker = tokio::time::interval(self.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let classification = probe.inspect_into(channel).await;
                tracing::trace!(%classification, "probe pass");
                if classification.is_terminal() {
                    break;
                }
            }
        };

        if tokio::time::timeout(self.timeout, poll).await.is_err() {
            tracing::debug!(timeout = ?self.timeout, "no terminal state before timeout");
            return WatchOutcome::SafePassage;
        }

        let outcome = Self::outcome_from(channel);
        tracing::debug!(?outcome, "detection watch finished");
        outcome
    }

    fn outcome_from(channel: &mut ResultChannel) -> WatchOutcome {
        if channel.was_detected {
            WatchOutcome::Detected
        } else if channel.success {
            WatchOutcome::Solved
        } else if channel.take_retry() {
            WatchOutcome::TryAgain
        } else {
            WatchOutcome::SafePassage
        }
    }
}
