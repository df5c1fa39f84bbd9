//! Caller-owned record of terminal classifications.

use crate::classification::Classification;
use serde::{Deserialize, Serialize};

/// Three independent flags, one per terminal classification.
///
/// Recording only ever moves a flag from `false` to `true`. Clearing is left
/// to the owner through [`reset`](Self::reset) and [`take_retry`](Self::take_retry).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultChannel {
    /// Set once a `Blocked` pass has been recorded
    #[serde(rename = "wasdetected")]
    pub was_detected: bool,
    /// Set once a `RetryRequested` pass has been recorded
    #[serde(rename = "tryagain")]
    pub try_again: bool,
    /// Set once a `Solved` pass has been recorded
    pub success: bool,
}

impl ResultChannel {
    /// Create a channel with every flag cleared.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a classification.
    ///
    /// Returns `true` if this call raised a flag that was previously clear.
    pub fn record(&mut self, classification: Classification) -> bool {
        let slot = match classification {
            Classification::Blocked => &mut self.was_detected,
            Classification::RetryRequested => &mut self.try_again,
            Classification::Solved => &mut self.success,
            Classification::Pending => return false,
        };
        let newly_set = !*slot;
        *slot = true;
        newly_set
    }

    /// Read the retry flag and clear it.
    pub fn take_retry(&mut self) -> bool {
        std::mem::take(&mut self.try_again)
    }

    /// Clear every flag before a new attempt.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Check if any flag is raised
    #[must_use]
    pub fn any(&self) -> bool {
        self.was_detected || self.try_again || self.success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_sets_only_matching_slot() {
        let mut channel = ResultChannel::new();
        assert!(channel.record(Classification::Blocked));
        assert_eq!(
            channel,
            ResultChannel {
                was_detected: true,
                try_again: false,
                success: false,
            }
        );
    }

    #[test]
    fn test_record_is_idempotent() {
        let mut channel = ResultChannel::new();
        assert!(channel.record(Classification::Solved));
        assert!(!channel.record(Classification::Solved));
        assert!(channel.success);
    }

    #[test]
    fn test_pending_records_nothing() {
        let mut channel = ResultChannel::new();
        assert!(!channel.record(Classification::Pending));
        assert!(!channel.any());
    }

    #[test]
    fn test_slots_never_regress() {
        let mut channel = ResultChannel::new();
        channel.record(Classification::Solved);
        channel.record(Classification::Pending);
        channel.record(Classification::Blocked);
        assert!(channel.success);
        assert!(channel.was_detected);
    }

    #[test]
    fn test_take_retry_clears_flag() {
        let mut channel = ResultChannel::new();
        channel.record(Classification::RetryRequested);
        assert!(channel.take_retry());
        assert!(!channel.take_retry());
        assert!(!channel.try_again);
    }

    #[test]
    fn test_reset() {
        let mut channel = ResultChannel::new();
        channel.record(Classification::Blocked);
        channel.record(Classification::Solved);
        channel.reset();
        assert!(!channel.any());
    }

    #[test]
    fn test_serialized_keys() {
        let mut channel = ResultChannel::new();
        channel.record(Classification::Blocked);
        let json = serde_json::to_value(channel).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"wasdetected": true, "tryagain": false, "success": false})
        );
    }
}
