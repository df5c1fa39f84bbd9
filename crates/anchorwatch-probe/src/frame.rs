//! Frame lookup capability injected into the probe.

use async_trait::async_trait;

/// Finds embedded frames by a substring of their source URL.
///
/// Implementations are tolerant by contract: a frame that is absent, not yet
/// loaded or unreadable is reported as `None`, never as an error.
#[async_trait]
pub trait FrameLocator: Send + Sync {
    /// Handle type for a located frame.
    type Frame: FrameHandle;

    /// Locate the first frame whose source contains `pattern`.
    async fn find_frame_by_source_pattern(&self, pattern: &str) -> Option<Self::Frame>;
}

/// Read/write access to one frame's DOM subtree.
#[async_trait]
pub trait FrameHandle: Send + Sync {
    /// Combined text content of every element matching `selector`.
    ///
    /// Returns `None` when nothing matches.
    async fn text_of(&self, selector: &str) -> Option<String>;

    /// Value of `attribute` on the first element matching `selector`.
    async fn attribute_of(&self, selector: &str, attribute: &str) -> Option<String>;

    /// Replace the displayed text of every element matching `selector`.
    ///
    /// Returns whether any element was rewritten.
    async fn set_text(&self, selector: &str, text: &str) -> bool;
}
