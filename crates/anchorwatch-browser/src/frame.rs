//! [`FrameLocator`] over a live Chromium page.

use crate::script::{self, FrameReply};
use anchorwatch_probe::{FrameHandle, FrameLocator};
use async_trait::async_trait;
use chromiumoxide::Page;

/// Locates widget frames in a Chromium page.
///
/// Script or transport failures are logged and reported as "not found", so
/// the probe sees them as a miss.
#[derive(Clone)]
pub struct ChromiumFrameLocator {
    page: Page,
}

impl ChromiumFrameLocator {
    pub fn new(page: Page) -> Self {
        Self { page }
    }
}

#[async_trait]
impl FrameLocator for ChromiumFrameLocator {
    type Frame = ChromiumFrame;

    async fn find_frame_by_source_pattern(&self, pattern: &str) -> Option<ChromiumFrame> {
        let reply = evaluate(&self.page, script::frame_present(pattern)).await?;
        reply.found.then(|| ChromiumFrame {
            page: self.page.clone(),
            pattern: pattern.to_string(),
        })
    }
}

/// Handle to one frame, re-resolved by source pattern on every access.
#[derive(Clone)]
pub struct ChromiumFrame {
    page: Page,
    pattern: String,
}

impl ChromiumFrame {
    async fn value(&self, script: String) -> Option<String> {
        evaluate(&self.page, script)
            .await
            .filter(|reply| reply.found)
            .and_then(|reply| reply.value)
    }
}

#[async_trait]
impl FrameHandle for ChromiumFrame {
    async fn text_of(&self, selector: &str) -> Option<String> {
        self.value(script::text_of(&self.pattern, selector)).await
    }

    async fn attribute_of(&self, selector: &str, attribute: &str) -> Option<String> {
        self.value(script::attribute_of(&self.pattern, selector, attribute))
            .await
    }

    async fn set_text(&self, selector: &str, text: &str) -> bool {
        self.value(script::set_text(&self.pattern, selector, text))
            .await
            .is_some()
    }
}

async fn evaluate(page: &Page, script: String) -> Option<FrameReply> {
    let raw: String = match page.evaluate(script).await {
        Ok(result) => match result.into_value() {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!("frame script returned a non-string value: {e}");
                return None;
            }
        },
        Err(e) => {
            tracing::debug!("frame script failed: {e}");
            return None;
        }
    };
    FrameReply::parse(&raw)
}
