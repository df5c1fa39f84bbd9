//! In-memory frames for driving the probe without a browser.
//!
//! Selectors match by exact string, which is all the probe needs.

use crate::frame::{FrameHandle, FrameLocator};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Default)]
struct SnapshotElement {
    selector: String,
    text: String,
    attributes: HashMap<String, String>,
}

/// A frame's DOM reduced to a list of selector-addressed elements.
///
/// Clones share the same elements, so a test can keep one handle and observe
/// rewrites made through another.
#[derive(Debug, Clone, Default)]
pub struct SnapshotFrame {
    elements: Arc<Mutex<Vec<SnapshotElement>>>,
}

impl SnapshotFrame {
    /// Create an empty frame.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element matched by `selector` with the given text.
    #[must_use]
    pub fn with_text(self, selector: &str, text: &str) -> Self {
        self.lock().push(SnapshotElement {
            selector: selector.to_string(),
            text: text.to_string(),
            attributes: HashMap::new(),
        });
        self
    }

    /// Set an attribute on the first element matched by `selector`, adding one if needed.
    #[must_use]
    pub fn with_attribute(self, selector: &str, name: &str, value: &str) -> Self {
        {
            let mut elements = self.lock();
            let index = match elements.iter().position(|e| e.selector == selector) {
                Some(index) => index,
                None => {
                    elements.push(SnapshotElement {
                        selector: selector.to_string(),
                        ..SnapshotElement::default()
                    });
                    elements.len() - 1
                }
            };
            elements[index]
                .attributes
                .insert(name.to_string(), value.to_string());
        }
        self
    }

    /// Current combined text of elements matched by `selector`.
    #[must_use]
    pub fn text(&self, selector: &str) -> Option<String> {
        let elements = self.lock();
        let mut matched = elements.iter().filter(|e| e.selector == selector).peekable();
        matched.peek()?;
        Some(matched.map(|e| e.text.as_str()).collect())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<SnapshotElement>> {
        self.elements.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl FrameHandle for SnapshotFrame {
    async fn text_of(&self, selector: &str) -> Option<String> {
        self.text(selector)
    }

    async fn attribute_of(&self, selector: &str, attribute: &str) -> Option<String> {
        self.lock()
            .iter()
            .find(|e| e.selector == selector)
            .and_then(|e| e.attributes.get(attribute).cloned())
    }

    async fn set_text(&self, selector: &str, text: &str) -> bool {
        let mut rewritten = false;
        for element in self.lock().iter_mut().filter(|e| e.selector == selector) {
            element.text = text.to_string();
            rewritten = true;
        }
        rewritten
    }
}

/// A page holding zero or more [`SnapshotFrame`]s keyed by source URL.
#[derive(Debug, Clone, Default)]
pub struct SnapshotLocator {
    frames: Vec<(String, SnapshotFrame)>,
}

impl SnapshotLocator {
    /// Create a page with no frames.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Embed `frame` under the given source URL.
    #[must_use]
    pub fn with_frame(mut self, source: &str, frame: SnapshotFrame) -> Self {
        self.frames.push((source.to_string(), frame));
        self
    }
}

#[async_trait]
impl FrameLocator for SnapshotLocator {
    type Frame = SnapshotFrame;

    async fn find_frame_by_source_pattern(&self, pattern: &str) -> Option<SnapshotFrame> {
        self.frames
            .iter()
            .find(|(source, _)| source.contains(pattern))
            .map(|(_, frame)| frame.clone())
    }
}
