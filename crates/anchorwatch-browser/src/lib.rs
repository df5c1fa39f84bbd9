//! Chromium integration for the Anchorwatch detection probe.
//!
//! Launches a browser, loads the page hosting the widget, and exposes its
//! frames to [`anchorwatch_probe::DetectionProbe`] through
//! [`ChromiumFrameLocator`].

pub mod engine;
pub mod error;
pub mod frame;
pub mod script;

pub use engine::{validate_url, wait_for_frames, BrowserEngine};
pub use error::{BrowserError, Result};
pub use frame::{ChromiumFrame, ChromiumFrameLocator};
