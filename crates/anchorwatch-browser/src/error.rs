use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BrowserError>;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("chromium error: {0}")]
    ChromiumError(String),

    #[error("navigation failed: {0}")]
    NavigationError(String),

    #[error("widget frames not found within {0:?}")]
    FramesNotFound(Duration),

    #[error("timeout: {0}")]
    Timeout(String),
}

impl From<BrowserError> for anchorwatch_core::AnchorwatchError {
    fn from(err: BrowserError) -> Self {
        Self::Browser(err.to_string())
    }
}
