use crate::error::{BrowserError, Result};
use crate::frame::ChromiumFrameLocator;
use anchorwatch_core::{AppConfig, TimeoutConfig};
use anchorwatch_probe::selectors::{CHALLENGE_FRAME_PATTERN, CHECKBOX_FRAME_PATTERN};
use anchorwatch_probe::{DetectionProbe, FrameLocator};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures_util::stream::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Switches that keep widget frames in-process so their documents can be read
/// from the embedding page.
const FRAME_ACCESS_ARGS: [&str; 2] = [
    "--disable-web-security",
    "--disable-features=site-per-process",
];

const FRAME_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Browser automation engine hosting a single page
pub struct BrowserEngine {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    timeouts: TimeoutConfig,
}

impl BrowserEngine {
    /// Launch Chromium using the given configuration
    pub async fn launch(config: &AppConfig) -> Result<Self> {
        let browser_config = build_config(config)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::trace!("chromium handler event error: {e}");
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;

        tracing::debug!(headless = config.browser.headless, "browser launched");

        Ok(Self {
            browser,
            page,
            handler,
            timeouts: config.timeouts.clone(),
        })
    }

    /// Navigate the page, bounded by the page-load timeout
    pub async fn navigate(&self, url: &str) -> Result<()> {
        let url = validate_url(url)?;
        tracing::info!("navigating to {url}");

        let timeout = self.timeouts.page_load();
        match tokio::time::timeout(timeout, self.page.goto(url.as_str())).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(BrowserError::NavigationError(e.to_string())),
            Err(_) => Err(BrowserError::Timeout(format!(
                "page load exceeded {timeout:?}"
            ))),
        }
    }

    /// Frame locator bound to this engine's page
    pub fn frame_locator(&self) -> ChromiumFrameLocator {
        ChromiumFrameLocator::new(self.page.clone())
    }

    /// Detection probe bound to this engine's page
    pub fn probe(&self) -> DetectionProbe<ChromiumFrameLocator> {
        DetectionProbe::new(self.frame_locator())
    }

    /// Wait until both widget frames are present, bounded by the iframe timeout
    pub async fn wait_for_frames(&self) -> Result<()> {
        let timeout = self.timeouts.iframe();
        wait_for_frames(&self.frame_locator(), timeout, FRAME_POLL_INTERVAL).await
    }

    /// Close the browser and stop the event handler
    pub async fn close(mut self) -> Result<()> {
        let closed = self
            .browser
            .close()
            .await
            .map(|_| ())
            .map_err(|e| BrowserError::ChromiumError(e.to_string()));
        self.handler.abort();
        closed
    }
}

fn build_config(config: &AppConfig) -> Result<BrowserConfig> {
    let browser = &config.browser;
    let mut builder = BrowserConfig::builder()
        .no_sandbox()
        .window_size(browser.window_width, browser.window_height)
        .request_timeout(config.timeouts.page_load())
        .args(FRAME_ACCESS_ARGS)
        .args(browser.extra_args.iter().map(String::as_str));

    if !browser.headless {
        builder = builder.with_head();
    }
    if let Some(path) = &browser.executable {
        builder = builder.chrome_executable(path);
    }

    builder.build().map_err(BrowserError::ChromiumError)
}

/// Poll `locator` until both widget frames resolve or `timeout` elapses.
pub async fn wait_for_frames<L: FrameLocator>(
    locator: &L,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<()> {
    let poll = async {
        loop {
            let checkbox = locator.find_frame_by_source_pattern(CHECKBOX_FRAME_PATTERN);
            let challenge = locator.find_frame_by_source_pattern(CHALLENGE_FRAME_PATTERN);
            let (checkbox, challenge) = tokio::join!(checkbox, challenge);
            if checkbox.is_some() && challenge.is_some() {
                return;
            }
            tokio::time::sleep(poll_interval).await;
        }
    };

    tokio::time::timeout(timeout, poll)
        .await
        .map_err(|_| BrowserError::FramesNotFound(timeout))?;
    tracing::debug!("widget frames ready");
    Ok(())
}

/// Parse a navigation target, accepting only http(s) URLs with a host
pub fn validate_url(url: &str) -> Result<url::Url> {
    let parsed = url::Url::parse(url)
        .map_err(|e| BrowserError::NavigationError(format!("Invalid URL: {e}")))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(BrowserError::NavigationError(format!(
            "Unsupported scheme: {}",
            parsed.scheme()
        )));
    }
    if parsed.host_str().is_none() {
        return Err(BrowserError::NavigationError("No host in URL".to_string()));
    }
    Ok(parsed)
}
