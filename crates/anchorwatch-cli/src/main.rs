use std::path::{Path, PathBuf};
use std::time::Duration;

use anchorwatch_browser::BrowserEngine;
use anchorwatch_core::{AppConfig, ConfigError};
use anchorwatch_probe::{Classification, DetectionWatch, ResultChannel, WatchOutcome};
use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;

#[derive(Parser)]
#[command(
    name = "anchorwatch",
    about = "Report the terminal state of a reCAPTCHA-style checkbox widget"
)]
struct Cli {
    /// Config file (default: ~/.config/anchorwatch/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show the browser window
    #[arg(long, global = true)]
    headed: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load a page and run a single probe pass
    Check {
        /// Page hosting the widget
        #[arg(long)]
        url: String,
    },
    /// Load a page and poll the probe until a terminal state or timeout
    Watch {
        /// Page hosting the widget
        #[arg(long)]
        url: String,

        /// Watch duration in seconds (default: timeouts.animation_secs)
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Polling interval in milliseconds (default: timeouts.poll_interval_ms)
        #[arg(long)]
        poll_interval_ms: Option<u64>,
    },
    /// Manage the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a config file populated with defaults
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Serialize)]
struct Report {
    url: String,
    frames_ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    classification: Option<Classification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<WatchOutcome>,
    channel: ResultChannel,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Command::Config {
            action: ConfigAction::Init { force },
        } => {
            init_tracing("info");
            let path = init_config(cli.config.as_deref(), *force)?;
            println!("{}", path.display());
            Ok(())
        }
        Command::Check { url } => probe_page(&cli, url, None).await,
        Command::Watch {
            url,
            timeout_secs,
            poll_interval_ms,
        } => probe_page(&cli, url, Some((*timeout_secs, *poll_interval_ms))).await,
    }
}

/// Load the page and print a report. `watch` carries optional timeout and
/// interval overrides; `None` runs a single pass.
async fn probe_page(
    cli: &Cli,
    url: &str,
    watch: Option<(Option<u64>, Option<u64>)>,
) -> anyhow::Result<()> {
    let mut config = AppConfig::load_with_env(cli.config.as_deref())
        .context("failed to load configuration")?;
    if cli.headed {
        config.browser.headless = false;
    }

    init_tracing(&config.logging.level);
    tracing::debug!(
        headless = config.browser.headless,
        level = %config.logging.level,
        "{}",
        config_source(cli.config.as_deref())
    );

    let watch = watch.map(|(timeout_secs, poll_interval_ms)| {
        DetectionWatch::new(
            poll_interval_ms.map_or_else(|| config.timeouts.poll_interval(), Duration::from_millis),
            timeout_secs.map_or_else(|| config.timeouts.animation(), Duration::from_secs),
        )
    });

    let engine = BrowserEngine::launch(&config)
        .await
        .context("failed to launch browser")?;
    let report = run(&engine, url, watch).await;
    if let Err(e) = engine.close().await {
        tracing::warn!("browser did not close cleanly: {e}");
    }

    println!("{}", serde_json::to_string_pretty(&report?)?);
    Ok(())
}

/// `RUST_LOG` takes precedence over the configured level. Logs go to stderr so
/// stdout carries only the report.
fn init_tracing(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Describe where the configuration came from.
fn config_source(explicit: Option<&Path>) -> String {
    match explicit
        .map(Path::to_path_buf)
        .or_else(|| AppConfig::config_path().ok())
    {
        Some(path) if path.exists() => format!("config loaded from {}", path.display()),
        Some(path) => format!("no config at {}, using defaults", path.display()),
        None => "no config directory, using defaults".to_string(),
    }
}

/// Write the default configuration, refusing to clobber an existing file unless forced.
fn init_config(explicit: Option<&Path>, force: bool) -> anchorwatch_core::Result<PathBuf> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => AppConfig::config_path()?,
    };
    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists {
            path: path.display().to_string(),
        }
        .into());
    }

    AppConfig::default().save_to(&path)?;
    tracing::info!("wrote default config to {}", path.display());
    Ok(path)
}

async fn run(
    engine: &BrowserEngine,
    url: &str,
    watch: Option<DetectionWatch>,
) -> anchorwatch_core::Result<Report> {
    engine.navigate(url).await?;

    let frames_ready = match engine.wait_for_frames().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("{e}; probing anyway");
            false
        }
    };

    let probe = engine.probe();
    let mut channel = ResultChannel::new();
    let (classification, outcome) = match watch {
        Some(watch) => (None, Some(watch.run(&probe, &mut channel).await)),
        None => (Some(probe.inspect_into(&mut channel).await), None),
    };

    tracing::info!(url, "probe finished");
    Ok(Report {
        url: url.to_string(),
        frames_ready,
        classification,
        outcome,
        channel,
    })
}
