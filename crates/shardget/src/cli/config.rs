use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail, ensure};
use serde::Deserialize;
use shardget_fetch::core::is_reserved_header;
use shardget_fetch::data::DEFAULT_CONCURRENCY;

use super::app::App;

const DEFAULT_PROGRESS_INTERVAL_MS: u64 = 100;

/// Defaults read from a TOML file; every key is optional.
///
/// ```toml
/// concurrency = 8
/// progress = true
/// progress_interval_ms = 250
/// connect_timeout_secs = 10
///
/// [headers]
/// Authorization = "Bearer token"
/// ```
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub concurrency: Option<usize>,
    pub progress: Option<bool>,
    pub progress_interval_ms: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
    pub headers: BTreeMap<String, String>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;

        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}

/// Effective settings for one run: command line and environment first,
/// then the config file, then built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub url: String,
    pub concurrency: usize,
    pub output: Option<PathBuf>,
    pub headers: Vec<(String, String)>,
    pub progress: bool,
    pub progress_interval: Duration,
    pub connect_timeout: Option<Duration>,
}

impl Settings {
    pub fn resolve(app: App, config: Config) -> Result<Self> {
        let concurrency = app
            .concurrency
            .or(config.concurrency)
            .unwrap_or(DEFAULT_CONCURRENCY);
        ensure!(concurrency >= 1, "concurrency must be at least 1");

        let progress_interval = app
            .progress_interval
            .or(config.progress_interval_ms)
            .unwrap_or(DEFAULT_PROGRESS_INTERVAL_MS)
            .max(1);

        let progress = !app.no_progress && config.progress.unwrap_or(true);

        if let Some(name) = config.headers.keys().find(|name| is_reserved_header(name)) {
            bail!("header `{name}` is set per shard and cannot be configured");
        }
        let mut headers: Vec<(String, String)> = config.headers.into_iter().collect();
        headers.extend(app.headers);

        Ok(Self {
            url: app.url,
            concurrency,
            output: app.output,
            headers,
            progress,
            progress_interval: Duration::from_millis(progress_interval),
            connect_timeout: app
                .connect_timeout
                .or(config.connect_timeout_secs)
                .map(Duration::from_secs),
        })
    }
}
