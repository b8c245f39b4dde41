use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Webclone
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// HTTP behaviour for the homepage, the reachability probe and link downloads
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Identifying header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Bound on the homepage GET (milliseconds)
    #[serde(rename = "homepage-timeout-ms")]
    pub homepage_timeout_ms: u64,

    /// Bound on the HEAD reachability probe, applied to connect and to the
    /// whole request (milliseconds)
    #[serde(rename = "probe-timeout-ms")]
    pub probe_timeout_ms: u64,

    /// Bound on each link download (milliseconds)
    #[serde(rename = "download-timeout-ms")]
    pub download_timeout_ms: u64,
}

impl FetcherConfig {
    pub fn homepage_timeout(&self) -> Duration {
        Duration::from_millis(self.homepage_timeout_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_millis(self.download_timeout_ms)
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0".to_string(),
            homepage_timeout_ms: 30_000,
            probe_timeout_ms: 5_000,
            download_timeout_ms: 60_000,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Directory under which the per-host snapshot directory is created
    #[serde(rename = "download-root")]
    pub download_root: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: "webclone.db".to_string(),
            download_root: ".".to_string(),
        }
    }
}
