//! Download-and-record pipeline
//!
//! One run moves through these stages, stopping at the first hard failure:
//!
//! `PromptInput → FetchHomepage → PersistHomepage → CreateRun → ExtractLinks
//! → ProcessLinks → FinalizeRun`
//!
//! Failures before the run row exists leave no trace in the database; a
//! failure afterwards leaves the run unfinalized. Failures while processing
//! a single link are logged and the loop moves on to the next link.

use crate::config::Config;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::parse_html;
use crate::files::{write_file, HOMEPAGE_FILE_NAME};
use crate::storage::MetricsStore;
use crate::url::{is_downloadable, link_file_name, target_name};
use crate::CloneError;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Pipeline stage, used to report where a run was abandoned
///
/// Link extraction cannot fail and link processing never aborts the run,
/// so neither has a variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    PromptInput,
    FetchHomepage,
    PersistHomepage,
    CreateRun,
    FinalizeRun,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PromptInput => "prompt-input",
            Self::FetchHomepage => "fetch-homepage",
            Self::PersistHomepage => "persist-homepage",
            Self::CreateRun => "create-run",
            Self::FinalizeRun => "finalize-run",
        };
        write!(f, "{}", name)
    }
}

/// A run that stopped before completing
#[derive(Debug, Error)]
#[error("Run abandoned at {stage}: {error}")]
pub struct PipelineFailure {
    /// Stage in which the run stopped
    pub stage: Stage,
    /// The run row left unfinalized, if one had been created
    pub run_id: Option<i64>,
    #[source]
    pub error: CloneError,
}

impl PipelineFailure {
    fn new(stage: Stage, run_id: Option<i64>, error: impl Into<CloneError>) -> Self {
        Self {
            stage,
            run_id,
            error: error.into(),
        }
    }
}

/// Summary of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub run_id: i64,
    pub target_name: String,
    /// Directory holding `index.html` and the downloaded links
    pub directory: PathBuf,
    /// Distinct links discovered on the homepage
    pub links_found: usize,
    pub downloaded: usize,
    /// Links not attempted: unsupported scheme or failed reachability probe
    pub skipped: usize,
    /// Links whose recording, download or write failed
    pub failed: usize,
}

/// Elapsed time and size of one download
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkMetrics {
    pub elapsed_ms: i64,
    /// Whole KiB (bytes / 1024)
    pub kilobytes: i64,
}

impl LinkMetrics {
    pub fn measure(elapsed: Duration, bytes: usize) -> Self {
        Self {
            elapsed_ms: i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX),
            kilobytes: i64::try_from(bytes / 1024).unwrap_or(i64::MAX),
        }
    }
}

/// Outcome of processing one link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkOutcome {
    Downloaded,
    Unsupported,
    Unreachable,
    Failed,
}

/// Writes a link's metrics when dropped
///
/// Whatever has been recorded by the time the download attempt ends (zero if
/// nothing was) is persisted, whichever way the attempt exits.
struct LinkMetricsGuard<'a, S: MetricsStore> {
    store: &'a mut S,
    url: &'a str,
    run_id: i64,
    metrics: LinkMetrics,
}

impl<'a, S: MetricsStore> LinkMetricsGuard<'a, S> {
    fn new(store: &'a mut S, url: &'a str, run_id: i64) -> Self {
        Self {
            store,
            url,
            run_id,
            metrics: LinkMetrics::default(),
        }
    }

    fn record(&mut self, metrics: LinkMetrics) {
        self.metrics = metrics;
    }
}

impl<'a, S: MetricsStore> Drop for LinkMetricsGuard<'a, S> {
    fn drop(&mut self) {
        let result = self.store.update_link(
            self.url,
            self.run_id,
            self.metrics.elapsed_ms,
            self.metrics.kilobytes,
        );

        match result {
            Ok(0) => tracing::warn!("No link row for {} in run {}", self.url, self.run_id),
            Ok(_) => tracing::debug!(
                "Recorded {}ms / {}KB for {}",
                self.metrics.elapsed_ms,
                self.metrics.kilobytes,
                self.url
            ),
            Err(e) => tracing::warn!("DB update failed for link {}: {}", self.url, e),
        }
    }
}

/// Runs the pipeline against one target URL
///
/// The metrics store is handed in by the caller and used for the whole run.
pub struct Pipeline<S: MetricsStore> {
    fetcher: Fetcher,
    store: S,
    download_root: PathBuf,
}

impl<S: MetricsStore> Pipeline<S> {
    /// Creates a pipeline from configuration
    pub fn new(config: &Config, store: S) -> Result<Self, CloneError> {
        let fetcher = Fetcher::new(&config.fetcher)?;
        Ok(Self::with_fetcher(
            fetcher,
            store,
            &config.output.download_root,
        ))
    }

    /// Creates a pipeline from an already built fetcher
    pub fn with_fetcher(fetcher: Fetcher, store: S, download_root: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            store,
            download_root: download_root.into(),
        }
    }

    /// The metrics store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the pipeline, returning its metrics store
    pub fn into_store(self) -> S {
        self.store
    }

    /// Runs once against `input`
    ///
    /// # Returns
    ///
    /// * `Ok(RunReport)` - The run was finalized
    /// * `Err(PipelineFailure)` - The run was abandoned at the reported stage
    pub async fn run(&mut self, input: &str) -> Result<RunReport, PipelineFailure> {
        let url = input.trim();
        let target =
            target_name(url).map_err(|e| PipelineFailure::new(Stage::PromptInput, None, e))?;
        let directory = self.download_root.join(&target);

        tracing::info!("Downloading {} into {}", url, directory.display());

        let started = Instant::now();
        let homepage = self
            .fetcher
            .fetch_document(url)
            .await
            .map_err(|e| PipelineFailure::new(Stage::FetchHomepage, None, e))?;
        write_file(&directory, HOMEPAGE_FILE_NAME, &homepage.body)
            .map_err(|e| PipelineFailure::new(Stage::PersistHomepage, None, e))?;
        let homepage_metrics = LinkMetrics::measure(started.elapsed(), homepage.body.len());

        let run_id = self
            .store
            .create_run(
                &target,
                homepage_metrics.elapsed_ms,
                homepage_metrics.kilobytes,
            )
            .map_err(|e| PipelineFailure::new(Stage::CreateRun, None, e))?;

        tracing::info!(
            "Run {} created: homepage {}ms / {}KB",
            run_id,
            homepage_metrics.elapsed_ms,
            homepage_metrics.kilobytes
        );

        let parsed = parse_html(&homepage.html(), &homepage.url);
        if let Some(title) = &parsed.title {
            tracing::info!("Homepage title: {}", title);
        }
        tracing::info!("Scanning {} links...", parsed.links.len());

        let mut report = RunReport {
            run_id,
            target_name: target,
            directory: directory.clone(),
            links_found: 0,
            downloaded: 0,
            skipped: 0,
            failed: 0,
        };
        let mut visited: HashSet<String> = HashSet::new();

        for link in parsed.links {
            if !visited.insert(link.clone()) {
                continue;
            }

            tracing::info!("Found: {}", link);
            report.links_found += 1;

            match self.process_link(&link, run_id, &directory).await {
                LinkOutcome::Downloaded => report.downloaded += 1,
                LinkOutcome::Unsupported | LinkOutcome::Unreachable => report.skipped += 1,
                LinkOutcome::Failed => report.failed += 1,
            }
        }

        self.store
            .finalize_run(run_id)
            .map_err(|e| PipelineFailure::new(Stage::FinalizeRun, Some(run_id), e))?;

        tracing::info!(
            "Website download completed: {} links, {} downloaded, {} skipped, {} failed",
            report.links_found,
            report.downloaded,
            report.skipped,
            report.failed
        );

        Ok(report)
    }

    /// Records a link, then downloads it if its scheme and probe allow
    async fn process_link(&mut self, url: &str, run_id: i64, directory: &Path) -> LinkOutcome {
        if let Err(e) = self.store.create_link(url, run_id) {
            tracing::warn!("Failed to record link {}: {}", url, e);
            return LinkOutcome::Failed;
        }

        if !is_downloadable(url) {
            tracing::info!("Skipping unsupported link: {}", url);
            return LinkOutcome::Unsupported;
        }

        if !self.fetcher.validate_reachable(url).await {
            tracing::info!("Invalid or unreachable link: {}", url);
            return LinkOutcome::Unreachable;
        }

        self.download_link(url, run_id, directory).await
    }

    /// Downloads one link and writes it under the run directory
    ///
    /// The link row is updated on every exit path.
    async fn download_link(&mut self, url: &str, run_id: i64, directory: &Path) -> LinkOutcome {
        let mut guard = LinkMetricsGuard::new(&mut self.store, url, run_id);

        let started = Instant::now();
        let bytes = match self.fetcher.fetch_bytes(url).await {
            Ok(bytes) => bytes,
            Err(e) if e.is_timeout() => {
                tracing::warn!("Timeout downloading: {}", url);
                return LinkOutcome::Failed;
            }
            Err(e) => {
                tracing::warn!("Failed to download link {}: {}", url, e);
                return LinkOutcome::Failed;
            }
        };
        guard.record(LinkMetrics::measure(started.elapsed(), bytes.len()));

        match write_file(directory, &link_file_name(url), &bytes) {
            Ok(path) => {
                tracing::debug!("Saved {} to {}", url, path.display());
                LinkOutcome::Downloaded
            }
            Err(e) => {
                tracing::warn!("Failed to save link {}: {}", url, e);
                LinkOutcome::Failed
            }
        }
    }
}
