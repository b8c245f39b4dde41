//! Crawler module for fetching the homepage and its links
//!
//! This module contains the core pipeline logic, including:
//! - HTTP fetching with bounded timeouts
//! - HTML parsing and link extraction
//! - Reading the target URL from the operator
//! - Overall run coordination

mod fetcher;
mod parser;
mod pipeline;
mod prompt;

pub use fetcher::{build_http_client, Fetcher, HomePage};
pub use parser::{extract_links_simple, parse_html, ParsedPage};
pub use pipeline::{LinkMetrics, Pipeline, PipelineFailure, RunReport, Stage};
pub use prompt::{read_target_url, PROMPT};

use crate::config::Config;
use crate::storage::MetricsStore;

/// Runs the pipeline once with a store supplied by the caller
///
/// This is the main entry point for a run. It will:
/// 1. Build the HTTP clients from configuration
/// 2. Fetch and save the homepage, then create the run row
/// 3. Record, probe and download each distinct link
/// 4. Finalize the run's totals
///
/// # Returns
///
/// * `Ok(RunReport)` - Run completed and finalized
/// * `Err(PipelineFailure)` - Run was abandoned
pub async fn clone_site<S: MetricsStore>(
    config: &Config,
    store: S,
    url: &str,
) -> Result<RunReport, PipelineFailure> {
    let mut pipeline = Pipeline::new(config, store).map_err(|error| PipelineFailure {
        stage: Stage::FetchHomepage,
        run_id: None,
        error,
    })?;
    pipeline.run(url).await
}
