//! Statistics read back from the metrics database
//!
//! This module loads recorded runs with their links and renders them for
//! the `--stats` mode.

use crate::storage::{LinkRecord, MetricsStore, RunRecord};
use crate::CloneError;
use chrono::{DateTime, Utc};
use std::io::{self, Write};

/// One recorded run with its links
#[derive(Debug, Clone)]
pub struct RunStatistics {
    pub run: RunRecord,
    pub links: Vec<LinkRecord>,
}

impl RunStatistics {
    /// Number of links with non-zero recorded metrics
    pub fn measured_links(&self) -> usize {
        self.links.iter().filter(|link| link.has_metrics()).count()
    }

    /// Wall-clock duration between the run's start and end stamps
    pub fn duration_seconds(&self) -> Option<i64> {
        let started = self.run.started_at.as_deref()?.parse::<DateTime<Utc>>().ok()?;
        let finished = self.run.finished_at.as_deref()?.parse::<DateTime<Utc>>().ok()?;
        Some((finished - started).num_seconds())
    }
}

/// Loads statistics for every run in storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
///
/// # Returns
///
/// * `Ok(Vec<RunStatistics>)` - Runs oldest first, each with its links
/// * `Err(CloneError)` - Failed to query storage
pub fn load_statistics(storage: &dyn MetricsStore) -> Result<Vec<RunStatistics>, CloneError> {
    let mut statistics = Vec::new();

    for run in storage.list_runs()? {
        let links = storage.get_links(run.id)?;
        statistics.push(RunStatistics { run, links });
    }

    Ok(statistics)
}

/// Writes statistics in a human-readable layout
pub fn write_statistics<W: Write>(out: &mut W, stats: &[RunStatistics]) -> io::Result<()> {
    writeln!(out, "=== Download Statistics ===\n")?;

    if stats.is_empty() {
        writeln!(out, "No runs recorded.")?;
        return Ok(());
    }

    for entry in stats {
        let run = &entry.run;
        writeln!(out, "Run {}: {}", run.id, run.website_name)?;
        writeln!(
            out,
            "  Started: {}",
            run.started_at.as_deref().unwrap_or("-")
        )?;
        writeln!(
            out,
            "  Finished: {}",
            run.finished_at.as_deref().unwrap_or("-")
        )?;
        if let Some(seconds) = entry.duration_seconds() {
            writeln!(out, "  Duration: {}s", seconds)?;
        }
        writeln!(
            out,
            "  Totals: {}ms, {}KB",
            run.total_elapsed_ms, run.total_kilobytes
        )?;
        writeln!(
            out,
            "  Links: {} ({} with non-zero metrics)",
            entry.links.len(),
            entry.measured_links()
        )?;

        for link in &entry.links {
            writeln!(
                out,
                "    - {} [{}ms, {}KB]",
                link.url, link.elapsed_ms, link.kilobytes
            )?;
        }
        writeln!(out)?;
    }

    Ok(())
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &[RunStatistics]) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_statistics(&mut handle, stats)
}
