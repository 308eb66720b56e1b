//! Shared "load → compute" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! remote/cache load -> compute_metrics -> latest snapshot
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use tracing::warn;

use crate::data::{HttpSource, LoadedSeries, RemoteSource, load_series};
use crate::domain::{DerivedTable, LatestSnapshot, LoadConfig, Thresholds};
use crate::error::AppError;
use crate::transform::compute_metrics;

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub series: LoadedSeries,
    pub table: DerivedTable,
    pub latest: LatestSnapshot,
}

/// Load the series (remote first, then cache) over HTTP.
pub fn load(config: &LoadConfig) -> Result<LoadedSeries, AppError> {
    load_with(config, HttpSource::new)
}

/// Like [`load`], with the transport built by `connect`.
///
/// A transport that cannot be built is a remote failure like any other: the
/// cache is used instead.
pub fn load_with<S, F>(config: &LoadConfig, connect: F) -> Result<LoadedSeries, AppError>
where
    S: RemoteSource,
    F: FnOnce() -> Result<S, AppError>,
{
    if config.offline {
        return load_series(config, None);
    }
    match connect() {
        Ok(source) => load_series(config, Some(&source as &dyn RemoteSource)),
        Err(e) => {
            warn!("HTTP client unavailable, using cache: {e}");
            load_series(config, None)
        }
    }
}

/// Load and compute in one go.
pub fn run(config: &LoadConfig, thresholds: &Thresholds) -> Result<RunOutput, AppError> {
    let series = load(config)?;
    compute(series, thresholds)
}

/// Compute metrics for an already-loaded series.
///
/// The TUI uses this to re-run the pipeline on threshold changes without
/// re-fetching.
pub fn compute(series: LoadedSeries, thresholds: &Thresholds) -> Result<RunOutput, AppError> {
    let table = compute_metrics(&series.data.observations, thresholds);
    // Guard before anything indexes into the table.
    let latest = table.latest()?;

    Ok(RunOutput {
        series,
        table,
        latest,
    })
}
