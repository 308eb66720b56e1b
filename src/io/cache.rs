//! Cache file writer.
//!
//! The cache is the only thing persisted between runs. It uses the canonical
//! `Area,Indicator,Date,Value` layout, which `ingest` reads back unchanged.
//! `Area` is written only when some observation has one, so a cache built from
//! an area-less source is not emptied by the country filter on the next read.

use std::fs::{File, create_dir_all};
use std::path::Path;

use tracing::info;

use crate::domain::Observation;
use crate::error::AppError;

const HEADER: [&str; 4] = ["Area", "Indicator", "Date", "Value"];

/// Write observations to a cache CSV, creating parent directories as needed.
pub fn write_observations_csv(path: &Path, observations: &[Observation]) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent).map_err(|e| {
            AppError::runtime(format!("Failed to create cache directory '{}': {e}", parent.display()))
        })?;
    }

    let file = File::create(path)
        .map_err(|e| AppError::runtime(format!("Failed to create cache CSV '{}': {e}", path.display())))?;
    let mut writer = csv::Writer::from_writer(file);
    let with_area = observations.iter().any(|o| o.area.is_some());
    let skip = usize::from(!with_area);

    writer
        .write_record(&HEADER[skip..])
        .map_err(|e| AppError::runtime(format!("Failed to write cache CSV header: {e}")))?;
    for obs in observations {
        let record = [
            obs.area.clone().unwrap_or_default(),
            obs.indicator.clone(),
            obs.date.format("%Y-%m-%d").to_string(),
            obs.value.to_string(),
        ];
        writer
            .write_record(&record[skip..])
            .map_err(|e| AppError::runtime(format!("Failed to write cache CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::runtime(format!("Failed to flush cache CSV: {e}")))?;

    info!(path = %path.display(), rows = observations.len(), "wrote cache file");
    Ok(())
}
