//! Command-line parsing for the CPI heat dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the loader and pipeline code. Every data flag has an environment
//! fallback so a `.env` file can pin the cache path, country and source URLs.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::data::source::DEFAULT_SOURCE_URLS;
use crate::domain::{Language, LoadConfig, Session, Thresholds};
use crate::error::AppError;

pub const DEFAULT_CACHE_PATH: &str = "data/sample_food_cpi_sa.csv";

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "heat", version, about = "Food CPI heat dashboard (MoM/YoY alerts)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive dashboard (default).
    Tui(DashboardArgs),
    /// Print KPIs, a trend plot and the alert table.
    Report(ReportArgs),
    /// Print only the alert table (useful for scripting).
    Alerts(DashboardArgs),
    /// Write the derived table (CSV) and/or a run summary (JSON).
    Export(ExportArgs),
    /// Write a synthetic cache file for offline use.
    Sample(SampleArgs),
}

/// Where observations come from.
#[derive(Debug, Args, Clone)]
pub struct SourceArgs {
    /// Cache CSV used when the remote source is unavailable.
    #[arg(long, env = "CPI_CACHE_PATH", default_value = DEFAULT_CACHE_PATH)]
    pub cache: PathBuf,

    /// Keep rows whose Area contains this text (case-insensitive). Empty disables the filter.
    #[arg(long, env = "CPI_COUNTRY", default_value = "Saudi")]
    pub country: String,

    /// Remote CSV endpoint(s), tried in order. Defaults to the FAOSTAT/HDX proxy.
    #[arg(long = "source-url", env = "CPI_SOURCE_URL", value_delimiter = ',')]
    pub source_urls: Vec<String>,

    /// Skip the remote fetch and read the cache directly.
    #[arg(long)]
    pub offline: bool,

    /// Rewrite the cache file after a successful remote fetch.
    #[arg(long)]
    pub refresh_cache: bool,
}

/// Per-session settings.
#[derive(Debug, Args, Clone)]
pub struct SessionArgs {
    /// YoY alert threshold in percent (0–10).
    #[arg(long, default_value_t = 3.0)]
    pub yoy: f64,

    /// MoM alert threshold in percent (0–5).
    #[arg(long, default_value_t = 0.6)]
    pub mom: f64,

    /// Display language.
    #[arg(long, value_enum, default_value_t = Language::En)]
    pub lang: Language,
}

#[derive(Debug, Args, Clone)]
pub struct DashboardArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub session: SessionArgs,
}

#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub session: SessionArgs,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 16)]
    pub height: usize,
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub session: SessionArgs,

    /// Derived table CSV output path.
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Run summary JSON output path.
    #[arg(long)]
    pub json: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct SampleArgs {
    /// Output cache CSV.
    #[arg(long, env = "CPI_CACHE_PATH", default_value = DEFAULT_CACHE_PATH)]
    pub out: PathBuf,

    /// Number of months to generate.
    #[arg(long, default_value_t = 36)]
    pub months: usize,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// First month (YYYY-MM-DD).
    #[arg(long, default_value = "2022-01-01")]
    pub start: NaiveDate,

    /// Area label written to every row.
    #[arg(long, default_value = "Saudi Arabia")]
    pub area: String,
}

impl SourceArgs {
    pub fn load_config(&self) -> LoadConfig {
        let source_urls = if self.source_urls.is_empty() {
            DEFAULT_SOURCE_URLS.iter().map(|s| s.to_string()).collect()
        } else {
            self.source_urls.clone()
        };
        let country = Some(self.country.trim().to_string()).filter(|c| !c.is_empty());

        LoadConfig {
            cache_path: self.cache.clone(),
            source_urls,
            country,
            offline: self.offline,
            refresh_cache: self.refresh_cache,
        }
    }
}

impl SessionArgs {
    pub fn session(&self) -> Result<Session, AppError> {
        Ok(Session {
            language: self.lang,
            thresholds: Thresholds::validated(self.yoy, self.mom)?,
        })
    }
}
