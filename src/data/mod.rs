//! Data acquisition: the series loader and the synthetic sample generator.

pub mod sample;
pub mod source;

pub use sample::{SampleConfig, generate_sample};
pub use source::{HttpSource, LoadOrigin, LoadedSeries, RemoteResponse, RemoteSource, load_series};
