//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw observations and the aligned per-indicator table
//! - session configuration (`Thresholds`, `Language`, `Session`)
//! - pipeline outputs (`DerivedRow`, `DerivedTable`, `LatestSnapshot`)

pub mod types;

pub use types::*;
