//! Mathematical utilities: sample moments over partially-defined columns.

pub mod stats;

pub use stats::*;
