//! Terminal plots for the text reports.

pub mod ascii;

pub use ascii::*;
