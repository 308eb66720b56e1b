//! `cpi-heat` library crate.
//!
//! The binary (`heat`) is a thin wrapper around this library so that:
//!
//! - the CPI transform pipeline is testable without spawning processes
//! - the loader, exports and front-ends share one set of domain types
//! - presentation (TUI, text reports) stays separate from the math

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod i18n;
pub mod io;
pub mod logging;
pub mod math;
pub mod plot;
pub mod report;
pub mod transform;
pub mod tui;
