//! Input/output helpers.
//!
//! - CSV ingest + cleaning (`ingest`)
//! - cache file writes (`cache`)
//! - derived table / summary exports (`export`)

pub mod cache;
pub mod export;
pub mod ingest;

pub use cache::*;
pub use export::*;
pub use ingest::*;
