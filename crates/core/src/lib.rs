//! fdiff_core: pure logic for comparing follower/following exports.
//! Extraction and comparison are free of I/O; persistence and rendering
//! happen behind the ports in [`ports`].

pub mod application;
pub mod comparator;
pub mod domain;
pub mod error;
pub mod extractor;
pub mod ports;
pub mod utils;

// Re-exports to shorten paths in the cli/adapter crates
pub use domain::{ComparisonReport, Extraction, Snapshot, UnfollowerReport, Username};
pub use error::{CoreError, Result};
