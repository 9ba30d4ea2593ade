//! Consolidate ticker rows scattered across a tree of CSV files into one
//! chronologically sorted CSV.
//!
//! The run is a straight line: [`scan`] the tree, [`process`] each file,
//! [`merge`] the matches and [`write`] the result. [`pipeline::run`] ties the
//! stages together and [`report`] turns their outcomes into log lines.

pub mod config;
pub mod merge;
pub mod pipeline;
pub mod process;
pub mod report;
pub mod scan;
pub mod write;

pub use config::Config;
pub use pipeline::{run, RunOutcome};
