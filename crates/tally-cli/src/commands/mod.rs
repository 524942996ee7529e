//! CLI command implementations

pub mod datasets;
pub mod models;
pub mod run;
pub mod runs;
