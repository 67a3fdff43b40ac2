//! Personal fitness log: daily weight and running entries in a local SQLite
//! file, with recent-entry, weight-trend and running-statistics reports.

pub mod config;
pub mod db;
pub mod models;
pub mod report;
pub mod shell;
pub mod store;

#[cfg(test)]
mod test_utils;

pub use store::{FitnessStore, StorageError, WriteFailure};
