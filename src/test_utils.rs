//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - In-memory store setup/teardown
//! - Seed data helpers
//! - Helper assertions

use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::models::{Activity, NewEntry};
use crate::store::FitnessStore;

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create a store over an in-memory SQLite database with the schema applied
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_store() -> FitnessStore {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  let store = FitnessStore::from_pool(pool);
  store.initialize().await.expect("Failed to run migrations");
  store
}

/// Close a test store's pool
pub async fn teardown_test_store(store: FitnessStore) {
  store.pool().close().await;
}

/// Seed one rest day per date, weights counting down from 180
pub async fn seed_entries(store: &FitnessStore, dates: &[&str]) {
  for (i, day) in dates.iter().enumerate() {
    let entry = NewEntry::new(*day, 180.0 - i as f64, Activity::NoRun, None);
    store.add_entry(&entry).await.expect("Failed to seed entry");
  }
}

pub async fn count_rows(pool: &SqlitePool) -> i64 {
  sqlx::query_scalar("SELECT COUNT(*) FROM fitness_log")
    .fetch_one(pool)
    .await
    .expect("Failed to count entries")
}

/// ---------------------------------------------------------------------------
/// Time Helpers
/// ---------------------------------------------------------------------------

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(year, month, day).expect("Invalid test date")
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_store_creates_schema() {
    let store = setup_test_store().await;

    let tables: Vec<(String,)> =
      sqlx::query_as("SELECT name FROM sqlite_master WHERE type='table' AND name = 'fitness_log'")
        .fetch_all(store.pool())
        .await
        .expect("Failed to query tables");

    assert_eq!(tables.len(), 1);

    teardown_test_store(store).await;
  }

  #[tokio::test]
  async fn test_seed_entries_inserts_each_date() {
    let store = setup_test_store().await;

    seed_entries(&store, &["2024-06-01", "2024-06-02", "2024-06-03"]).await;
    assert_eq!(count_rows(store.pool()).await, 3);

    teardown_test_store(store).await;
  }
}
