use serde::{Deserialize, Serialize};

/// A single (date, weight) sample from the trailing window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct WeightPoint {
  pub date: String,
  pub weight: f64,
}

/// Running aggregates over a trailing window.
///
/// The distance and duration aggregates only cover days with a run, and are
/// `None` when there were no such days. A logged run of 0 distance still
/// reports `Some(0.0)`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RunningStats {
  pub total_days: i64,
  pub run_days: i64,
  pub avg_distance: Option<f64>,
  pub total_distance: Option<f64>,
  pub avg_duration: Option<f64>,
}

impl RunningStats {
  /// Share of logged days with a run, in percent
  pub fn run_percentage(&self) -> Option<f64> {
    if self.total_days == 0 {
      return None;
    }
    Some(self.run_days as f64 / self.total_days as f64 * 100.0)
  }

  pub fn is_empty(&self) -> bool {
    self.total_days == 0
  }
}
