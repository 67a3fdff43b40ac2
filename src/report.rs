//! Report computations and plain-text rendering.
//!
//! Everything here is pure: the store supplies rows, these functions turn
//! them into trends and the fixed-width tables the shell prints.

use serde::Serialize;

use crate::models::{FitnessRecord, RunningStats, WeightPoint};

pub const NOTES_PREVIEW_CHARS: usize = 15;

/// ---------------------------------------------------------------------------
/// Weight Trend
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightChange {
  pub date: String,
  pub weight: f64,
  /// Change since the previous sample (None for the first)
  pub change: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightTrend {
  pub points: Vec<WeightChange>,
  /// Last minus first weight, when there are at least two samples
  pub total_change: Option<f64>,
}

impl WeightTrend {
  pub fn from_points(points: &[WeightPoint]) -> Self {
    let changes = points
      .iter()
      .enumerate()
      .map(|(i, point)| WeightChange {
        date: point.date.clone(),
        weight: point.weight,
        change: i.checked_sub(1).map(|prev| point.weight - points[prev].weight),
      })
      .collect();

    let total_change = match (points.first(), points.last()) {
      (Some(first), Some(last)) if points.len() >= 2 => Some(last.weight - first.weight),
      _ => None,
    };

    Self {
      points: changes,
      total_change,
    }
  }

  pub fn is_empty(&self) -> bool {
    self.points.is_empty()
  }
}

/// ---------------------------------------------------------------------------
/// Formatting Helpers
/// ---------------------------------------------------------------------------

/// `95` -> `1h 35m`, `28` -> `28m`
pub fn format_duration(minutes: Option<i64>) -> String {
  match minutes {
    None => "N/A".to_string(),
    Some(total) => {
      let hours = total / 60;
      let mins = total % 60;
      if hours != 0 {
        format!("{}h {}m", hours, mins)
      } else {
        format!("{}m", mins)
      }
    }
  }
}

pub fn format_distance(distance: Option<f64>) -> String {
  match distance {
    Some(d) => format!("{:.1}", d),
    None => "N/A".to_string(),
  }
}

pub fn format_change(change: f64) -> String {
  format!("{:+.1}", change)
}

pub fn truncate_notes(notes: &str, max_chars: usize) -> String {
  if notes.chars().count() > max_chars {
    let head: String = notes.chars().take(max_chars).collect();
    format!("{}...", head)
  } else {
    notes.to_string()
  }
}

/// ---------------------------------------------------------------------------
/// Rendering
/// ---------------------------------------------------------------------------

pub fn render_recent_entries(entries: &[FitnessRecord]) -> String {
  let mut lines = vec!["RECENT ENTRIES".to_string(), "-".repeat(50)];

  if entries.is_empty() {
    lines.push("No entries found.".to_string());
    return lines.join("\n");
  }

  lines.push(format!(
    "{:<12} {:<8} {:<5} {:<10} {:<10} {}",
    "Date", "Weight", "Ran", "Distance", "Duration", "Notes"
  ));
  lines.push("-".repeat(65));

  for entry in entries {
    let ran = if entry.activity.ran() { "Yes" } else { "No" };
    let notes = entry
      .notes
      .as_deref()
      .map(|n| truncate_notes(n, NOTES_PREVIEW_CHARS))
      .unwrap_or_default();

    lines.push(
      format!(
        "{:<12} {:<8.1} {:<5} {:<10} {:<10} {}",
        entry.date,
        entry.weight,
        ran,
        format_distance(entry.activity.distance()),
        format_duration(entry.activity.duration()),
        notes
      )
      .trim_end()
      .to_string(),
    );
  }

  lines.join("\n")
}

pub fn render_weight_progress(trend: &WeightTrend, days: u32) -> String {
  let mut lines = vec![format!("WEIGHT PROGRESS (Last {} Days)", days), "-".repeat(35)];

  if trend.is_empty() {
    lines.push("No weight data found.".to_string());
    return lines.join("\n");
  }

  lines.push(format!("{:<12} {:<8} {}", "Date", "Weight", "Change"));
  lines.push("-".repeat(28));

  for point in &trend.points {
    let change = point
      .change
      .map(format_change)
      .unwrap_or_else(|| "N/A".to_string());
    lines.push(format!("{:<12} {:<8.1} {}", point.date, point.weight, change));
  }

  if let Some(total) = trend.total_change {
    lines.push(String::new());
    lines.push(format!("Total change: {}", format_change(total)));
  }

  lines.join("\n")
}

pub fn render_running_stats(stats: &RunningStats, days: u32) -> String {
  let mut lines = vec![format!("RUNNING STATISTICS (Last {} Days)", days), "-".repeat(35)];

  if stats.is_empty() {
    lines.push(format!("No data found for the last {} days.", days));
    return lines.join("\n");
  }

  lines.push(format!("Total logged days: {}", stats.total_days));
  lines.push(format!("Days ran: {}", stats.run_days));
  lines.push(format!("Run percentage: {:.1}%", stats.run_percentage().unwrap_or(0.0)));
  lines.push(match stats.total_distance {
    Some(total) => format!("Total distance: {:.1}", total),
    None => "Total distance: 0".to_string(),
  });
  lines.push(format!("Average distance: {}", format_distance(stats.avg_distance)));
  lines.push(format!(
    "Average duration: {}",
    format_duration(stats.avg_duration.map(|d| d as i64))
  ));

  lines.join("\n")
}
