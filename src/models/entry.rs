use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// What happened on the day, activity-wise.
///
/// A run always carries both its distance and its duration. Rest days carry
/// neither.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Activity {
  NoRun,
  Run {
    /// Miles or km, whichever the user logs in
    distance: f64,
    /// Minutes
    duration: i64,
  },
}

impl Activity {
  pub fn ran(&self) -> bool {
    matches!(self, Activity::Run { .. })
  }

  pub fn distance(&self) -> Option<f64> {
    match self {
      Activity::Run { distance, .. } => Some(*distance),
      Activity::NoRun => None,
    }
  }

  pub fn duration(&self) -> Option<i64> {
    match self {
      Activity::Run { duration, .. } => Some(*duration),
      Activity::NoRun => None,
    }
  }

  /// Rebuild the activity from its stored columns.
  ///
  /// Older log files can hold `ran = 1` with a missing distance or duration;
  /// those come back as a run with the missing field zeroed.
  pub fn from_columns(ran: bool, distance: Option<f64>, duration: Option<i64>) -> Self {
    if !ran {
      return Activity::NoRun;
    }
    if distance.is_none() || duration.is_none() {
      tracing::warn!(
        ?distance,
        ?duration,
        "Run entry is missing distance or duration, treating missing values as 0"
      );
    }
    Activity::Run {
      distance: distance.unwrap_or(0.0),
      duration: duration.unwrap_or(0),
    }
  }
}

/// One stored day in the log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessRecord {
  pub id: i64,
  pub date: String,
  pub weight: f64,
  pub activity: Activity,
  pub notes: Option<String>,
  pub created_at: Option<NaiveDateTime>,
}

impl FitnessRecord {
  /// The record's date, if it was stored in `YYYY-MM-DD` form
  pub fn parsed_date(&self) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&self.date, DATE_FORMAT).ok()
  }
}

/// Row shape of `fitness_log` as sqlx decodes it
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct FitnessRow {
  pub id: i64,
  pub date: String,
  pub weight: f64,
  pub ran: bool,
  pub distance: Option<f64>,
  pub duration: Option<i64>,
  pub notes: Option<String>,
  pub created_at: Option<NaiveDateTime>,
}

impl From<FitnessRow> for FitnessRecord {
  fn from(row: FitnessRow) -> Self {
    let record = Self {
      id: row.id,
      activity: Activity::from_columns(row.ran, row.distance, row.duration),
      date: row.date,
      weight: row.weight,
      notes: row.notes,
      created_at: row.created_at,
    };

    if record.parsed_date().is_none() {
      tracing::warn!(date = %record.date, "Entry date is not YYYY-MM-DD; windowed reports will skip it");
    }
    record
  }
}

/// For inserting or overwriting a day (without id, created_at)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEntry {
  /// Stored exactly as given. Range queries compare dates as text, so only
  /// `YYYY-MM-DD` sorts correctly.
  pub date: String,
  pub weight: f64,
  pub activity: Activity,
  pub notes: Option<String>,
}

impl NewEntry {
  pub fn new(date: impl Into<String>, weight: f64, activity: Activity, notes: Option<String>) -> Self {
    Self {
      date: date.into(),
      weight,
      activity,
      notes,
    }
  }

  /// Entry for a calendar date, formatted as `YYYY-MM-DD`
  pub fn on(date: NaiveDate, weight: f64, activity: Activity, notes: Option<String>) -> Self {
    Self::new(date.format(DATE_FORMAT).to_string(), weight, activity, notes)
  }
}
