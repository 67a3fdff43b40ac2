//! Persistent daily fitness log backed by a single SQLite table.
//!
//! Every operation is one statement against `fitness_log`. Window queries
//! take `today` explicitly so reports are reproducible; the binary passes the
//! local calendar date.

use chrono::{Days, NaiveDate};
use std::fmt;
use std::path::Path;

use crate::db::{self, DbPool};
use crate::models::{FitnessRecord, FitnessRow, NewEntry, RunningStats, WeightPoint, DATE_FORMAT};

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

// SQLite primary result codes (extended codes carry these in the low byte)
const SQLITE_PERM: i32 = 3;
const SQLITE_READONLY: i32 = 8;
const SQLITE_CORRUPT: i32 = 11;
const SQLITE_CANTOPEN: i32 = 14;
const SQLITE_CONSTRAINT: i32 = 19;
const SQLITE_NOTADB: i32 = 26;

/// Why a write was rejected by the storage layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteFailure {
  /// File or directory cannot be opened or written
  Permission,
  /// File is damaged or is not a SQLite database
  Corruption,
  Constraint,
  Other,
}

impl WriteFailure {
  pub fn classify(err: &sqlx::Error) -> Self {
    match err {
      sqlx::Error::Database(db_err) => {
        let primary = db_err
          .code()
          .and_then(|code| code.parse::<i32>().ok())
          .map(|code| code & 0xff);

        match primary {
          Some(SQLITE_PERM | SQLITE_READONLY | SQLITE_CANTOPEN) => WriteFailure::Permission,
          Some(SQLITE_CORRUPT | SQLITE_NOTADB) => WriteFailure::Corruption,
          Some(SQLITE_CONSTRAINT) => WriteFailure::Constraint,
          _ => WriteFailure::Other,
        }
      }
      sqlx::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::PermissionDenied => {
        WriteFailure::Permission
      }
      _ => WriteFailure::Other,
    }
  }
}

impl fmt::Display for WriteFailure {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Permission => write!(f, "permission"),
      Self::Corruption => write!(f, "corruption"),
      Self::Constraint => write!(f, "constraint"),
      Self::Other => write!(f, "other"),
    }
  }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
  #[error("Failed to initialize schema: {0}")]
  Migration(#[from] sqlx::migrate::MigrateError),

  #[error("Failed to write entry ({kind}): {source}")]
  Write {
    kind: WriteFailure,
    #[source]
    source: sqlx::Error,
  },

  #[error("Database query failed: {0}")]
  Query(#[from] sqlx::Error),
}

impl StorageError {
  fn write(source: sqlx::Error) -> Self {
    StorageError::Write {
      kind: WriteFailure::classify(&source),
      source,
    }
  }

  /// Failure kind for rejected writes, `None` for other errors
  pub fn write_failure(&self) -> Option<WriteFailure> {
    match self {
      StorageError::Write { kind, .. } => Some(*kind),
      _ => None,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Trailing Window
/// ---------------------------------------------------------------------------

/// First date of the inclusive window `[today - days, today]`
pub fn window_start(today: NaiveDate, days: u32) -> NaiveDate {
  today
    .checked_sub_days(Days::new(u64::from(days)))
    .unwrap_or(NaiveDate::MIN)
}

fn window_bounds(today: NaiveDate, days: u32) -> (String, String) {
  (
    window_start(today, days).format(DATE_FORMAT).to_string(),
    today.format(DATE_FORMAT).to_string(),
  )
}

/// ---------------------------------------------------------------------------
/// Store
/// ---------------------------------------------------------------------------

pub struct FitnessStore {
  pool: DbPool,
}

impl FitnessStore {
  /// Store backed by the file at `path`. The file is created on first use.
  pub fn open(path: impl AsRef<Path>) -> Self {
    let path = path.as_ref();
    tracing::debug!("Using fitness log at: {}", path.display());
    Self {
      pool: db::connect_lazy(path),
    }
  }

  pub fn from_pool(pool: DbPool) -> Self {
    Self { pool }
  }

  pub fn pool(&self) -> &DbPool {
    &self.pool
  }

  /// Ensure the `fitness_log` table exists. Safe to call on every startup.
  pub async fn initialize(&self) -> Result<(), StorageError> {
    db::run_migrations(&self.pool).await?;
    tracing::info!("Fitness log ready");
    Ok(())
  }

  /// Insert the entry, or overwrite every field of the existing entry for
  /// the same date. `id` and `created_at` of an existing row are kept.
  pub async fn add_entry(&self, entry: &NewEntry) -> Result<(), StorageError> {
    sqlx::query(
      r#"
      INSERT INTO fitness_log (date, weight, ran, distance, duration, notes)
      VALUES (?1, ?2, ?3, ?4, ?5, ?6)
      ON CONFLICT(date) DO UPDATE SET
        weight = excluded.weight,
        ran = excluded.ran,
        distance = excluded.distance,
        duration = excluded.duration,
        notes = excluded.notes
      "#,
    )
    .bind(&entry.date)
    .bind(entry.weight)
    .bind(entry.activity.ran())
    .bind(entry.activity.distance())
    .bind(entry.activity.duration())
    .bind(&entry.notes)
    .execute(&self.pool)
    .await
    .map_err(StorageError::write)?;

    tracing::debug!(date = %entry.date, "Saved fitness entry");
    Ok(())
  }

  /// Boolean form of [`add_entry`](Self::add_entry) for the presentation
  /// layer. Failures are logged, never propagated.
  pub async fn add_entry_reported(&self, entry: &NewEntry) -> bool {
    match self.add_entry(entry).await {
      Ok(()) => true,
      Err(e) => {
        tracing::error!(date = %entry.date, kind = ?e.write_failure(), "Database error: {}", e);
        false
      }
    }
  }

  /// Up to `limit` entries, most recent date first
  pub async fn get_recent_entries(&self, limit: u32) -> Result<Vec<FitnessRecord>, StorageError> {
    let rows: Vec<FitnessRow> = sqlx::query_as(
      r#"
      SELECT id, date, weight, ran, distance, duration, notes, created_at
      FROM fitness_log
      ORDER BY date DESC
      LIMIT ?1
      "#,
    )
    .bind(i64::from(limit))
    .fetch_all(&self.pool)
    .await?;

    Ok(rows.into_iter().map(FitnessRecord::from).collect())
  }

  /// Weight samples inside the trailing window, oldest first
  pub async fn get_weight_progress(
    &self,
    days: u32,
    today: NaiveDate,
  ) -> Result<Vec<WeightPoint>, StorageError> {
    let (since, until) = window_bounds(today, days);

    let points = sqlx::query_as::<_, WeightPoint>(
      r#"
      SELECT date, weight
      FROM fitness_log
      WHERE date >= ?1 AND date <= ?2
      ORDER BY date ASC
      "#,
    )
    .bind(&since)
    .bind(&until)
    .fetch_all(&self.pool)
    .await?;

    Ok(points)
  }

  /// Running aggregates inside the trailing window
  pub async fn get_running_stats(
    &self,
    days: u32,
    today: NaiveDate,
  ) -> Result<RunningStats, StorageError> {
    let (since, until) = window_bounds(today, days);

    let (total_days, run_days, avg_distance, total_distance, avg_duration): (
      i64,
      Option<i64>,
      Option<f64>,
      Option<f64>,
      Option<f64>,
    ) = sqlx::query_as(
      r#"
      SELECT
        COUNT(*),
        SUM(CASE WHEN ran = 1 THEN 1 ELSE 0 END),
        CAST(AVG(CASE WHEN ran = 1 THEN distance END) AS REAL),
        CAST(SUM(CASE WHEN ran = 1 THEN distance END) AS REAL),
        CAST(AVG(CASE WHEN ran = 1 THEN duration END) AS REAL)
      FROM fitness_log
      WHERE date >= ?1 AND date <= ?2
      "#,
    )
    .bind(&since)
    .bind(&until)
    .fetch_one(&self.pool)
    .await?;

    let run_days = run_days.unwrap_or(0);
    let stats = if run_days == 0 {
      RunningStats {
        total_days,
        run_days,
        ..Default::default()
      }
    } else {
      RunningStats {
        total_days,
        run_days,
        avg_distance,
        total_distance,
        avg_duration,
      }
    };

    Ok(stats)
  }
}
