use std::env;
use std::path::PathBuf;

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

pub const DEFAULT_DB_PATH: &str = "fitness_tracker.db";
pub const DEFAULT_WINDOW_DAYS: u32 = 30;
pub const DEFAULT_RECENT_LIMIT: u32 = 10;

const DB_PATH_VAR: &str = "FITNESS_LOG_DB";
const WINDOW_DAYS_VAR: &str = "FITNESS_LOG_DAYS";
const RECENT_LIMIT_VAR: &str = "FITNESS_LOG_RECENT_LIMIT";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
  #[error("Invalid value for {name}: {value:?} (expected a positive integer)")]
  Invalid { name: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
  pub db_path: PathBuf,
  /// Trailing window for weight and running reports
  pub window_days: u32,
  pub recent_limit: u32,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      db_path: PathBuf::from(DEFAULT_DB_PATH),
      window_days: DEFAULT_WINDOW_DAYS,
      recent_limit: DEFAULT_RECENT_LIMIT,
    }
  }
}

impl AppConfig {
  /// Read settings from the environment, falling back to defaults for
  /// anything unset. Call `dotenvy::dotenv()` first to pick up `.env`.
  pub fn from_env() -> Result<Self, ConfigError> {
    let defaults = Self::default();

    Ok(Self {
      db_path: env::var(DB_PATH_VAR)
        .map(PathBuf::from)
        .unwrap_or(defaults.db_path),
      window_days: positive_var(WINDOW_DAYS_VAR)?.unwrap_or(defaults.window_days),
      recent_limit: positive_var(RECENT_LIMIT_VAR)?.unwrap_or(defaults.recent_limit),
    })
  }
}

fn positive_var(name: &str) -> Result<Option<u32>, ConfigError> {
  let Ok(value) = env::var(name) else {
    return Ok(None);
  };

  match value.trim().parse::<u32>() {
    Ok(n) if n > 0 => Ok(Some(n)),
    _ => Err(ConfigError::Invalid {
      name: name.to_string(),
      value,
    }),
  }
}
