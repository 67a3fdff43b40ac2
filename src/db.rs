use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;

pub type DbPool = SqlitePool;

/// Build a lazily-connecting pool for the log file at `path`.
///
/// Nothing touches the filesystem until the first statement runs, so an
/// unusable path surfaces as an error from that operation rather than here.
/// The pool holds a single connection: every operation acquires it for one
/// statement and hands it back when the query future completes or fails.
pub fn connect_lazy(path: &Path) -> DbPool {
  let options = SqliteConnectOptions::new()
    .filename(path)
    .create_if_missing(true);

  SqlitePoolOptions::new()
    .max_connections(1)
    .connect_lazy_with(options)
}

/// Create the `fitness_log` table if it does not exist yet
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
  tracing::debug!("Running fitness_log migrations");
  sqlx::migrate!("./migrations").run(pool).await?;
  Ok(())
}
