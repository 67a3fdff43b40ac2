use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use fitness_log::config::AppConfig;
use fitness_log::models::{Activity, NewEntry};
use fitness_log::report::{render_recent_entries, render_running_stats, render_weight_progress, WeightTrend};
use fitness_log::shell::{local_today, Shell};
use fitness_log::FitnessStore;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "fitness-log")]
#[command(about = "Daily weight and running log", long_about = None)]
#[command(version)]
struct Cli {
  #[command(subcommand)]
  command: Option<Commands>,

  /// Log database file (overrides FITNESS_LOG_DB)
  #[arg(long, global = true)]
  db: Option<PathBuf>,

  #[arg(short, long, global = true)]
  verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
  /// Interactive menu (default)
  Menu,
  /// Record or overwrite one day
  Add {
    /// YYYY-MM-DD, defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,

    #[arg(long)]
    weight: f64,

    /// Run distance; give together with --duration to log a run
    #[arg(long, requires = "duration")]
    distance: Option<f64>,

    /// Run duration in minutes
    #[arg(long, requires = "distance")]
    duration: Option<i64>,

    #[arg(long)]
    notes: Option<String>,
  },
  /// Most recent entries, newest first
  Recent {
    #[arg(long)]
    limit: Option<u32>,

    #[arg(long)]
    json: bool,
  },
  /// Weight trend over the trailing window
  Progress {
    #[arg(long)]
    days: Option<u32>,

    #[arg(long)]
    json: bool,
  },
  /// Running statistics over the trailing window
  Stats {
    #[arg(long)]
    days: Option<u32>,

    #[arg(long)]
    json: bool,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenvy::dotenv().ok();

  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let mut config = AppConfig::from_env().context("Invalid configuration")?;
  if let Some(db) = cli.db {
    config.db_path = db;
  }

  let store = FitnessStore::open(&config.db_path);
  store
    .initialize()
    .await
    .with_context(|| format!("Failed to open fitness log at {}", config.db_path.display()))?;

  let result = match cli.command.unwrap_or(Commands::Menu) {
    Commands::Menu => run_menu(&store, &config).await,
    Commands::Add {
      date,
      weight,
      distance,
      duration,
      notes,
    } => {
      let date = date.unwrap_or_else(local_today);
      handle_add(&store, date, weight, distance.zip(duration), notes).await
    }
    Commands::Recent { limit, json } => {
      handle_recent(&store, limit.unwrap_or(config.recent_limit), json).await
    }
    Commands::Progress { days, json } => {
      handle_progress(&store, days.unwrap_or(config.window_days), json).await
    }
    Commands::Stats { days, json } => {
      handle_stats(&store, days.unwrap_or(config.window_days), json).await
    }
  };

  store.pool().close().await;
  result
}

fn init_tracing(verbose: bool) {
  let log_level = if verbose { "debug" } else { "warn" };
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("fitness_log={}", log_level).into()),
    )
    .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
    .init();
}

async fn run_menu(store: &FitnessStore, config: &AppConfig) -> anyhow::Result<()> {
  let stdin = io::stdin();
  let stdout = io::stdout();
  let mut shell = Shell::new(store, stdin.lock(), stdout.lock(), config);
  shell.run().await.context("Terminal I/O failed")?;
  Ok(())
}

async fn handle_add(
  store: &FitnessStore,
  date: NaiveDate,
  weight: f64,
  run: Option<(f64, i64)>,
  notes: Option<String>,
) -> anyhow::Result<()> {
  anyhow::ensure!(weight.is_finite() && weight >= 0.0, "Weight must be a number >= 0");

  let activity = match run {
    Some((distance, duration)) => {
      anyhow::ensure!(distance.is_finite() && distance >= 0.0, "Distance must be a number >= 0");
      anyhow::ensure!(duration >= 0, "Duration must be >= 0");
      Activity::Run { distance, duration }
    }
    None => Activity::NoRun,
  };

  let notes = notes.filter(|n| !n.trim().is_empty());
  let entry = NewEntry::on(date, weight, activity, notes);

  if !store.add_entry_reported(&entry).await {
    anyhow::bail!("Failed to add entry.");
  }
  println!("Entry added successfully!");
  Ok(())
}

async fn handle_recent(store: &FitnessStore, limit: u32, json: bool) -> anyhow::Result<()> {
  let entries = store.get_recent_entries(limit).await?;

  if json {
    println!("{}", serde_json::to_string_pretty(&entries)?);
  } else {
    println!("{}", render_recent_entries(&entries));
  }
  Ok(())
}

async fn handle_progress(store: &FitnessStore, days: u32, json: bool) -> anyhow::Result<()> {
  let points = store.get_weight_progress(days, local_today()).await?;
  let trend = WeightTrend::from_points(&points);

  if json {
    println!("{}", serde_json::to_string_pretty(&trend)?);
  } else {
    println!("{}", render_weight_progress(&trend, days));
  }
  Ok(())
}

async fn handle_stats(store: &FitnessStore, days: u32, json: bool) -> anyhow::Result<()> {
  let stats = store.get_running_stats(days, local_today()).await?;

  if json {
    println!("{}", serde_json::to_string_pretty(&stats)?);
  } else {
    println!("{}", render_running_stats(&stats, days));
  }
  Ok(())
}
