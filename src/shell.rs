//! Interactive menu for logging days and viewing reports.
//!
//! The prompts are generic over `BufRead`/`Write` so the whole menu can be
//! driven from a scripted buffer. A closed input stream ends the session.

use chrono::{Local, NaiveDate};
use std::io::{self, BufRead, Write};

use crate::config::AppConfig;
use crate::models::{Activity, NewEntry, DATE_FORMAT};
use crate::report::{render_recent_entries, render_running_stats, render_weight_progress, WeightTrend};
use crate::store::FitnessStore;

const CLEAR_SCREEN: &str = "\x1B[2J\x1B[1;1H";

pub fn local_today() -> NaiveDate {
  Local::now().date_naive()
}

/// ---------------------------------------------------------------------------
/// Prompt Helpers
/// ---------------------------------------------------------------------------

fn read_line<R: BufRead>(input: &mut R) -> io::Result<String> {
  let mut line = String::new();
  if input.read_line(&mut line)? == 0 {
    return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
  }
  Ok(line.trim().to_string())
}

pub fn prompt_line<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> io::Result<String> {
  write!(output, "{}", prompt)?;
  output.flush()?;
  read_line(input)
}

/// Re-prompts until the answer is a finite number `>= min`
pub fn prompt_float<R: BufRead, W: Write>(
  input: &mut R,
  output: &mut W,
  prompt: &str,
  min: f64,
) -> io::Result<f64> {
  loop {
    let answer = prompt_line(input, output, prompt)?;
    match answer.parse::<f64>() {
      Ok(value) if value.is_finite() && value >= min => return Ok(value),
      Ok(value) if value.is_finite() => writeln!(output, "Please enter a value >= {}", min)?,
      _ => writeln!(output, "Please enter a valid number.")?,
    }
  }
}

/// Re-prompts until the answer is an integer `>= min`
pub fn prompt_int<R: BufRead, W: Write>(
  input: &mut R,
  output: &mut W,
  prompt: &str,
  min: i64,
) -> io::Result<i64> {
  loop {
    let answer = prompt_line(input, output, prompt)?;
    match answer.parse::<i64>() {
      Ok(value) if value >= min => return Ok(value),
      Ok(_) => writeln!(output, "Please enter a value >= {}", min)?,
      Err(_) => writeln!(output, "Please enter a valid integer.")?,
    }
  }
}

pub fn prompt_yes_no<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> io::Result<bool> {
  let prompt = format!("{} (y/n): ", prompt);
  loop {
    let answer = prompt_line(input, output, &prompt)?.to_lowercase();
    match answer.as_str() {
      "y" | "yes" => return Ok(true),
      "n" | "no" => return Ok(false),
      _ => writeln!(output, "Please enter 'y' or 'n'.")?,
    }
  }
}

pub fn prompt_date<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> io::Result<NaiveDate> {
  loop {
    let answer = prompt_line(input, output, prompt)?;
    match NaiveDate::parse_from_str(&answer, DATE_FORMAT) {
      Ok(date) => return Ok(date),
      Err(_) => writeln!(output, "Invalid date format. Please use YYYY-MM-DD.")?,
    }
  }
}

/// Empty answers become `None`
pub fn prompt_optional<R: BufRead, W: Write>(
  input: &mut R,
  output: &mut W,
  prompt: &str,
) -> io::Result<Option<String>> {
  let answer = prompt_line(input, output, prompt)?;
  Ok(if answer.is_empty() { None } else { Some(answer) })
}

/// ---------------------------------------------------------------------------
/// Menu
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
  AddToday,
  RecentEntries,
  WeightProgress,
  RunningStats,
  AddForDate,
  Exit,
}

impl MenuChoice {
  pub fn from_input(input: &str) -> Option<Self> {
    match input.trim() {
      "1" => Some(Self::AddToday),
      "2" => Some(Self::RecentEntries),
      "3" => Some(Self::WeightProgress),
      "4" => Some(Self::RunningStats),
      "5" => Some(Self::AddForDate),
      "6" => Some(Self::Exit),
      _ => None,
    }
  }
}

pub struct Shell<'a, R, W> {
  store: &'a FitnessStore,
  input: R,
  output: W,
  window_days: u32,
  recent_limit: u32,
  clock: fn() -> NaiveDate,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
  pub fn new(store: &'a FitnessStore, input: R, output: W, config: &AppConfig) -> Self {
    Self {
      store,
      input,
      output,
      window_days: config.window_days,
      recent_limit: config.recent_limit,
      clock: local_today,
    }
  }

  /// Replace the source of "today" used for new entries and report windows
  pub fn with_clock(mut self, clock: fn() -> NaiveDate) -> Self {
    self.clock = clock;
    self
  }

  pub fn into_output(self) -> W {
    self.output
  }

  /// Run the menu until the user exits or input closes
  pub async fn run(&mut self) -> io::Result<()> {
    loop {
      match self.step().await {
        Ok(true) => continue,
        Ok(false) => break,
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
          tracing::debug!("Input closed, leaving menu");
          break;
        }
        Err(e) => return Err(e),
      }
    }
    Ok(())
  }

  /// One pass through the menu. Returns false once the user picks exit.
  async fn step(&mut self) -> io::Result<bool> {
    write!(self.output, "{}", CLEAR_SCREEN)?;
    writeln!(self.output, "FITNESS TRACKER")?;
    writeln!(self.output, "{}", "=".repeat(40))?;
    writeln!(self.output, "1. Add today's entry")?;
    writeln!(self.output, "2. View recent entries")?;
    writeln!(self.output, "3. View weight progress")?;
    writeln!(self.output, "4. View running statistics")?;
    writeln!(self.output, "5. Add entry for specific date")?;
    writeln!(self.output, "6. Exit")?;
    writeln!(self.output, "{}", "=".repeat(40))?;

    let answer = prompt_line(&mut self.input, &mut self.output, "Select an option (1-6): ")?;

    match MenuChoice::from_input(&answer) {
      Some(MenuChoice::AddToday) => self.add_today().await?,
      Some(MenuChoice::RecentEntries) => self.show_recent_entries().await?,
      Some(MenuChoice::WeightProgress) => self.show_weight_progress().await?,
      Some(MenuChoice::RunningStats) => self.show_running_stats().await?,
      Some(MenuChoice::AddForDate) => self.add_for_date().await?,
      Some(MenuChoice::Exit) => {
        writeln!(self.output, "\nThanks for using Fitness Tracker!")?;
        return Ok(false);
      }
      None => {
        writeln!(self.output, "\nInvalid option. Please try again.")?;
        self.pause()?;
      }
    }

    Ok(true)
  }

  async fn add_today(&mut self) -> io::Result<()> {
    write!(self.output, "{}", CLEAR_SCREEN)?;
    writeln!(self.output, "ADD TODAY'S ENTRY")?;
    writeln!(self.output, "{}", "-".repeat(20))?;

    let today = (self.clock)();
    writeln!(self.output, "Date: {}", today.format(DATE_FORMAT))?;

    self
      .collect_and_save(today, "Enter your weight (lbs/kg): ", "Did you run today?")
      .await
  }

  async fn add_for_date(&mut self) -> io::Result<()> {
    write!(self.output, "{}", CLEAR_SCREEN)?;
    writeln!(self.output, "ADD ENTRY FOR SPECIFIC DATE")?;
    writeln!(self.output, "{}", "-".repeat(30))?;

    let date = prompt_date(&mut self.input, &mut self.output, "Enter date (YYYY-MM-DD): ")?;

    self
      .collect_and_save(date, "Enter weight (lbs/kg): ", "Did you run on this day?")
      .await
  }

  async fn collect_and_save(&mut self, date: NaiveDate, weight_prompt: &str, ran_prompt: &str) -> io::Result<()> {
    let weight = prompt_float(&mut self.input, &mut self.output, weight_prompt, 0.0)?;
    let ran = prompt_yes_no(&mut self.input, &mut self.output, ran_prompt)?;

    let activity = if ran {
      let distance = prompt_float(&mut self.input, &mut self.output, "Distance (miles/km): ", 0.0)?;
      let duration = prompt_int(&mut self.input, &mut self.output, "Duration (minutes): ", 0)?;
      Activity::Run { distance, duration }
    } else {
      Activity::NoRun
    };

    let notes = prompt_optional(&mut self.input, &mut self.output, "Notes (optional): ")?;
    let entry = NewEntry::on(date, weight, activity, notes);

    if self.store.add_entry_reported(&entry).await {
      writeln!(self.output, "\nEntry added successfully!")?;
    } else {
      writeln!(self.output, "\nFailed to add entry.")?;
    }

    self.pause()
  }

  async fn show_recent_entries(&mut self) -> io::Result<()> {
    write!(self.output, "{}", CLEAR_SCREEN)?;

    match self.store.get_recent_entries(self.recent_limit).await {
      Ok(entries) => writeln!(self.output, "{}", render_recent_entries(&entries))?,
      Err(e) => {
        tracing::error!("Failed to load recent entries: {}", e);
        writeln!(self.output, "Could not load entries: {}", e)?;
      }
    }

    self.pause()
  }

  async fn show_weight_progress(&mut self) -> io::Result<()> {
    write!(self.output, "{}", CLEAR_SCREEN)?;

    let today = (self.clock)();
    match self.store.get_weight_progress(self.window_days, today).await {
      Ok(points) => {
        let trend = WeightTrend::from_points(&points);
        writeln!(self.output, "{}", render_weight_progress(&trend, self.window_days))?;
      }
      Err(e) => {
        tracing::error!("Failed to load weight progress: {}", e);
        writeln!(self.output, "Could not load weight progress: {}", e)?;
      }
    }

    self.pause()
  }

  async fn show_running_stats(&mut self) -> io::Result<()> {
    write!(self.output, "{}", CLEAR_SCREEN)?;

    let today = (self.clock)();
    match self.store.get_running_stats(self.window_days, today).await {
      Ok(stats) => writeln!(self.output, "{}", render_running_stats(&stats, self.window_days))?,
      Err(e) => {
        tracing::error!("Failed to load running stats: {}", e);
        writeln!(self.output, "Could not load running statistics: {}", e)?;
      }
    }

    self.pause()
  }

  fn pause(&mut self) -> io::Result<()> {
    prompt_line(&mut self.input, &mut self.output, "\nPress Enter to continue...")?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::*;
  use std::io::Cursor;

  fn fixed_today() -> NaiveDate {
    date(2024, 6, 15)
  }

  fn output_text(buf: Vec<u8>) -> String {
    String::from_utf8(buf).expect("Output should be UTF-8")
  }

  async fn run_script(store: &FitnessStore, script: &str) -> String {
    let mut shell = Shell::new(store, Cursor::new(script.as_bytes().to_vec()), Vec::new(), &AppConfig::default())
      .with_clock(fixed_today);
    shell.run().await.expect("Shell should exit cleanly");
    output_text(shell.into_output())
  }

  #[test]
  fn test_prompt_float_retries_until_valid() {
    let mut input = Cursor::new(b"abc\n-1\ninf\n2.5\n".to_vec());
    let mut output = Vec::new();

    let value = prompt_float(&mut input, &mut output, "Weight: ", 0.0).expect("Should parse");
    assert_eq!(value, 2.5);

    let text = output_text(output);
    assert_eq!(text.matches("Please enter a valid number.").count(), 2);
    assert!(text.contains("Please enter a value >= 0"));
  }

  #[test]
  fn test_prompt_int_retries_until_valid() {
    let mut input = Cursor::new(b"2.5\n-3\n45\n".to_vec());
    let mut output = Vec::new();

    let value = prompt_int(&mut input, &mut output, "Minutes: ", 0).expect("Should parse");
    assert_eq!(value, 45);

    let text = output_text(output);
    assert!(text.contains("Please enter a valid integer."));
    assert!(text.contains("Please enter a value >= 0"));
  }

  #[test]
  fn test_prompt_yes_no_accepts_words_and_case() {
    let mut input = Cursor::new(b"maybe\nYES\nNo\n".to_vec());
    let mut output = Vec::new();

    assert!(prompt_yes_no(&mut input, &mut output, "Ran?").expect("Should parse"));
    assert!(!prompt_yes_no(&mut input, &mut output, "Ran?").expect("Should parse"));

    let text = output_text(output);
    assert!(text.contains("Ran? (y/n): "));
    assert_eq!(text.matches("Please enter 'y' or 'n'.").count(), 1);
  }

  #[test]
  fn test_prompt_date_rejects_bad_formats() {
    let mut input = Cursor::new(b"06/02/2024\n2024-02-30\n2024-06-02\n".to_vec());
    let mut output = Vec::new();

    let value = prompt_date(&mut input, &mut output, "Date: ").expect("Should parse");
    assert_eq!(value, date(2024, 6, 2));
    assert_eq!(
      output_text(output)
        .matches("Invalid date format. Please use YYYY-MM-DD.")
        .count(),
      2
    );
  }

  #[test]
  fn test_prompt_optional_and_eof() {
    let mut input = Cursor::new(b"  \nfelt good\n".to_vec());
    let mut output = Vec::new();

    assert_eq!(prompt_optional(&mut input, &mut output, "Notes: ").unwrap(), None);
    assert_eq!(
      prompt_optional(&mut input, &mut output, "Notes: ").unwrap().as_deref(),
      Some("felt good")
    );

    let err = prompt_line(&mut input, &mut output, "More: ").expect_err("Input is exhausted");
    assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
  }

  #[test]
  fn test_menu_choice_parsing() {
    assert_eq!(MenuChoice::from_input(" 1 "), Some(MenuChoice::AddToday));
    assert_eq!(MenuChoice::from_input("6"), Some(MenuChoice::Exit));
    assert_eq!(MenuChoice::from_input("7"), None);
    assert_eq!(MenuChoice::from_input(""), None);
  }

  #[tokio::test]
  async fn test_add_today_uses_clock() {
    let store = setup_test_store().await;

    let output = run_script(&store, "1\n180\nn\n\n\n6\n").await;
    assert!(output.contains("Date: 2024-06-15"));
    assert!(output.contains("Entry added successfully!"));
    assert!(output.contains("Thanks for using Fitness Tracker!"));

    let entries = store.get_recent_entries(10).await.expect("Failed to read entries");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].date, "2024-06-15");
    assert_eq!(entries[0].weight, 180.0);
    assert_eq!(entries[0].activity, Activity::NoRun);
    assert_eq!(entries[0].notes, None);

    teardown_test_store(store).await;
  }

  #[tokio::test]
  async fn test_add_for_date_with_run() {
    let store = setup_test_store().await;

    let script = "5\n2024-13-01\n2024-06-02\n179.5\nmaybe\ny\n3.1\n28\neasy run\n\n6\n";
    let output = run_script(&store, script).await;
    assert!(output.contains("Invalid date format"));
    assert!(output.contains("Entry added successfully!"));

    let entries = store.get_recent_entries(10).await.expect("Failed to read entries");
    assert_eq!(entries[0].date, "2024-06-02");
    assert_eq!(entries[0].activity, Activity::Run { distance: 3.1, duration: 28 });
    assert_eq!(entries[0].notes.as_deref(), Some("easy run"));

    teardown_test_store(store).await;
  }

  #[tokio::test]
  async fn test_reports_render_in_menu() {
    let store = setup_test_store().await;
    store
      .add_entry(&NewEntry::new("2024-06-01", 180.0, Activity::NoRun, None))
      .await
      .expect("Failed to add entry");
    store
      .add_entry(&NewEntry::new(
        "2024-06-02",
        179.5,
        Activity::Run { distance: 3.1, duration: 28 },
        None,
      ))
      .await
      .expect("Failed to add entry");

    let output = run_script(&store, "2\n\n3\n\n4\n\n6\n").await;
    assert!(output.contains("RECENT ENTRIES"));
    assert!(output.contains("Total change: -0.5"));
    assert!(output.contains("Days ran: 1"));
    assert!(output.contains("Run percentage: 50.0%"));

    teardown_test_store(store).await;
  }

  #[tokio::test]
  async fn test_invalid_option_and_closed_input() {
    let store = setup_test_store().await;

    // No exit choice: the session ends when input runs out
    let output = run_script(&store, "9\n\n").await;
    assert!(output.contains("Invalid option. Please try again."));
    assert!(!output.contains("Thanks for using Fitness Tracker!"));

    teardown_test_store(store).await;
  }

  #[tokio::test]
  async fn test_failed_write_is_reported() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = FitnessStore::open(dir.path().join("missing").join("log.db"));

    let output = run_script(&store, "1\n180\nn\n\n\n6\n").await;
    assert!(output.contains("Failed to add entry."));
  }

  #[tokio::test]
  async fn test_failed_reads_keep_menu_running() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = FitnessStore::open(dir.path().join("missing").join("log.db"));

    let output = run_script(&store, "2\n\n3\n\n4\n\n6\n").await;
    assert!(output.contains("Could not load entries"));
    assert!(output.contains("Could not load weight progress"));
    assert!(output.contains("Could not load running statistics"));
    assert!(output.contains("Thanks for using Fitness Tracker!"));
  }
}
