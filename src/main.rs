mod cli;

use daytodo::calendar::{self, CalendarDay, MonthView};
use daytodo::config::{Config, StorageConfig};
use daytodo::storage::{self, DateTodoStore, KeyValueStore};
use daytodo::todo::{DateKey, TodoId};
use daytodo::utils::paths::{get_crash_log_path, get_logs_dir};

use anyhow::{Context, Result, anyhow};
use chrono::{Datelike, Local, NaiveDate};
use clap::Parser;
use cli::{Cli, Commands};
use std::fs;
use std::io::{IsTerminal, Write};
use std::panic;

type Store = DateTodoStore<Box<dyn KeyValueStore>>;

/// One crash.log entry. Names the storage in use so a crash can be matched
/// to the data file it may have left behind.
fn crash_report(
    timestamp: &str,
    storage: &str,
    message: Option<&str>,
    location: Option<&str>,
    backtrace: &str,
) -> String {
    let mut report = format!("=== daytodo crash {timestamp} ===\nStorage: {storage}\n");
    report.push_str(&format!("Panic: {}\n", message.unwrap_or("<non-string payload>")));
    if let Some(location) = location {
        report.push_str(&format!("At: {location}\n"));
    }
    report.push_str(&format!("\n{backtrace}\n\n"));
    report
}

/// Append panics to ~/.daytodo/crash.log, then defer to the default hook.
fn install_crash_handler(storage: &StorageConfig) {
    let storage = format!("{:?} backend, key {:?}", storage.backend, storage.key);
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        let message = info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| info.payload().downcast_ref::<String>().map(String::as_str));
        let location = info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()));
        let report = crash_report(
            &Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            &storage,
            message,
            location.as_deref(),
            &std::backtrace::Backtrace::force_capture().to_string(),
        );

        if let Ok(path) = get_crash_log_path() {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let written = fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .and_then(|mut file| file.write_all(report.as_bytes()));
            if written.is_ok() {
                eprintln!("\nCrash logged to: {}", path.display());
            }
        }

        default_hook(info);
    }));
}

/// Initialize file-based logging.
///
/// Logs are written to ~/.daytodo/logs/daytodo.log, rolling daily.
/// RUST_LOG overrides the configured level.
fn init_file_logging(level: &str) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let logs_dir = get_logs_dir().ok()?;

    if let Err(e) = fs::create_dir_all(&logs_dir) {
        eprintln!("Warning: Could not create logs directory: {}", e);
        return None;
    }

    let file_appender = tracing_appender::rolling::daily(&logs_dir, "daytodo.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    Some(guard)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    install_crash_handler(&config.storage);

    // Guard must outlive every log call
    let _log_guard = init_file_logging(&config.log_level);
    tracing::debug!(backend = ?config.storage.backend, key = %config.storage.key, "daytodo starting");

    let mut store = storage::open_store(&config.storage)?;

    match cli.command {
        Some(Commands::Add { text, date }) => handle_add(&mut store, date, &text)?,
        Some(Commands::Show { date }) => handle_show(&store, date)?,
        Some(Commands::Toggle { id, date }) => handle_toggle(&mut store, date, id)?,
        Some(Commands::Edit { id, text, date }) => handle_edit(&mut store, date, id, &text)?,
        Some(Commands::Delete { id, date }) => handle_delete(&mut store, date, id)?,
        Some(Commands::Move { from, to, date }) => handle_move(&mut store, date, from, to)?,
        Some(Commands::Calendar { month }) => handle_calendar(&store, month)?,
        None => handle_show(&store, None)?,
    }

    flush_before_exit(&mut store);
    Ok(())
}

fn resolve_date(date: Option<String>) -> Result<DateKey> {
    match date {
        Some(input) => DateKey::parse(&input),
        None => Ok(DateKey::today()),
    }
}

fn parse_month(input: &str) -> Result<(i32, u32)> {
    let first = NaiveDate::parse_from_str(&format!("{}-01", input.trim()), "%Y-%m-%d")
        .map_err(|_| anyhow!("Invalid month format. Use YYYY-MM"))?;
    Ok((first.year(), first.month()))
}

/// Retry a failed write once before exiting, then tell the user.
fn flush_before_exit(store: &mut Store) {
    if let Err(e) = store.flush() {
        tracing::warn!(error = %e, "Final write failed");
        eprintln!("Warning: changes could not be saved and will be lost: {:#}", e);
    }
}

fn handle_add(store: &mut Store, date: Option<String>, text: &str) -> Result<()> {
    let date = resolve_date(date)?;
    match store.add_todo(&date, text) {
        Some(id) => println!("✓ Added todo {} for {}", id, date),
        None => println!("Nothing to add: the todo text is empty"),
    }
    Ok(())
}

fn handle_show(store: &Store, date: Option<String>) -> Result<()> {
    let date = resolve_date(date)?;
    let todos = store.todos_for_date(&date);

    if todos.is_empty() {
        println!("No todos for {}!", date);
        return Ok(());
    }

    let heading = date
        .to_naive_date()
        .map(|d| d.format("%B %d, %Y").to_string())
        .unwrap_or_else(|| date.to_string());
    println!("\nTodos for {}\n", heading);

    let id_width = todos
        .iter()
        .map(|item| item.id.to_string().len())
        .max()
        .unwrap_or(0);
    for item in todos {
        println!("  {:>width$}  {}", item.id.to_string(), item, width = id_width);
    }

    if store.all_completed(&date) {
        println!("\nAll done!");
    }
    println!();

    Ok(())
}

fn handle_toggle(store: &mut Store, date: Option<String>, id: TodoId) -> Result<()> {
    let date = resolve_date(date)?;
    if store.toggle_todo(&date, id) {
        let done = store
            .todos_for_date(&date)
            .iter()
            .find(|item| item.id == id)
            .is_some_and(|item| item.completed);
        println!("✓ Todo {} marked {}", id, if done { "done" } else { "open" });
    } else {
        println!("No todo {} on {}", id, date);
    }
    Ok(())
}

fn handle_edit(store: &mut Store, date: Option<String>, id: TodoId, text: &str) -> Result<()> {
    let date = resolve_date(date)?;
    if store.edit_todo(&date, id, text) {
        println!("✓ Todo {} updated", id);
    } else {
        println!("No todo {} on {}", id, date);
    }
    Ok(())
}

fn handle_delete(store: &mut Store, date: Option<String>, id: TodoId) -> Result<()> {
    let date = resolve_date(date)?;
    if store.delete_todo(&date, id) {
        println!("✓ Todo {} deleted", id);
    } else {
        println!("No todo {} on {}", id, date);
    }
    Ok(())
}

fn handle_move(store: &mut Store, date: Option<String>, from: TodoId, to: TodoId) -> Result<()> {
    let date = resolve_date(date)?;
    if store.reorder_todo(&date, from, to) {
        println!("✓ Todo {} moved", from);
        handle_show(store, Some(date.to_string()))?;
    } else {
        println!("Nothing moved: both todos must exist on {} and differ", date);
    }
    Ok(())
}

fn handle_calendar(store: &Store, month: Option<String>) -> Result<()> {
    let (year, month) = match month {
        Some(input) => parse_month(&input)?,
        None => {
            let today = Local::now().date_naive();
            (today.year(), today.month())
        }
    };

    let view = MonthView::build(store.collection(), year, month)
        .with_context(|| format!("Month out of range: {year}-{month:02}"))?;
    let (prev_year, prev_month) = calendar::shift_month(year, month, -1);
    let (next_year, next_month) = calendar::shift_month(year, month, 1);
    let today = Local::now().date_naive();
    let dim = std::io::stdout().is_terminal();

    println!("\n{:^28}\n", view.title());
    println!(" Sun Mon Tue Wed Thu Fri Sat");
    for week in view.weeks() {
        let line: String = week.iter().map(|day| calendar_cell(day, today, dim)).collect();
        println!("{}", line);
    }
    println!("\n * open todos   + all done   > today");
    println!(
        " prev: {prev_year}-{prev_month:02}   next: {next_year}-{next_month:02}\n"
    );

    Ok(())
}

/// Four columns per day. Days from the neighbouring months keep their
/// markers but are dimmed when writing to a terminal.
fn calendar_cell(day: &CalendarDay, today: NaiveDate, dim: bool) -> String {
    let marker = if day.date == today { '>' } else { ' ' };
    let cell = format!("{}{:>2}{}", marker, day.date.day(), day.indicator.symbol());
    if dim && !day.in_month {
        format!("\x1b[2m{cell}\x1b[0m")
    } else {
        cell
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use daytodo::calendar::DayIndicator;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_crash_report_names_storage() {
        let report = crash_report(
            "2024-01-01 12:00:00",
            "Sqlite backend, key \"allTodos\"",
            Some("boom"),
            Some("src/main.rs:1:1"),
            "<trace>",
        );
        assert!(report.contains("Storage: Sqlite backend, key \"allTodos\""));
        assert!(report.contains("Panic: boom"));
        assert!(report.contains("At: src/main.rs:1:1"));
    }

    #[test]
    fn test_crash_report_without_message() {
        let report = crash_report("t", "s", None, None, "");
        assert!(report.contains("<non-string payload>"));
        assert!(!report.contains("At:"));
    }

    #[test]
    fn test_calendar_cell_keeps_outside_days_and_markers() {
        let day = CalendarDay {
            date: date(2024, 4, 28),
            in_month: false,
            indicator: DayIndicator::Pending,
        };
        assert_eq!(calendar_cell(&day, date(2024, 5, 1), false), " 28*");
        assert_eq!(
            calendar_cell(&day, date(2024, 5, 1), true),
            "\x1b[2m 28*\x1b[0m"
        );
    }

    #[test]
    fn test_calendar_cell_in_month_is_not_dimmed() {
        let day = CalendarDay {
            date: date(2024, 5, 3),
            in_month: true,
            indicator: DayIndicator::AllCompleted,
        };
        assert_eq!(calendar_cell(&day, date(2024, 5, 3), true), "> 3+");
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2024-05").unwrap(), (2024, 5));
        assert!(parse_month("2024-13").is_err());
    }
}
