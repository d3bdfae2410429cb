//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `studytrack_core` linkage and store wiring from a terminal.
//! - Print one deterministic summary line per subject.
//!
//! Usage: `studytrack [db-path]` (default `studytrack.sqlite3`).
//! Optional `STUDYTRACK_LOG_DIR` (absolute) and `STUDYTRACK_LOG_LEVEL`
//! enable file logging.

use std::error::Error;
use std::process::ExitCode;
use studytrack_core::{default_log_level, init_logging, SqliteStore, TrackerService};

const DEFAULT_DB_PATH: &str = "studytrack.sqlite3";

fn main() -> ExitCode {
    println!("studytrack_core ping={}", studytrack_core::ping());
    println!("studytrack_core version={}", studytrack_core::core_version());

    if let Ok(log_dir) = std::env::var("STUDYTRACK_LOG_DIR") {
        let level = std::env::var("STUDYTRACK_LOG_LEVEL")
            .unwrap_or_else(|_| default_log_level().to_string());
        if let Err(err) = init_logging(&level, &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DB_PATH.to_string());

    let tracker = match open_tracker(&db_path) {
        Ok(tracker) => tracker,
        Err(err) => {
            eprintln!("failed to open `{db_path}`: {err}");
            log::error!("event=cli_open module=cli status=error error={err}");
            return ExitCode::FAILURE;
        }
    };

    for warning in tracker.store().load_warnings() {
        eprintln!("warning: {warning}");
    }

    let dashboard = tracker.dashboard();
    for summary in &dashboard.subjects {
        let attendance = summary
            .attendance_percent
            .map_or_else(|| "-".to_string(), |percent| format!("{percent}%"));
        println!(
            "{} syllabus={}% ({}/{}) pyq_mastered={}/{} attendance={} notes={}",
            summary.code,
            summary.syllabus.percent,
            summary.syllabus.completed_topics,
            summary.syllabus.total_topics,
            summary.pyq.mastered,
            summary.pyq.total,
            attendance,
            summary.note_count
        );
    }
    println!(
        "overall syllabus={}% attendance={}%",
        dashboard.syllabus.percent, dashboard.attendance_percent
    );

    ExitCode::SUCCESS
}

fn open_tracker(db_path: &str) -> Result<TrackerService<SqliteStore>, Box<dyn Error>> {
    let store = SqliteStore::open(db_path)?;
    Ok(TrackerService::open(store)?)
}
