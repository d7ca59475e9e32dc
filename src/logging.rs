//! File logging.
//!
//! The terminal belongs to the UI, so log lines only go to
//! `<data dir>/hiit-timer/hiit-timer.log`.

use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::{self, OpenOptions};
use std::path::PathBuf;

const MAX_LOG_BYTES: u64 = 1024 * 1024;

pub fn get_log_directory() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("hiit-timer"))
}

/// Start logging to file. Returns the log path, or `None` when logging could
/// not be set up (the app runs fine without it).
pub fn init_logging(verbose: bool) -> Option<PathBuf> {
    let log_dir = get_log_directory()?;
    if let Err(e) = fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Could not create log directory: {}", e);
        return None;
    }

    let log_path = log_dir.join("hiit-timer.log");

    if let Ok(metadata) = fs::metadata(&log_path) {
        if metadata.len() > MAX_LOG_BYTES {
            let _ = fs::rename(&log_path, log_dir.join("hiit-timer.log.old"));
        }
    }

    let log_file = match OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not open log file: {}", e);
            return None;
        }
    };

    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_thread_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .build();

    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    if WriteLogger::init(level, config, log_file).is_err() {
        eprintln!("Warning: Logger already initialized");
    }

    log::info!(
        "=== hiit-timer started {} ===",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    Some(log_path)
}
