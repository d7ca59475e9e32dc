//! Persisted interval settings.
//!
//! Stored as a small JSON object. Missing keys take their defaults, a
//! missing or unreadable file yields [`Settings::default`], and every value is
//! clamped into its valid range on the way in and on the way out.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR: &str = "hiit-timer";
const SETTINGS_FILE: &str = "settings.json";

pub const WORK_RANGE: (u32, u32) = (5, 600);
pub const REST_RANGE: (u32, u32) = (5, 600);
pub const LONG_BREAK_RANGE: (u32, u32) = (60, 1800);
pub const ROUNDS_RANGE: (u32, u32) = (1, 99);
pub const LONG_BREAK_EVERY_RANGE: (u32, u32) = (1, 20);

/// Limit `value` to `[lo, hi]`.
pub fn clamp(value: u32, lo: u32, hi: u32) -> u32 {
    value.max(lo).min(hi)
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write settings to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize settings: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub work_seconds: u32,
    #[serde(rename = "rest_time")]
    pub rest_seconds: u32,
    #[serde(rename = "long_break_time")]
    pub long_break_seconds: u32,
    #[serde(rename = "total_reps")]
    pub total_rounds: u32,
    pub long_break_every: u32,
}

/// On-disk shape. Fields are read as signed integers so one out-of-range
/// value (e.g. a negative) is clamped instead of discarding the whole file.
#[derive(Debug, Deserialize)]
struct RawSettings {
    #[serde(default)]
    work_seconds: Option<i64>,
    #[serde(default, rename = "rest_time", alias = "rest_seconds")]
    rest_seconds: Option<i64>,
    #[serde(default, rename = "long_break_time", alias = "long_break_seconds")]
    long_break_seconds: Option<i64>,
    #[serde(default, rename = "total_reps", alias = "total_rounds")]
    total_rounds: Option<i64>,
    #[serde(default)]
    long_break_every: Option<i64>,
}

fn clamp_raw(value: Option<i64>, default: u32, (lo, hi): (u32, u32)) -> u32 {
    value.map_or(default, |v| v.clamp(lo as i64, hi as i64) as u32)
}

impl From<RawSettings> for Settings {
    fn from(raw: RawSettings) -> Self {
        Self {
            work_seconds: clamp_raw(raw.work_seconds, default_work_seconds(), WORK_RANGE),
            rest_seconds: clamp_raw(raw.rest_seconds, default_rest_seconds(), REST_RANGE),
            long_break_seconds: clamp_raw(
                raw.long_break_seconds,
                default_long_break_seconds(),
                LONG_BREAK_RANGE,
            ),
            total_rounds: clamp_raw(raw.total_rounds, default_total_rounds(), ROUNDS_RANGE),
            long_break_every: clamp_raw(
                raw.long_break_every,
                default_long_break_every(),
                LONG_BREAK_EVERY_RANGE,
            ),
        }
    }
}

fn default_work_seconds() -> u32 {
    40
}
fn default_rest_seconds() -> u32 {
    20
}
fn default_long_break_seconds() -> u32 {
    300
}
fn default_total_rounds() -> u32 {
    10
}
fn default_long_break_every() -> u32 {
    5
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_seconds: default_work_seconds(),
            rest_seconds: default_rest_seconds(),
            long_break_seconds: default_long_break_seconds(),
            total_rounds: default_total_rounds(),
            long_break_every: default_long_break_every(),
        }
    }
}

impl Settings {
    /// Copy with every field forced into its valid range.
    pub fn clamped(self) -> Self {
        Self {
            work_seconds: clamp(self.work_seconds, WORK_RANGE.0, WORK_RANGE.1),
            rest_seconds: clamp(self.rest_seconds, REST_RANGE.0, REST_RANGE.1),
            long_break_seconds: clamp(
                self.long_break_seconds,
                LONG_BREAK_RANGE.0,
                LONG_BREAK_RANGE.1,
            ),
            total_rounds: clamp(self.total_rounds, ROUNDS_RANGE.0, ROUNDS_RANGE.1),
            long_break_every: clamp(
                self.long_break_every,
                LONG_BREAK_EVERY_RANGE.0,
                LONG_BREAK_EVERY_RANGE.1,
            ),
        }
    }

    pub fn get(&self, field: SettingsField) -> u32 {
        match field {
            SettingsField::WorkSeconds => self.work_seconds,
            SettingsField::RestSeconds => self.rest_seconds,
            SettingsField::LongBreakSeconds => self.long_break_seconds,
            SettingsField::TotalRounds => self.total_rounds,
            SettingsField::LongBreakEvery => self.long_break_every,
        }
    }

    /// Move `field` one step up or down, clamped to its range.
    pub fn adjust(&mut self, field: SettingsField, increase: bool) {
        let (lo, hi) = field.range();
        let current = self.get(field);
        let next = if increase {
            current.saturating_add(field.step())
        } else {
            current.saturating_sub(field.step())
        };
        let value = clamp(next, lo, hi);

        match field {
            SettingsField::WorkSeconds => self.work_seconds = value,
            SettingsField::RestSeconds => self.rest_seconds = value,
            SettingsField::LongBreakSeconds => self.long_break_seconds = value,
            SettingsField::TotalRounds => self.total_rounds = value,
            SettingsField::LongBreakEvery => self.long_break_every = value,
        }
    }
}

/// Editable row on the settings screen.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SettingsField {
    WorkSeconds,
    RestSeconds,
    LongBreakSeconds,
    TotalRounds,
    LongBreakEvery,
}

impl SettingsField {
    pub const ALL: [SettingsField; 5] = [
        Self::WorkSeconds,
        Self::RestSeconds,
        Self::LongBreakSeconds,
        Self::TotalRounds,
        Self::LongBreakEvery,
    ];

    pub fn next(self) -> Self {
        match self {
            Self::WorkSeconds => Self::RestSeconds,
            Self::RestSeconds => Self::LongBreakSeconds,
            Self::LongBreakSeconds => Self::TotalRounds,
            Self::TotalRounds => Self::LongBreakEvery,
            Self::LongBreakEvery => Self::WorkSeconds,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::WorkSeconds => Self::LongBreakEvery,
            Self::RestSeconds => Self::WorkSeconds,
            Self::LongBreakSeconds => Self::RestSeconds,
            Self::TotalRounds => Self::LongBreakSeconds,
            Self::LongBreakEvery => Self::TotalRounds,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::WorkSeconds => "Work Time",
            Self::RestSeconds => "Rest Time",
            Self::LongBreakSeconds => "Long Break",
            Self::TotalRounds => "Rounds",
            Self::LongBreakEvery => "Long Break Every",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Self::WorkSeconds | Self::RestSeconds | Self::LongBreakSeconds => "s",
            Self::TotalRounds | Self::LongBreakEvery => " rounds",
        }
    }

    /// Up/Down increment. Round counts move by one; with ranges of 1..=99 and
    /// 1..=20 a larger step would skip most values.
    pub fn step(self) -> u32 {
        match self {
            Self::WorkSeconds | Self::RestSeconds => 5,
            Self::LongBreakSeconds => 15,
            Self::TotalRounds | Self::LongBreakEvery => 1,
        }
    }

    pub fn range(self) -> (u32, u32) {
        match self {
            Self::WorkSeconds => WORK_RANGE,
            Self::RestSeconds => REST_RANGE,
            Self::LongBreakSeconds => LONG_BREAK_RANGE,
            Self::TotalRounds => ROUNDS_RANGE,
            Self::LongBreakEvery => LONG_BREAK_EVERY_RANGE,
        }
    }
}

/// Reads and writes [`Settings`] at a fixed path.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/hiit-timer/settings.json`, or `./settings.json` when the
    /// platform has no config dir.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join(SETTINGS_FILE))
            .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Never fails: anything unreadable falls back to defaults.
    pub fn load(&self) -> Settings {
        let contents = match fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", self.path.display());
                return Settings::default();
            }
            Err(e) => {
                log::warn!("Could not read {}: {}", self.path.display(), e);
                return Settings::default();
            }
        };

        match serde_json::from_str::<RawSettings>(&contents) {
            Ok(raw) => {
                log::debug!("Loaded settings: {:?}", raw);
                Settings::from(raw)
            }
            Err(e) => {
                log::warn!("Ignoring corrupt settings file {}: {}", self.path.display(), e);
                Settings::default()
            }
        }
    }

    /// Clamp and write atomically through a sibling temp file.
    pub fn save(&self, settings: &Settings) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&settings.clamped())?;

        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;

        log::info!("Saved settings to {}", self.path.display());
        Ok(())
    }
}
