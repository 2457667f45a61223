use std::{fs, io, path::Path, path::PathBuf};

use chrono::{NaiveTime, Timelike};
use tracing::debug;

use crate::{error::AppError, grid::GridKey, schedule::ScheduleConfig};

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub datasets: Vec<DatasetEntry>,
    pub default_dataset: String,
    /// Length of a slot whose label has no end time.
    pub period_minutes: u32,
    pub day_window: DayWindow,
    pub grid_key: GridKey,
    pub time_format: TimeFormat,
    pub refresh_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct DatasetEntry {
    pub id: String,
    pub label: String,
}

/// Span shown for a day that has no classes.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct DayWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize)]
pub enum TimeFormat {
    #[default]
    #[serde(rename = "12h")]
    TwelveHour,
    #[serde(rename = "24h")]
    TwentyFourHour,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            datasets: vec![
                DatasetEntry {
                    id: "dse".to_string(),
                    label: "DSE".to_string(),
                },
                DatasetEntry {
                    id: "ge".to_string(),
                    label: "2 GEs".to_string(),
                },
            ],
            default_dataset: "dse".to_string(),
            period_minutes: 60,
            day_window: DayWindow::default(),
            grid_key: GridKey::default(),
            time_format: TimeFormat::default(),
            refresh_secs: 60,
        }
    }
}

impl Default for DayWindow {
    fn default() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default(),
            end: NaiveTime::from_hms_opt(17, 0, 0).unwrap_or_default(),
        }
    }
}

impl Settings {
    /// Reads settings from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("no settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(AppError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        Ok(toml::from_str(&source)?)
    }

    pub fn schedule_config(&self) -> ScheduleConfig {
        ScheduleConfig {
            period_minutes: self.period_minutes,
            default_start: minute_of_day(self.day_window.start),
            default_end: minute_of_day(self.day_window.end),
        }
    }

    /// Resolves a dataset identifier to its JSON file.
    pub fn dataset_path(&self, id: &str) -> Result<PathBuf, AppError> {
        if !self.datasets.iter().any(|entry| entry.id == id) {
            return Err(AppError::UnknownDataset(id.to_string()));
        }

        Ok(self.data_dir.join(format!("{id}.json")))
    }
}

fn minute_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}
