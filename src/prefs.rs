use std::{fs, io, path::PathBuf};

use chrono::Weekday;
use tracing::debug;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Daily,
    Monthly,
    Weekly,
}

/// Remembered UI choices. Keys mirror the planner's storage keys.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize)]
pub struct Preferences {
    #[serde(rename = "planner_dataset", default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<String>,
    #[serde(rename = "planner_view", default, skip_serializing_if = "Option::is_none")]
    pub view: Option<ViewMode>,
    /// Day index with Sunday as 0.
    #[serde(rename = "active-day", default, skip_serializing_if = "Option::is_none")]
    pub active_day: Option<u8>,
}

/// Choices given on the command line for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    pub dataset: Option<String>,
    /// Set when a view command was given.
    pub view: Option<ViewMode>,
    pub day: Option<Weekday>,
}

/// What a run shows once its request is merged with the remembered choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub dataset: String,
    pub view: ViewMode,
    pub day: Weekday,
}

impl Preferences {
    /// Remembers the requested dataset, view and day, then resolves what to show.
    ///
    /// Without a requested view the remembered one is used, falling back to
    /// the daily view.
    pub fn apply(&mut self, request: Request, default_dataset: &str, today: Weekday) -> Selection {
        if let Some(id) = request.dataset {
            self.dataset = Some(id);
        }
        if let Some(view) = request.view {
            self.view = Some(view);
        }
        if let Some(day) = request.day {
            self.set_active_weekday(day);
        }

        Selection {
            dataset: self
                .dataset
                .clone()
                .unwrap_or_else(|| default_dataset.to_string()),
            view: self.view.unwrap_or_default(),
            day: self.active_weekday(today),
        }
    }

    /// The remembered day, else `today` with Sunday moved to Monday.
    pub fn active_weekday(&self, today: Weekday) -> Weekday {
        self.active_day
            .and_then(weekday_from_index)
            .unwrap_or(match today {
                Weekday::Sun => Weekday::Mon,
                day => day,
            })
    }

    pub fn set_active_weekday(&mut self, day: Weekday) {
        self.active_day = Some(day.num_days_from_sunday() as u8);
    }
}

pub fn weekday_from_index(index: u8) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

/// Preferences persisted as a small TOML file.
#[derive(Debug, Clone)]
pub struct PreferenceFile {
    path: PathBuf,
}

impl PreferenceFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Result<Preferences, AppError> {
        match fs::read_to_string(&self.path) {
            Ok(source) => Ok(toml::from_str(&source)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("no preferences at {}", self.path.display());
                Ok(Preferences::default())
            }
            Err(source) => Err(AppError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    pub fn save(&self, prefs: &Preferences) -> Result<(), AppError> {
        let encoded = toml::to_string(prefs)?;
        fs::write(&self.path, encoded).map_err(|source| AppError::Write {
            path: self.path.clone(),
            source,
        })?;
        debug!("saved preferences to {}", self.path.display());
        Ok(())
    }

    /// Loads the stored preferences, applies `request` and saves the result.
    pub fn update(
        &self,
        request: Request,
        default_dataset: &str,
        today: Weekday,
    ) -> Result<Selection, AppError> {
        let mut prefs = self.load()?;
        let selection = prefs.apply(request, default_dataset, today);
        self.save(&prefs)?;

        Ok(selection)
    }
}
