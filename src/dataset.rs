use std::{collections::HashMap, fs, path::Path};

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use crate::error::AppError;

/// Class lookup keyed by class id.
pub type Classes = HashMap<String, ClassInfo>;

/// Day-keyed slots for one week.
pub type Week = HashMap<Weekday, Vec<TimeSlot>>;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Dataset {
    #[serde(default, deserialize_with = "deserialize_classes")]
    pub classes: Classes,
    #[serde(default, deserialize_with = "deserialize_week")]
    pub time: Week,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    #[serde(default)]
    pub events: Vec<EventItem>,
}

/// One scheduled occupancy within a day.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub time: String,
    #[serde(default, alias = "id", skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(default, alias = "teacher", skip_serializing_if = "Option::is_none")]
    pub teacher_override: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClassInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub teacher: Option<String>,
    #[serde(default)]
    pub room: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MilestoneStatus {
    NotStarted,
    InProgress,
    Done,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: MilestoneStatus,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub progress: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EventItem {
    pub date: NaiveDate,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Dataset {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let source = fs::read_to_string(path).map_err(|source| AppError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let dataset: Dataset = serde_json::from_str(&source)?;
        debug!(
            "loaded {} with {} classes, {} scheduled days",
            path.display(),
            dataset.classes.len(),
            dataset.time.len()
        );

        Ok(dataset)
    }

    pub fn day(&self, day: Weekday) -> &[TimeSlot] {
        self.time.get(&day).map(Vec::as_slice).unwrap_or_default()
    }
}

impl TimeSlot {
    pub fn new(time: impl Into<String>, class_id: Option<&str>) -> Self {
        Self {
            time: time.into(),
            class_id: class_id.map(str::to_string),
            ..Self::default()
        }
    }

    pub fn class<'a>(&self, classes: &'a Classes) -> Option<&'a ClassInfo> {
        self.class_id.as_ref().and_then(|id| classes.get(id))
    }

    /// The slot's own room, else the room on its class.
    pub fn room<'a>(&'a self, classes: &'a Classes) -> Option<&'a str> {
        self.room
            .as_deref()
            .or_else(|| self.class(classes).and_then(|class| class.room.as_deref()))
    }

    pub fn teacher<'a>(&'a self, classes: &'a Classes) -> Option<&'a str> {
        self.teacher_override
            .as_deref()
            .or_else(|| self.class(classes).and_then(|class| class.teacher.as_deref()))
    }
}

impl MilestoneStatus {
    pub fn label(self) -> &'static str {
        match self {
            MilestoneStatus::NotStarted => "Not started",
            MilestoneStatus::InProgress => "In progress",
            MilestoneStatus::Done => "Done",
            MilestoneStatus::Unknown => "Unknown",
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ClassesRepr {
    Map(HashMap<String, ClassInfo>),
    List(Vec<ClassInfo>),
}

/// Accepts `classes` either as an id-keyed object or as an array.
fn deserialize_classes<'de, D>(deserializer: D) -> Result<Classes, D::Error>
where
    D: Deserializer<'de>,
{
    let classes = match ClassesRepr::deserialize(deserializer)? {
        ClassesRepr::Map(map) => map
            .into_iter()
            .map(|(id, mut class)| {
                if class.id.is_empty() {
                    class.id = id.clone();
                }
                (id, class)
            })
            .collect(),
        ClassesRepr::List(list) => list
            .into_iter()
            .map(|class| (class.id.clone(), class))
            .collect(),
    };

    Ok(classes)
}

/// Reads the day-keyed `time` object, skipping keys that are not weekdays.
fn deserialize_week<'de, D>(deserializer: D) -> Result<Week, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = HashMap::<String, Vec<TimeSlot>>::deserialize(deserializer)?;

    let week = raw
        .into_iter()
        .filter_map(|(key, slots)| match key.parse::<Weekday>() {
            Ok(day) => Some((day, slots)),
            Err(_) => {
                warn!("ignoring schedule under unknown day {:?}", key);
                None
            }
        })
        .collect();

    Ok(week)
}
