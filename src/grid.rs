//! Weekly day×time projection.

use std::collections::{BTreeSet, HashMap};

use chrono::Weekday;

use crate::{
    dataset::{Classes, TimeSlot, Week},
    parser::{format_minutes, start_label, to_minutes},
    schedule::FREE_PERIOD,
};

/// Columns of the weekly table, in display order.
pub const WEEK_COLUMNS: [Weekday; 6] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// How slots from different days are matched into the same row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GridKey {
    /// Literal start label: `9:00` and `09:00` are different rows.
    #[default]
    Label,
    /// Parsed start minute: `9:00` and `09:00` share a row.
    Minute,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowKey {
    pub start: u32,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub title: String,
    pub kind: Option<String>,
    pub room: Option<String>,
    pub teacher: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct WeekGrid {
    rows: Vec<RowKey>,
    cells: HashMap<(Weekday, RowKey), Cell>,
}

impl RowKey {
    fn for_slot(slot: &TimeSlot, key: GridKey) -> Self {
        let label = start_label(&slot.time);
        let start = to_minutes(label);
        match key {
            GridKey::Label => Self {
                start,
                label: label.to_string(),
            },
            GridKey::Minute => Self {
                start,
                label: format_minutes(start),
            },
        }
    }
}

impl Cell {
    fn resolve(slot: &TimeSlot, classes: &Classes) -> Self {
        Self {
            title: slot
                .class(classes)
                .map_or(FREE_PERIOD, |class| class.title.as_str())
                .to_string(),
            kind: slot.kind.clone(),
            room: slot.room(classes).map(str::to_string),
            teacher: slot.teacher(classes).map(str::to_string),
        }
    }
}

impl WeekGrid {
    /// Row keys ordered by start minute, then label.
    pub fn rows(&self) -> &[RowKey] {
        &self.rows
    }

    pub fn cell(&self, day: Weekday, row: &RowKey) -> Option<&Cell> {
        self.cells.get(&(day, row.clone()))
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Projects a week of slots onto rows keyed by start time.
///
/// A later slot with the same day and row replaces an earlier one.
pub fn project(week: &Week, classes: &Classes, key: GridKey) -> WeekGrid {
    let mut rows = BTreeSet::new();
    let mut cells = HashMap::new();

    for (day, slots) in week {
        for slot in slots {
            let row = RowKey::for_slot(slot, key);
            rows.insert(row.clone());
            cells.insert((*day, row), Cell::resolve(slot, classes));
        }
    }

    WeekGrid {
        rows: rows.into_iter().collect(),
        cells,
    }
}
