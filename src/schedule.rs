//! Daily timeline construction.
//!
//! A day's slots arrive unsorted and with gaps. [`normalize`] orders them and
//! fills every uncovered stretch between the first start and the last end
//! with a synthesized Free Period, so the timeline reads as one continuous
//! span. Classification against a reference minute is done separately by
//! [`EnrichedSlot::status`] and [`next_up`] so the timeline can be reused
//! across refresh ticks.

use crate::{
    dataset::{Classes, TimeSlot},
    parser::{parse_range_lenient, TimeRange},
};

pub const FREE_PERIOD: &str = "Free Period";
pub const FREE_TYPE: &str = "Free";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleConfig {
    /// Length of a slot whose label has no end time.
    pub period_minutes: u32,
    /// Timeline bounds used when a day has no slots at all.
    pub default_start: u32,
    pub default_end: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            period_minutes: 60,
            default_start: 8 * 60,
            default_end: 17 * 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotKind {
    Class(TimeSlot),
    Free,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedSlot {
    pub range: TimeRange,
    /// The slot's own label, or a canonical `H:MM-H:MM` for free periods.
    pub label: String,
    pub kind: SlotKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    Past,
    Current,
    Upcoming,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextUp<'a> {
    Ongoing(&'a EnrichedSlot),
    Next(&'a EnrichedSlot),
    Done,
}

impl EnrichedSlot {
    fn class(range: TimeRange, slot: &TimeSlot) -> Self {
        Self {
            range,
            label: slot.time.clone(),
            kind: SlotKind::Class(slot.clone()),
        }
    }

    fn free(start: u32, end: u32) -> Self {
        let range = TimeRange::new(start, end);
        Self {
            range,
            label: range.label(),
            kind: SlotKind::Free,
        }
    }

    pub fn is_free(&self) -> bool {
        matches!(self.kind, SlotKind::Free)
    }

    pub fn slot(&self) -> Option<&TimeSlot> {
        match &self.kind {
            SlotKind::Class(slot) => Some(slot),
            SlotKind::Free => None,
        }
    }

    pub fn type_tag(&self) -> Option<&str> {
        match &self.kind {
            SlotKind::Class(slot) => slot.kind.as_deref(),
            SlotKind::Free => Some(FREE_TYPE),
        }
    }

    /// Class title, falling back to "Free Period" when the class is unknown.
    pub fn title<'a>(&'a self, classes: &'a Classes) -> &'a str {
        self.slot()
            .and_then(|slot| slot.class(classes))
            .map_or(FREE_PERIOD, |class| class.title.as_str())
    }

    pub fn status(&self, reference: u32) -> SlotStatus {
        if !self.is_free() && self.range.contains(reference) {
            SlotStatus::Current
        } else if reference >= self.range.end {
            SlotStatus::Past
        } else {
            SlotStatus::Upcoming
        }
    }
}

/// Earliest start and latest end across the slots, or the configured window.
pub fn day_bounds(ranges: &[TimeRange], config: &ScheduleConfig) -> (u32, u32) {
    let start = ranges.iter().map(|range| range.start).min();
    let end = ranges.iter().map(|range| range.end).max();

    (
        start.unwrap_or(config.default_start),
        end.unwrap_or(config.default_end),
    )
}

/// Orders a day's slots and fills the gaps between them with free periods.
///
/// Overlapping slots are all kept; the sweep cursor never moves backwards, so
/// a slot nested inside an earlier one produces no extra free period.
pub fn normalize(slots: &[TimeSlot], config: &ScheduleConfig) -> Vec<EnrichedSlot> {
    let mut parsed: Vec<(TimeRange, &TimeSlot)> = slots
        .iter()
        .map(|slot| (parse_range_lenient(&slot.time, config.period_minutes), slot))
        .collect();

    let ranges: Vec<TimeRange> = parsed.iter().map(|(range, _)| *range).collect();
    let (day_start, day_end) = day_bounds(&ranges, config);

    // stable: equal starts keep input order
    parsed.sort_by_key(|(range, _)| range.start);

    let mut timeline = Vec::with_capacity(parsed.len() * 2 + 1);
    let mut cursor = day_start;
    for (range, slot) in parsed {
        if range.start > cursor {
            timeline.push(EnrichedSlot::free(cursor, range.start));
        }
        timeline.push(EnrichedSlot::class(range, slot));
        cursor = cursor.max(range.end);
    }

    if cursor < day_end {
        timeline.push(EnrichedSlot::free(cursor, day_end));
    }

    timeline
}

pub fn current_index(timeline: &[EnrichedSlot], reference: u32) -> Option<usize> {
    timeline
        .iter()
        .position(|slot| slot.status(reference) == SlotStatus::Current)
}

/// The class in progress, else the next class to start, else [`NextUp::Done`].
pub fn next_up(timeline: &[EnrichedSlot], reference: u32) -> NextUp<'_> {
    if let Some(index) = current_index(timeline, reference) {
        return NextUp::Ongoing(&timeline[index]);
    }

    timeline
        .iter()
        .find(|slot| !slot.is_free() && slot.range.start > reference)
        .map_or(NextUp::Done, NextUp::Next)
}
