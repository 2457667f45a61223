use std::collections::HashMap;

use chrono::{Datelike, Months, NaiveDate};

use crate::dataset::{EventItem, Milestone};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDay<'a> {
    pub date: NaiveDate,
    pub in_month: bool,
    pub is_today: bool,
    pub events: Vec<&'a EventItem>,
}

/// Whole Monday-to-Sunday weeks covering the month that contains `month`.
pub fn month_grid<'a>(
    events: &'a [EventItem],
    month: NaiveDate,
    today: NaiveDate,
) -> Vec<CalendarDay<'a>> {
    let first = month.with_day(1).unwrap_or(month);
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(first);

    let grid_start = first - chrono::Duration::days(first.weekday().num_days_from_monday().into());
    let grid_end = last + chrono::Duration::days((6 - last.weekday().num_days_from_monday()).into());

    let mut by_date: HashMap<NaiveDate, Vec<&EventItem>> = HashMap::new();
    for event in events {
        by_date.entry(event.date).or_default().push(event);
    }

    grid_start
        .iter_days()
        .take_while(|date| *date <= grid_end)
        .map(|date| CalendarDay {
            date,
            in_month: date.month() == first.month() && date.year() == first.year(),
            is_today: date == today,
            events: by_date.remove(&date).unwrap_or_default(),
        })
        .collect()
}

/// Milestones ordered by due date; undated ones come first.
pub fn sorted_milestones(milestones: &[Milestone]) -> Vec<&Milestone> {
    let mut sorted: Vec<&Milestone> = milestones.iter().collect();
    sorted.sort_by_key(|milestone| milestone.due_date);
    sorted
}

/// Progress as a whole percentage in `0..=100`.
pub fn clamp_progress(progress: f64) -> u8 {
    progress.clamp(0.0, 100.0).round() as u8
}
