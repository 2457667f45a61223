//! Plain-text views.

use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::{
    calendar::{clamp_progress, CalendarDay},
    dataset::{Classes, Milestone},
    grid::{Cell, WeekGrid, WEEK_COLUMNS},
    parser::{format_clock, TimeRange, MINUTES_PER_DAY},
    schedule::{next_up, EnrichedSlot, NextUp, SlotStatus},
    settings::TimeFormat,
};

const EVENTS_PER_DAY: usize = 3;

/// A day's timeline. `reference` is only set when `day` is today.
pub struct DailyView<'a> {
    pub day: Weekday,
    pub timeline: &'a [EnrichedSlot],
    pub classes: &'a Classes,
    pub reference: Option<u32>,
    pub format: TimeFormat,
}

impl fmt::Display for DailyView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", day_name(self.day))?;
        if self.reference.is_some() {
            write!(f, " (today)")?;
        }
        writeln!(f)?;

        if let Some(reference) = self.reference {
            writeln!(
                f,
                "{}",
                status_line(self.timeline, self.classes, reference, self.format)
            )?;
        }
        writeln!(f)?;

        for entry in self.timeline {
            let marker = match self.reference.map(|minute| entry.status(minute)) {
                Some(SlotStatus::Current) => '>',
                Some(SlotStatus::Past) => '-',
                _ => ' ',
            };

            write!(
                f,
                "{} {:<21} {}",
                marker,
                entry.range.display(self.format),
                entry.title(self.classes)
            )?;

            if let Some(slot) = entry.slot() {
                let details: Vec<&str> = [slot.room(self.classes), slot.teacher(self.classes)]
                    .into_iter()
                    .flatten()
                    .collect();
                if !details.is_empty() {
                    write!(f, " | {}", details.join(" | "))?;
                }
                if let Some(kind) = entry.type_tag() {
                    write!(f, " [{}]", kind)?;
                }
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

pub fn daily(
    day: Weekday,
    timeline: &[EnrichedSlot],
    classes: &Classes,
    reference: Option<u32>,
    format: TimeFormat,
) -> String {
    DailyView {
        day,
        timeline,
        classes,
        reference,
        format,
    }
    .to_string()
}

pub fn status_line(
    timeline: &[EnrichedSlot],
    classes: &Classes,
    reference: u32,
    format: TimeFormat,
) -> String {
    match next_up(timeline, reference) {
        NextUp::Ongoing(entry) => format!("Currently in: {}", entry.title(classes)),
        NextUp::Next(entry) => format!(
            "No current class - Next: {} at {}",
            entry.title(classes),
            format_clock(entry.range.start, format)
        ),
        NextUp::Done => "No more classes today - Enjoy your free time!".to_string(),
    }
}

/// The Monday to Saturday table, one row per distinct start.
pub struct WeekView<'a> {
    pub grid: &'a WeekGrid,
    pub period_minutes: u32,
    pub format: TimeFormat,
}

impl WeekView<'_> {
    fn table(&self) -> Vec<Vec<String>> {
        let mut table = Vec::with_capacity(self.grid.rows().len() + 1);

        let mut header = vec!["Time".to_string()];
        header.extend(WEEK_COLUMNS.iter().map(|day| day_name(*day).to_uppercase()));
        table.push(header);

        for row in self.grid.rows() {
            let end = row
                .start
                .saturating_add(self.period_minutes)
                .min(MINUTES_PER_DAY);
            let mut line = vec![TimeRange::new(row.start, end).display(self.format)];
            line.extend(WEEK_COLUMNS.iter().map(|day| {
                self.grid
                    .cell(*day, row)
                    .map_or_else(|| "-".to_string(), cell_text)
            }));
            table.push(line);
        }

        table
    }
}

impl fmt::Display for WeekView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.grid.is_empty() {
            return writeln!(f, "No classes scheduled this week.");
        }

        let table = self.table();
        let widths: Vec<usize> = (0..table[0].len())
            .map(|col| {
                table
                    .iter()
                    .map(|line| line[col].chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        for line in &table {
            let cells: Vec<String> = line
                .iter()
                .zip(&widths)
                .map(|(text, width)| format!("{:<width$}", text, width = width))
                .collect();
            writeln!(f, "{}", cells.join(" | ").trim_end())?;
        }

        Ok(())
    }
}

fn cell_text(cell: &Cell) -> String {
    let kind = cell
        .kind
        .as_ref()
        .map(|kind| format!(" ({})", kind))
        .unwrap_or_default();
    let place = match (&cell.room, &cell.teacher) {
        (Some(room), Some(teacher)) => format!(" {} • {}", room, teacher),
        (Some(room), None) => format!(" {}", room),
        (None, Some(teacher)) => format!(" • {}", teacher),
        (None, None) => String::new(),
    };

    format!("{}{}{}", cell.title, kind, place)
}

pub fn weekly(grid: &WeekGrid, period_minutes: u32, format: TimeFormat) -> String {
    WeekView {
        grid,
        period_minutes,
        format,
    }
    .to_string()
}

/// Month calendar followed by the events of each busy day.
pub struct MonthView<'a>(pub &'a [CalendarDay<'a>]);

impl fmt::Display for MonthView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let days = self.0;

        if let Some(first) = days.iter().find(|day| day.in_month) {
            writeln!(f, "{}", first.date.format("%B %Y"))?;
        }
        writeln!(f, " Mon  Tue  Wed  Thu  Fri  Sat  Sun")?;

        for week in days.chunks(7) {
            let cells: Vec<String> = week
                .iter()
                .map(|day| {
                    let number = if day.in_month {
                        day.date.day().to_string()
                    } else {
                        String::new()
                    };
                    let mark = if day.events.is_empty() { ' ' } else { '*' };
                    if day.is_today {
                        format!("[{:>2}]{}", number, mark)
                    } else {
                        format!(" {:>2} {}", number, mark)
                    }
                })
                .collect();
            writeln!(f, "{}", cells.join("").trim_end())?;
        }

        let busy: Vec<&CalendarDay<'_>> = days
            .iter()
            .filter(|day| day.in_month && !day.events.is_empty())
            .collect();
        if !busy.is_empty() {
            writeln!(f)?;
        }
        for day in busy {
            let count = day.events.len();
            writeln!(
                f,
                "{}  {} event{}",
                day.date.format("%a %-d"),
                count,
                if count > 1 { "s" } else { "" }
            )?;
            for event in day.events.iter().take(EVENTS_PER_DAY) {
                match &event.time {
                    Some(time) => writeln!(f, "  {} {}", time, event.title)?,
                    None => writeln!(f, "  {}", event.title)?,
                }
            }
            if count > EVENTS_PER_DAY {
                writeln!(f, "  +{} more", count - EVENTS_PER_DAY)?;
            }
        }

        Ok(())
    }
}

pub fn monthly(days: &[CalendarDay<'_>]) -> String {
    MonthView(days).to_string()
}

pub struct MilestoneList<'a>(pub &'a [&'a Milestone]);

impl fmt::Display for MilestoneList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No milestones.");
        }

        for milestone in self.0 {
            write!(f, "{} [{}]", milestone.title, milestone.status.label())?;
            if let Some(due) = milestone.due_date {
                write!(f, " due {}", format_due(due))?;
            }
            if let Some(progress) = milestone.progress {
                write!(f, " {}%", clamp_progress(progress))?;
            }
            writeln!(f)?;

            if let Some(description) = &milestone.description {
                writeln!(f, "  {}", description)?;
            }
            if !milestone.tags.is_empty() {
                writeln!(f, "  #{}", milestone.tags.join(" #"))?;
            }
        }

        Ok(())
    }
}

pub fn milestones(milestones: &[&Milestone]) -> String {
    MilestoneList(milestones).to_string()
}

pub fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn format_due(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        calendar::month_grid,
        dataset::{ClassInfo, EventItem, MilestoneStatus, TimeSlot, Week},
        grid::{project, GridKey},
        schedule::{normalize, ScheduleConfig},
    };

    fn classes() -> Classes {
        let mut classes = Classes::new();
        for (id, title, teacher) in [("A", "Algebra", "Ms. Iyer"), ("B", "Biology", "Dr. Rao")] {
            classes.insert(
                id.to_string(),
                ClassInfo {
                    id: id.to_string(),
                    title: title.to_string(),
                    teacher: Some(teacher.to_string()),
                    room: None,
                },
            );
        }
        classes
    }

    fn timeline() -> Vec<EnrichedSlot> {
        let slots = vec![
            TimeSlot::new("9:00-10:00", Some("A")),
            TimeSlot::new("11:00-12:00", Some("B")),
        ];
        normalize(&slots, &ScheduleConfig::default())
    }

    #[test]
    fn daily_marks_current_and_past() {
        let text = daily(
            Weekday::Mon,
            &timeline(),
            &classes(),
            Some(11 * 60 + 15),
            TimeFormat::TwentyFourHour,
        );

        assert!(text.starts_with("Monday (today)\nCurrently in: Biology\n"));
        assert!(text.contains("- 9:00 - 10:00"));
        assert!(text.contains("> 11:00 - 12:00"));
        assert!(text.contains("Free Period"));
        assert!(text.contains("Ms. Iyer"));
    }

    #[test]
    fn daily_for_other_day_has_no_status() {
        let text = daily(
            Weekday::Tue,
            &timeline(),
            &classes(),
            None,
            TimeFormat::TwelveHour,
        );

        assert!(text.starts_with("Tuesday\n\n"));
        assert!(!text.contains('>'));
        assert!(text.contains("9:00 AM - 10:00 AM"));
    }

    #[test]
    fn status_line_variants() {
        let timeline = timeline();
        let classes = classes();

        assert_eq!(
            status_line(&timeline, &classes, 630, TimeFormat::TwelveHour),
            "No current class - Next: Biology at 11:00 AM"
        );
        assert_eq!(
            status_line(&timeline, &classes, 800, TimeFormat::TwelveHour),
            "No more classes today - Enjoy your free time!"
        );
    }

    #[test]
    fn weekly_table_has_header_and_rows() {
        let mut week = Week::new();
        week.insert(Weekday::Mon, vec![TimeSlot::new("9:00", Some("A"))]);
        week.insert(Weekday::Fri, vec![TimeSlot::new("9:00", Some("B"))]);
        let grid = project(&week, &classes(), GridKey::Label);

        let text = weekly(&grid, 60, TimeFormat::TwelveHour);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Time"));
        assert!(lines[0].contains("MONDAY"));
        assert!(lines[1].starts_with("9:00 AM - 10:00 AM"));
        assert!(lines[1].contains("Algebra • Ms. Iyer"));
        assert!(lines[1].contains("Biology • Dr. Rao"));
        assert!(lines[1].contains(" - "));
    }

    #[test]
    fn weekly_row_near_midnight_stays_in_the_day() {
        let mut week = Week::new();
        week.insert(Weekday::Tue, vec![TimeSlot::new("99999999:00", Some("A"))]);
        let grid = project(&week, &classes(), GridKey::Minute);

        let text = weekly(&grid, 60, TimeFormat::TwentyFourHour);

        assert!(text.lines().nth(1).unwrap().starts_with("23:59 - 24:00"));
    }

    #[test]
    fn weekly_empty_grid() {
        let grid = project(&Week::new(), &classes(), GridKey::Label);
        assert_eq!(
            weekly(&grid, 60, TimeFormat::TwelveHour),
            "No classes scheduled this week.\n"
        );
    }

    #[test]
    fn monthly_lists_events_with_overflow() {
        let date = NaiveDate::from_ymd_opt(2025, 9, 3).unwrap();
        let events: Vec<EventItem> = (1..=5)
            .map(|n| EventItem {
                date,
                title: format!("Event {n}"),
                description: None,
                time: (n == 1).then(|| "10:00".to_string()),
                tags: Vec::new(),
            })
            .collect();
        let days = month_grid(&events, date, date);

        let text = monthly(&days);

        assert!(text.starts_with("September 2025\n Mon  Tue  Wed"));
        assert!(text.contains("[ 3]*"));
        assert!(text.contains("Wed 3  5 events"));
        assert!(text.contains("  10:00 Event 1"));
        assert!(text.contains("  +2 more"));
        assert!(!text.contains("Event 4"));
    }

    #[test]
    fn milestone_lines() {
        let milestone = Milestone {
            id: "m1".to_string(),
            title: "Draft thesis".to_string(),
            description: Some("First full draft".to_string()),
            status: MilestoneStatus::InProgress,
            due_date: NaiveDate::from_ymd_opt(2025, 9, 1),
            tags: vec!["writing".to_string()],
            progress: Some(120.0),
        };

        let text = milestones(&[&milestone]);

        assert!(text.starts_with("Draft thesis [In progress] due Sep 1, 2025 100%\n"));
        assert!(text.contains("  First full draft\n"));
        assert!(text.contains("  #writing\n"));
        assert_eq!(milestones(&[]), "No milestones.\n");
    }
}
