use std::path::PathBuf;

use chrono::Weekday;
use planner::{
    dataset::{Dataset, TimeSlot},
    parser::{parse_range_lenient, TimeRange},
    schedule::{
        current_index, day_bounds, next_up, normalize, EnrichedSlot, NextUp, ScheduleConfig,
    },
};

fn sample(name: &str) -> Dataset {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("data")
        .join(name);
    Dataset::load(&path).expect("sample dataset should load")
}

/// Checks that `timeline` is `slots` laid out over the whole day: it starts
/// at the day's first minute, ends at its last, and free periods fill the
/// gaps without touching any class.
fn assert_covers_day(slots: &[TimeSlot], timeline: &[EnrichedSlot], config: &ScheduleConfig) {
    let mut input: Vec<TimeRange> = slots
        .iter()
        .map(|slot| parse_range_lenient(&slot.time, config.period_minutes))
        .collect();
    let (day_start, day_end) = day_bounds(&input, config);

    let first = timeline.first().expect("timeline is never empty");
    assert_eq!(first.range.start, day_start, "timeline starts late or early");
    let last_end = timeline.iter().map(|entry| entry.range.end).max();
    assert_eq!(last_end, Some(day_end), "timeline does not reach the day end");

    let mut cursor = day_start;
    let mut previous_start = day_start;
    for entry in timeline {
        assert!(
            entry.range.start <= cursor,
            "gap before {} (cursor at {})",
            entry.label,
            cursor
        );
        assert!(entry.range.start >= previous_start, "{} is out of order", entry.label);
        if entry.is_free() {
            assert_eq!(entry.range.start, cursor, "{} overlaps a class", entry.label);
        }
        previous_start = entry.range.start;
        cursor = cursor.max(entry.range.end);
    }

    let mut classes: Vec<TimeRange> = timeline
        .iter()
        .filter(|entry| !entry.is_free())
        .map(|entry| entry.range)
        .collect();
    for free in timeline.iter().filter(|entry| entry.is_free()) {
        assert!(free.range.duration() > 0, "empty free period {}", free.label);
        for class in &classes {
            assert!(
                free.range.end <= class.start || class.end <= free.range.start,
                "{} overlaps {:?}",
                free.label,
                class
            );
        }
    }

    // classes overlap only where the input already did
    input.sort();
    classes.sort();
    assert_eq!(classes, input);
}

#[test]
fn end_to_end_two_classes() {
    let slots = vec![
        TimeSlot::new("9:00-10:00", Some("A")),
        TimeSlot::new("13:00-14:00", Some("B")),
    ];
    let timeline = normalize(&slots, &ScheduleConfig::default());

    let ranges: Vec<TimeRange> = timeline.iter().map(|entry| entry.range).collect();
    assert_eq!(
        ranges,
        [
            TimeRange::new(540, 600),
            TimeRange::new(600, 780),
            TimeRange::new(780, 840)
        ]
    );
    assert!(!timeline[0].is_free());
    assert!(timeline[1].is_free());
    assert!(!timeline[2].is_free());
}

#[test]
fn every_sample_day_is_contiguous() {
    for name in ["dse.json", "ge.json"] {
        let dataset = sample(name);
        for day in [
            Weekday::Sun,
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
        ] {
            let config = ScheduleConfig::default();
            let timeline = normalize(dataset.day(day), &config);
            assert!(!timeline.is_empty(), "{name} {day:?} is empty");
            assert_covers_day(dataset.day(day), &timeline, &config);
        }
    }
}

#[test]
fn partial_overlap_frees_from_latest_end() {
    let slots = vec![
        TimeSlot::new("9:00-11:00", Some("A")),
        TimeSlot::new("10:00-12:00", Some("B")),
        TimeSlot::new("13:00-14:00", Some("C")),
    ];
    let config = ScheduleConfig::default();
    let timeline = normalize(&slots, &config);

    assert_covers_day(&slots, &timeline, &config);
    let ranges: Vec<TimeRange> = timeline.iter().map(|entry| entry.range).collect();
    assert_eq!(
        ranges,
        [
            TimeRange::new(540, 660),
            TimeRange::new(600, 720),
            TimeRange::new(720, 780),
            TimeRange::new(780, 840)
        ]
    );
    assert!(timeline[2].is_free());
    assert_eq!(timeline[2].label, "12:00-13:00");
}

#[test]
fn unsorted_sample_monday() {
    let dataset = sample("dse.json");
    let timeline = normalize(dataset.day(Weekday::Mon), &ScheduleConfig::default());

    let titles: Vec<&str> = timeline
        .iter()
        .map(|entry| entry.title(&dataset.classes))
        .collect();
    assert_eq!(
        titles,
        [
            "Data Structures",
            "Probability & Statistics",
            "Free Period",
            "Machine Learning"
        ]
    );
    assert_eq!(timeline[2].label, "11:00-13:00");
}

#[test]
fn saturday_without_classes_spans_default_window() {
    let dataset = sample("dse.json");
    let timeline = normalize(dataset.day(Weekday::Sat), &ScheduleConfig::default());

    assert_eq!(timeline.len(), 1);
    assert!(timeline[0].is_free());
    assert_eq!(timeline[0].range, TimeRange::new(8 * 60, 17 * 60));
}

#[test]
fn exactly_one_current_inside_real_slots() {
    let dataset = sample("dse.json");
    let timeline = normalize(dataset.day(Weekday::Mon), &ScheduleConfig::default());

    for entry in timeline.iter().filter(|entry| !entry.is_free()) {
        for minute in entry.range.start..entry.range.end {
            let current: Vec<_> = timeline
                .iter()
                .filter(|other| other.status(minute) == planner::schedule::SlotStatus::Current)
                .collect();
            assert_eq!(current.len(), 1, "minute {minute}");
            assert_eq!(current[0], entry);
        }
    }
}

#[test]
fn next_up_between_classes() {
    let slots = vec![
        TimeSlot::new("9:00-10:00", Some("A")),
        TimeSlot::new("11:00-12:00", Some("B")),
    ];
    let timeline = normalize(&slots, &ScheduleConfig::default());

    assert_eq!(current_index(&timeline, 10 * 60 + 30), None);
    match next_up(&timeline, 10 * 60 + 30) {
        NextUp::Next(entry) => {
            assert_eq!(entry.range.start, 11 * 60);
            assert_eq!(entry.slot().and_then(|s| s.class_id.as_deref()), Some("B"));
        }
        other => panic!("expected the 11:00 class, got {other:?}"),
    }
}

#[test]
fn implicit_periods_from_sample() {
    let dataset = sample("ge.json");
    let timeline = normalize(dataset.day(Weekday::Wed), &ScheduleConfig::default());

    let ranges: Vec<TimeRange> = timeline.iter().map(|entry| entry.range).collect();
    assert_eq!(
        ranges,
        [
            TimeRange::new(660, 720),
            TimeRange::new(720, 900),
            TimeRange::new(900, 960)
        ]
    );
}
