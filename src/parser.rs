use chrono::{NaiveTime, Timelike};
use thiserror::Error;

use crate::settings::TimeFormat;

pub type Result<T> = std::result::Result<T, ParseError>;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at column {column}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub column: usize,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, column: usize) -> Self {
        Self { kind, column }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("expected one of {expected:?}, found {found:?}")]
    ExpectedChars { expected: Vec<char>, found: char },
    #[error("expected a number")]
    ExpectedNumber,
    #[error("unexpected end of label")]
    UnexpectedEof,
    #[error("unexpected trailing {0:?}")]
    TrailingInput(char),
    #[error("{hour}:{minute:02} is not a time of day")]
    InvalidTime { hour: u32, minute: u32 },
    #[error("range ends before it starts")]
    EndBeforeStart,
}

/// Half-open `[start, end)` span in minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeRange {
    pub start: u32,
    pub end: u32,
}

impl TimeRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, minute: u32) -> bool {
        self.start <= minute && minute < self.end
    }

    pub fn duration(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Canonical `H:MM-H:MM` label that parses back to the same range.
    pub fn label(&self) -> String {
        format!("{}-{}", format_minutes(self.start), format_minutes(self.end))
    }

    pub fn display(&self, format: TimeFormat) -> String {
        format!(
            "{} - {}",
            format_clock(self.start, format),
            format_clock(self.end, format)
        )
    }
}

/// Parses a slot label such as `9:00-10:30` or `13:00` without ever failing.
///
/// Missing or garbled hour and minute components become 0, and a label
/// without an end gets `period_minutes` added to its start. Out-of-range
/// components are pulled back into the day.
pub fn parse_range_lenient(label: &str, period_minutes: u32) -> TimeRange {
    let (start_part, end_part) = match label.split_once('-') {
        Some((start, end)) => (start, Some(end)),
        None => (label, None),
    };

    let start = to_minutes(start_part);
    let end = match end_part {
        Some(end) if !end.trim().is_empty() => to_minutes(end),
        _ => start.saturating_add(period_minutes).min(MINUTES_PER_DAY),
    };

    TimeRange { start, end }
}

/// Parses a slot label, reporting the first malformed component.
pub fn parse_range(label: &str, period_minutes: u32) -> Result<TimeRange> {
    Parser::new(label).parse_range(period_minutes)
}

/// Minute of day for an `H:MM` fragment, coercing what it cannot read to 0
/// and capping at the last minute of the day.
pub fn to_minutes(time: &str) -> u32 {
    let (hours, minutes) = match time.split_once(':') {
        Some((hours, minutes)) => (hours, Some(minutes)),
        None => (time, None),
    };

    let hours = leading_number(hours).unwrap_or(0);
    let minutes = minutes.and_then(leading_number).unwrap_or(0);

    hours
        .saturating_mul(60)
        .saturating_add(minutes)
        .min(MINUTES_PER_DAY - 1)
}

/// The literal start portion of a slot label, e.g. `9:00` for `9:00-10:00`.
pub fn start_label(label: &str) -> &str {
    label.split('-').next().unwrap_or(label).trim()
}

pub fn format_minutes(minutes: u32) -> String {
    format!("{}:{:02}", minutes / 60, minutes % 60)
}

pub fn format_clock(minutes: u32, format: TimeFormat) -> String {
    match format {
        TimeFormat::TwentyFourHour => format_minutes(minutes),
        TimeFormat::TwelveHour => {
            let hour = (minutes / 60) % 24;
            let hour12 = (hour + 11) % 12 + 1;
            let suffix = if hour < 12 { "AM" } else { "PM" };
            format!("{}:{:02} {}", hour12, minutes % 60, suffix)
        }
    }
}

fn leading_number(s: &str) -> Option<u32> {
    let s = s.trim();
    let end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(s.len(), |(i, _)| i);

    s[..end].parse().ok()
}

#[derive(Debug, Clone)]
struct Parser {
    source: Vec<char>,

    start: usize,
    current: usize,

    column: usize,
}

impl Parser {
    fn new(source: &str) -> Self {
        Self {
            source: source.chars().collect(),
            start: 0,
            current: 0,
            column: 1,
        }
    }

    fn parse_range(&mut self, period_minutes: u32) -> Result<TimeRange> {
        self.skip_space();
        let start = self.parse_time()?;
        self.skip_space();

        let end = if self.peek() == Some('-') {
            self.advance();
            self.skip_space();
            let end = self.parse_time()?;
            if end < start {
                return Err(self.make_error(ParseErrorKind::EndBeforeStart));
            }
            end
        } else {
            start.saturating_add(period_minutes)
        };

        self.skip_space();
        if let Some(c) = self.peek() {
            return Err(self.make_error(ParseErrorKind::TrailingInput(c)));
        }

        Ok(TimeRange { start, end })
    }

    fn parse_time(&mut self) -> Result<u32> {
        let hour = self.extract_num()?;
        self.expect_char(':')?;
        self.clear();
        let minute = self.extract_num()?;

        let Some(time) = NaiveTime::from_hms_opt(hour, minute, 0) else {
            return Err(self.make_error(ParseErrorKind::InvalidTime { hour, minute }));
        };

        Ok(time.num_seconds_from_midnight() / 60)
    }

    #[must_use]
    fn make_error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, self.column)
    }

    fn extract_num(&mut self) -> Result<u32> {
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }

        let digits = self.collect();
        if digits.is_empty() {
            let kind = match self.peek() {
                Some(_) => ParseErrorKind::ExpectedNumber,
                None => ParseErrorKind::UnexpectedEof,
            };
            return Err(self.make_error(kind));
        }

        digits
            .parse()
            .map_err(|_| self.make_error(ParseErrorKind::ExpectedNumber))
    }

    fn expect_char(&mut self, c: char) -> Result<()> {
        match self.peek() {
            Some(found) if found == c => {
                self.advance();
                Ok(())
            }
            Some(found) => Err(self.make_error(ParseErrorKind::ExpectedChars {
                expected: vec![c],
                found,
            })),
            None => Err(self.make_error(ParseErrorKind::UnexpectedEof)),
        }
    }

    fn skip_space(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.advance();
        }

        self.clear();
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.source.get(self.current).cloned();
        if c.is_some() {
            self.current += 1;
            self.column += 1;
        }
        c
    }

    fn peek(&self) -> Option<char> {
        self.source.get(self.current).cloned()
    }

    fn collect(&mut self) -> String {
        let result = self.source[self.start..self.current].iter().collect();
        self.clear();
        result
    }

    fn clear(&mut self) {
        self.start = self.current;
    }
}
