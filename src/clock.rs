use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, Timelike, Weekday};

/// Source of the reference time used to classify slots.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;

    fn minutes_of_day(&self) -> u32 {
        let time = self.now().time();
        time.hour() * 60 + time.minute()
    }

    fn today(&self) -> NaiveDate {
        self.now().date()
    }

    fn weekday(&self) -> Weekday {
        self.now().weekday()
    }
}

/// Host wall clock, local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_reports_minute_of_day() {
        let now = NaiveDate::from_ymd_opt(2025, 9, 3)
            .and_then(|date| date.and_hms_opt(10, 30, 59))
            .unwrap();
        let clock = FixedClock(now);

        assert_eq!(clock.minutes_of_day(), 630);
        assert_eq!(clock.weekday(), Weekday::Wed);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 9, 3).unwrap());
    }
}
