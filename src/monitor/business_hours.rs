use chrono::{Datelike, NaiveDateTime, NaiveTime, Timelike, Weekday};

use crate::config::{BusinessHours, ConfigError, WeekDay};

impl WeekDay {
    /// Monday is 0, Sunday is 6.
    pub fn ordinal(self) -> u32 {
        self as u32
    }
}

impl From<WeekDay> for Weekday {
    fn from(day: WeekDay) -> Self {
        match day {
            WeekDay::Monday => Weekday::Mon,
            WeekDay::Tuesday => Weekday::Tue,
            WeekDay::Wednesday => Weekday::Wed,
            WeekDay::Thursday => Weekday::Thu,
            WeekDay::Friday => Weekday::Fri,
            WeekDay::Saturday => Weekday::Sat,
            WeekDay::Sunday => Weekday::Sun,
        }
    }
}

/// Weekly sampling window. `None` bounds mean the gate is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessWindow {
    bounds: Option<WindowBounds>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WindowBounds {
    week_start: WeekDay,
    week_end: WeekDay,
    start_time: NaiveTime,
    end_time: NaiveTime,
}

impl BusinessWindow {
    pub fn from_config(config: &BusinessHours) -> Result<Self, ConfigError> {
        if !config.enabled {
            return Ok(Self::always_open());
        }

        Ok(Self {
            bounds: Some(WindowBounds {
                week_start: config.week_start,
                week_end: config.week_end,
                start_time: config.start_time()?,
                end_time: config.end_time()?,
            }),
        })
    }

    pub fn always_open() -> Self {
        Self { bounds: None }
    }

    pub fn is_open(&self, now: NaiveDateTime) -> bool {
        match self.bounds {
            None => true,
            Some(bounds) => within_window(
                now,
                bounds.week_start,
                bounds.week_end,
                bounds.start_time,
                bounds.end_time,
            ),
        }
    }

    /// Day-only check used by the daily report, which runs after hours.
    pub fn is_business_day(&self, now: NaiveDateTime) -> bool {
        match self.bounds {
            None => true,
            Some(bounds) => is_business_day(now, bounds.week_start, bounds.week_end),
        }
    }
}

pub fn is_business_day(now: NaiveDateTime, week_start: WeekDay, week_end: WeekDay) -> bool {
    let today = now.weekday().num_days_from_monday();
    (week_start.ordinal()..=week_end.ordinal()).contains(&today)
}

/// Inclusive on both ends; the time of day is truncated to the minute.
pub fn within_window(
    now: NaiveDateTime,
    week_start: WeekDay,
    week_end: WeekDay,
    start_time: NaiveTime,
    end_time: NaiveTime,
) -> bool {
    if !is_business_day(now, week_start, week_end) {
        return false;
    }

    let Some(minute) = NaiveTime::from_hms_opt(now.hour(), now.minute(), 0) else {
        return false;
    };
    start_time <= minute && minute <= end_time
}
