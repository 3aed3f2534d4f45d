use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ScheduleError, ScheduleResult};

/// The closed set of supported schedule kinds.
///
/// An unrecognized schedule string is rejected at parse time with
/// [`ScheduleError::Format`]; there is deliberately no catch-all variant, so
/// a configuration bug surfaces at task creation instead of silently turning
/// into a daily schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScheduleKind {
    /// "in 30 minutes": fires once after a fixed offset.
    RelativeOffset,
    /// "today" at a given time: fires once, must still be ahead.
    TodayAt,
    /// "tomorrow" at a given time: fires once.
    TomorrowAt,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    /// A specific calendar date: fires once.
    OnDate,
    /// "every 3 weeks": a recurring fixed offset.
    Interval,
    Hourly,
    Minutely,
}

impl ScheduleKind {
    /// One-time kinds fire exactly once and are not re-armed after firing.
    pub fn is_one_time(self) -> bool {
        matches!(
            self,
            Self::RelativeOffset | Self::TodayAt | Self::TomorrowAt | Self::OnDate
        )
    }
}

/// Unit of measure for relative-offset and interval schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
}

impl TimeUnit {
    pub fn duration(self, count: u32) -> Duration {
        let count = i64::from(count);
        match self {
            Self::Seconds => Duration::seconds(count),
            Self::Minutes => Duration::minutes(count),
            Self::Hours => Duration::hours(count),
            Self::Days => Duration::days(count),
            Self::Weeks => Duration::weeks(count),
        }
    }
}

impl FromStr for TimeUnit {
    type Err = ScheduleError;

    fn from_str(s: &str) -> ScheduleResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "second" | "seconds" => Ok(Self::Seconds),
            "minute" | "minutes" => Ok(Self::Minutes),
            "hour" | "hours" => Ok(Self::Hours),
            "day" | "days" => Ok(Self::Days),
            "week" | "weeks" => Ok(Self::Weeks),
            other => Err(ScheduleError::Format(format!(
                "unknown time unit: {other:?}"
            ))),
        }
    }
}

/// A validated wall-clock (hour, minute) pair. Seconds are always zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOfDay {
    hour: u32,
    minute: u32,
}

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay { hour: 0, minute: 0 };

    pub fn new(hour: u32, minute: u32) -> ScheduleResult<Self> {
        if hour > 23 {
            return Err(ScheduleError::Range(format!("hour {hour} outside 0..=23")));
        }
        if minute > 59 {
            return Err(ScheduleError::Range(format!(
                "minute {minute} outside 0..=59"
            )));
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(self) -> u32 {
        self.hour
    }

    pub fn minute(self) -> u32 {
        self.minute
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TimeOfDay {
    type Err = ScheduleError;

    /// Accepts exactly `HH:MM`, 24-hour, colon-separated.
    fn from_str(s: &str) -> ScheduleResult<Self> {
        let (hour, minute) = s.trim().split_once(':').ok_or_else(|| {
            ScheduleError::Format(format!("time must be HH:MM, got {s:?}"))
        })?;
        Self::new(parse_number(hour, "hour")?, parse_number(minute, "minute")?)
    }
}

/// Parse a calendar date in either accepted form: `DD.MM.YYYY`
/// (dot-separated) or `YYYY-MM-DD` (hyphen-separated). Any other shape is a
/// format error; both forms produce the same `NaiveDate`.
pub fn parse_date(s: &str) -> ScheduleResult<NaiveDate> {
    let s = s.trim();
    let (year, month, day) = if let Some([d, m, y]) = split_three(s, '.') {
        (
            parse_year(y)?,
            parse_number(m, "month")?,
            parse_number(d, "day")?,
        )
    } else if let Some([y, m, d]) = split_three(s, '-') {
        (
            parse_year(y)?,
            parse_number(m, "month")?,
            parse_number(d, "day")?,
        )
    } else {
        return Err(ScheduleError::Format(format!(
            "date must be DD.MM.YYYY or YYYY-MM-DD, got {s:?}"
        )));
    };
    compose_date(year, month, day)
}

/// Range-check month and day, then compose them into a date. Distinguishes
/// out-of-range numbers from well-ranged pairs that name no real date.
pub(crate) fn compose_date(year: i32, month: u32, day: u32) -> ScheduleResult<NaiveDate> {
    check_month(month)?;
    check_day_of_month(day)?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        ScheduleError::Calendar(format!("{day:02}.{month:02}.{year} does not exist"))
    })
}

pub(crate) fn check_month(month: u32) -> ScheduleResult<()> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(ScheduleError::Range(format!("month {month} outside 1..=12")))
    }
}

pub(crate) fn check_day_of_month(day: u32) -> ScheduleResult<()> {
    if (1..=31).contains(&day) {
        Ok(())
    } else {
        Err(ScheduleError::Range(format!(
            "day of month {day} outside 1..=31"
        )))
    }
}

fn parse_number(s: &str, what: &str) -> ScheduleResult<u32> {
    s.trim()
        .parse()
        .map_err(|_| ScheduleError::Format(format!("{what} is not a number: {s:?}")))
}

fn parse_year(s: &str) -> ScheduleResult<i32> {
    s.trim()
        .parse()
        .map_err(|_| ScheduleError::Format(format!("year is not a number: {s:?}")))
}

fn split_three(s: &str, sep: char) -> Option<[&str; 3]> {
    let mut parts = s.split(sep);
    let a = parts.next()?;
    let b = parts.next()?;
    let c = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some([a, b, c])
}

/// The structured recurrence specification supplied by a task creator.
///
/// Only the fields relevant to `kind` are consulted during resolution; the
/// others are ignored, never misapplied. Serializes to the structured payload
/// the task record carries alongside its human-readable form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDescriptor {
    pub kind: ScheduleKind,
    /// Magnitude for relative-offset / interval kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<TimeUnit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<TimeOfDay>,
    /// For weekly schedules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<Weekday>,
    /// For monthly and yearly schedules, 1..=31.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_month: Option<u32>,
    /// For yearly schedules, 1..=12.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    /// For on-date schedules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specific_date: Option<NaiveDate>,
}

impl ScheduleDescriptor {
    pub fn new(kind: ScheduleKind) -> Self {
        Self {
            kind,
            unit_count: None,
            unit: None,
            time_of_day: None,
            day_of_week: None,
            day_of_month: None,
            month: None,
            specific_date: None,
        }
    }

    /// Build a descriptor from the task creator's schedule string and
    /// optional `HH:MM` time string.
    ///
    /// Accepted schedule strings (case-insensitive):
    /// `in N <unit>`, `every N <unit>`, `today`, `tomorrow`, `daily`,
    /// `weekly`, `weekly on <weekday>`, a bare weekday name, `monthly`,
    /// `monthly on D`, `yearly`, `yearly on D.M`, `hourly`, `minutely`,
    /// `on <date>` or a bare date in either accepted format.
    pub fn parse(schedule: &str, time: Option<&str>) -> ScheduleResult<Self> {
        let mut descriptor = Self::from_schedule_str(schedule)?;
        if let Some(time) = time {
            descriptor.time_of_day = Some(time.parse()?);
        }
        if matches!(descriptor.kind, ScheduleKind::TodayAt | ScheduleKind::TomorrowAt)
            && descriptor.time_of_day.is_none()
        {
            return Err(ScheduleError::Format(format!(
                "schedule {schedule:?} requires a time of day"
            )));
        }
        Ok(descriptor)
    }

    fn from_schedule_str(schedule: &str) -> ScheduleResult<Self> {
        let lowered = schedule.trim().to_ascii_lowercase();
        let words: Vec<&str> = lowered.split_whitespace().collect();
        match words.as_slice() {
            ["in", count, unit] => Self::offset_kind(ScheduleKind::RelativeOffset, count, unit),
            ["every", count, unit] => Self::offset_kind(ScheduleKind::Interval, count, unit),
            ["today"] => Ok(Self::new(ScheduleKind::TodayAt)),
            ["tomorrow"] => Ok(Self::new(ScheduleKind::TomorrowAt)),
            ["daily"] => Ok(Self::new(ScheduleKind::Daily)),
            ["weekly"] => Ok(Self::new(ScheduleKind::Weekly)),
            ["monthly"] => Ok(Self::new(ScheduleKind::Monthly)),
            ["yearly"] => Ok(Self::new(ScheduleKind::Yearly)),
            ["hourly"] => Ok(Self::new(ScheduleKind::Hourly)),
            ["minutely"] => Ok(Self::new(ScheduleKind::Minutely)),
            ["weekly", "on", day] => Self::weekly_on(day),
            ["monthly", "on", day] => {
                let day = parse_number(day, "day of month")?;
                check_day_of_month(day)?;
                let mut descriptor = Self::new(ScheduleKind::Monthly);
                descriptor.day_of_month = Some(day);
                Ok(descriptor)
            }
            ["yearly", "on", date] => {
                let (day, month) = date.split_once('.').ok_or_else(|| {
                    ScheduleError::Format(format!("yearly date must be D.M, got {date:?}"))
                })?;
                let day = parse_number(day, "day of month")?;
                let month = parse_number(month, "month")?;
                check_day_of_month(day)?;
                check_month(month)?;
                let mut descriptor = Self::new(ScheduleKind::Yearly);
                descriptor.day_of_month = Some(day);
                descriptor.month = Some(month);
                Ok(descriptor)
            }
            ["on", date] => Self::on_date(date),
            [word] if Weekday::from_str(word).is_ok() => Self::weekly_on(word),
            [word] if word.contains('.') || word.contains('-') => Self::on_date(word),
            _ => {
                warn!("Heron Schedule: unrecognized schedule string {:?}", schedule);
                Err(ScheduleError::Format(format!(
                    "unrecognized schedule: {schedule:?}"
                )))
            }
        }
    }

    fn offset_kind(kind: ScheduleKind, count: &str, unit: &str) -> ScheduleResult<Self> {
        let mut descriptor = Self::new(kind);
        descriptor.unit_count = Some(parse_number(count, "count")?);
        descriptor.unit = Some(unit.parse()?);
        Ok(descriptor)
    }

    fn weekly_on(day: &str) -> ScheduleResult<Self> {
        let weekday = Weekday::from_str(day)
            .map_err(|_| ScheduleError::Format(format!("unknown weekday: {day:?}")))?;
        let mut descriptor = Self::new(ScheduleKind::Weekly);
        descriptor.day_of_week = Some(weekday);
        Ok(descriptor)
    }

    fn on_date(date: &str) -> ScheduleResult<Self> {
        let mut descriptor = Self::new(ScheduleKind::OnDate);
        descriptor.specific_date = Some(parse_date(date)?);
        Ok(descriptor)
    }
}
