use chrono::{DateTime, Datelike, Duration, TimeZone};

use super::calendar;
use crate::descriptor::{self, ScheduleDescriptor, TimeOfDay};
use crate::error::{ScheduleError, ScheduleResult};

/// Daily at a given time, rolling one day forward once today's occurrence
/// has passed. Without a time, a plain 24-hour step.
pub(super) fn daily<TZ>(
    descriptor: &ScheduleDescriptor,
    now: &DateTime<TZ>,
) -> ScheduleResult<DateTime<TZ>>
where
    TZ: TimeZone,
{
    let Some(time) = descriptor.time_of_day else {
        return Ok(now.clone() + Duration::days(1));
    };
    let today = calendar::at_time(now, now.date_naive(), time)?;
    if today > *now {
        return Ok(today);
    }
    let tomorrow = calendar::day_after(now.date_naive())?;
    calendar::at_time(now, tomorrow, time)
}

/// Weekly on a given weekday. Days-ahead is modulo-7 with zero treated as a
/// full week, except that a still-ahead time-of-day lets today's occurrence
/// fire. Without a weekday, a plain 7-day step.
pub(super) fn weekly<TZ>(
    descriptor: &ScheduleDescriptor,
    now: &DateTime<TZ>,
) -> ScheduleResult<DateTime<TZ>>
where
    TZ: TimeZone,
{
    let Some(target) = descriptor.day_of_week else {
        return Ok(now.clone() + Duration::weeks(1));
    };
    let mut ahead = calendar::days_until_weekday(now.weekday(), target);
    match descriptor.time_of_day {
        Some(time) => {
            if ahead == 0 {
                let today = calendar::at_time(now, now.date_naive(), time)?;
                if today > *now {
                    return Ok(today);
                }
                ahead = 7;
            }
            calendar::at_time(now, now.date_naive() + Duration::days(ahead), time)
        }
        None => {
            if ahead == 0 {
                ahead = 7;
            }
            Ok(now.clone() + Duration::days(ahead))
        }
    }
}

/// Monthly on a given day-of-month, searching forward for the first month
/// that actually contains that day (day 31 skips April, day 30 skips
/// February, and so on). Without a day, the 1st of next month.
pub(super) fn monthly<TZ>(
    descriptor: &ScheduleDescriptor,
    now: &DateTime<TZ>,
) -> ScheduleResult<DateTime<TZ>>
where
    TZ: TimeZone,
{
    let time = descriptor.time_of_day.unwrap_or(TimeOfDay::MIDNIGHT);
    let Some(day) = descriptor.day_of_month else {
        let first = calendar::first_of_next_month(now.year(), now.month())?;
        return calendar::at_time(now, first, time);
    };
    descriptor::check_day_of_month(day)?;

    let date = calendar::first_month_with_day(now.year(), now.month(), day)?;
    let candidate = calendar::at_time(now, date, time)?;
    if candidate > *now {
        return Ok(candidate);
    }
    // this month's occurrence has passed; restart the search one month on
    let (year, month) = calendar::next_month(date.year(), date.month());
    let date = calendar::first_month_with_day(year, month, day)?;
    calendar::at_time(now, date, time)
}

/// Yearly on a given (month, day). The pair must exist in the target year;
/// composing Feb 30, or Feb 29 in a non-leap year, is a hard error rather
/// than a silent roll-forward. Without month and day, the same instant one
/// year on.
pub(super) fn yearly<TZ>(
    descriptor: &ScheduleDescriptor,
    now: &DateTime<TZ>,
) -> ScheduleResult<DateTime<TZ>>
where
    TZ: TimeZone,
{
    let (month, day) = match (descriptor.month, descriptor.day_of_month) {
        (Some(month), Some(day)) => (month, day),
        _ => {
            let next_year = now.year() + 1;
            return now.with_year(next_year).ok_or_else(|| {
                ScheduleError::Calendar(format!(
                    "{}.{} does not exist in {next_year}",
                    now.day(),
                    now.month()
                ))
            });
        }
    };
    let time = descriptor.time_of_day.unwrap_or(TimeOfDay::MIDNIGHT);
    let date = descriptor::compose_date(now.year(), month, day)?;
    let candidate = calendar::at_time(now, date, time)?;
    if candidate > *now {
        return Ok(candidate);
    }
    let date = descriptor::compose_date(now.year() + 1, month, day)?;
    calendar::at_time(now, date, time)
}

/// "every N units": a recurring fixed offset.
pub(super) fn interval<TZ>(
    descriptor: &ScheduleDescriptor,
    now: &DateTime<TZ>,
) -> ScheduleResult<DateTime<TZ>>
where
    TZ: TimeZone,
{
    super::step_by_offset(descriptor, now, "interval")
}

pub(super) fn hourly<TZ>(now: &DateTime<TZ>) -> ScheduleResult<DateTime<TZ>>
where
    TZ: TimeZone,
{
    Ok(now.clone() + Duration::hours(1))
}

pub(super) fn minutely<TZ>(now: &DateTime<TZ>) -> ScheduleResult<DateTime<TZ>>
where
    TZ: TimeZone,
{
    Ok(now.clone() + Duration::minutes(1))
}
