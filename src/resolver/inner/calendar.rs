use chrono::{DateTime, NaiveDate, TimeZone, Weekday};

use crate::descriptor::TimeOfDay;
use crate::error::{ScheduleError, ScheduleResult};

/// Hard cap on the month-existence search. Any day in 1..=31 occurs within a
/// year of months, so the cap is never hit for range-checked input.
pub(super) const MONTH_SEARCH_CAP: u32 = 12;

/// Stamp `date` at the given wall-clock time in `now`'s timezone, seconds
/// and sub-seconds zeroed. A DST gap swallowing the requested wall-clock
/// time resolves to the earliest valid interpretation.
pub(super) fn at_time<TZ>(
    now: &DateTime<TZ>,
    date: NaiveDate,
    time: TimeOfDay,
) -> ScheduleResult<DateTime<TZ>>
where
    TZ: TimeZone,
{
    let naive = date
        .and_hms_opt(time.hour(), time.minute(), 0)
        .ok_or_else(|| ScheduleError::Range(format!("no wall-clock time {time} on {date}")))?;
    now.timezone()
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| {
            ScheduleError::Calendar(format!("{naive} does not exist in this timezone"))
        })
}

/// The calendar day after `date`.
pub(super) fn day_after(date: NaiveDate) -> ScheduleResult<NaiveDate> {
    date.succ_opt()
        .ok_or_else(|| ScheduleError::Calendar(format!("no day after {date}")))
}

/// Days until the next occurrence of `target`, counting from `today`'s
/// weekday. Zero means the target weekday is today; callers decide whether
/// "today" still counts.
pub(super) fn days_until_weekday(today: Weekday, target: Weekday) -> i64 {
    let today = i64::from(today.num_days_from_monday());
    let target = i64::from(target.num_days_from_monday());
    (target - today).rem_euclid(7)
}

/// Find the first month at or after (`year`, `month`) that contains `day`,
/// as an explicit bounded loop. February skips day 30, April skips day 31,
/// and so on.
pub(super) fn first_month_with_day(
    mut year: i32,
    mut month: u32,
    day: u32,
) -> ScheduleResult<NaiveDate> {
    for _ in 0..MONTH_SEARCH_CAP {
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return Ok(date);
        }
        (year, month) = next_month(year, month);
    }
    Err(ScheduleError::Calendar(format!(
        "no month within a year contains day {day}"
    )))
}

/// The (year, month) pair following the given one, wrapping the year after
/// December.
pub(super) fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// Day 1 of the month following (`year`, `month`).
pub(super) fn first_of_next_month(year: i32, month: u32) -> ScheduleResult<NaiveDate> {
    let (year, month) = next_month(year, month);
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| ScheduleError::Calendar(format!("month {month} of {year} out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_distance_is_modulo_seven() {
        assert_eq!(days_until_weekday(Weekday::Wed, Weekday::Wed), 0);
        assert_eq!(days_until_weekday(Weekday::Wed, Weekday::Thu), 1);
        assert_eq!(days_until_weekday(Weekday::Wed, Weekday::Tue), 6);
        assert_eq!(days_until_weekday(Weekday::Sun, Weekday::Mon), 1);
        assert_eq!(days_until_weekday(Weekday::Mon, Weekday::Sun), 6);
    }

    #[test]
    fn month_search_skips_months_missing_the_day() {
        // April has 30 days, so day 31 lands in May.
        let found = first_month_with_day(2025, 4, 31).unwrap();
        assert_eq!(found, NaiveDate::from_ymd_opt(2025, 5, 31).unwrap());

        // Day 30 from February lands in March.
        let found = first_month_with_day(2025, 2, 30).unwrap();
        assert_eq!(found, NaiveDate::from_ymd_opt(2025, 3, 30).unwrap());

        // A month that already contains the day is returned as-is.
        let found = first_month_with_day(2025, 1, 31).unwrap();
        assert_eq!(found, NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());
    }

    #[test]
    fn month_search_wraps_the_year() {
        let found = first_month_with_day(2025, 12, 30).unwrap();
        assert_eq!(found, NaiveDate::from_ymd_opt(2025, 12, 30).unwrap());

        // Feb 29 of a non-leap year rolls into March.
        let found = first_month_with_day(2026, 2, 29).unwrap();
        assert_eq!(found, NaiveDate::from_ymd_opt(2026, 3, 29).unwrap());
    }

    #[test]
    fn first_of_next_month_wraps_december() {
        assert_eq!(
            first_of_next_month(2025, 12).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
        );
        assert_eq!(
            first_of_next_month(2025, 4).unwrap(),
            NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()
        );
    }
}
