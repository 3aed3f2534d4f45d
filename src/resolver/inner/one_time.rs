use chrono::{DateTime, TimeZone};

use super::calendar;
use crate::descriptor::{ScheduleDescriptor, TimeOfDay};
use crate::error::{ScheduleError, ScheduleResult};

/// "in 30 minutes": a fixed offset from the reference instant. Future by
/// construction, no past-check needed.
pub(super) fn relative_offset<TZ>(
    descriptor: &ScheduleDescriptor,
    now: &DateTime<TZ>,
) -> ScheduleResult<DateTime<TZ>>
where
    TZ: TimeZone,
{
    super::step_by_offset(descriptor, now, "relative-offset")
}

/// "today at HH:MM": fails rather than silently rolling to tomorrow when the
/// requested time has already passed.
pub(super) fn today_at<TZ>(
    descriptor: &ScheduleDescriptor,
    now: &DateTime<TZ>,
) -> ScheduleResult<DateTime<TZ>>
where
    TZ: TimeZone,
{
    let time = require_time(descriptor, "today-at")?;
    let candidate = calendar::at_time(now, now.date_naive(), time)?;
    if candidate <= *now {
        return Err(ScheduleError::Temporal(format!(
            "{time} has already passed today"
        )));
    }
    Ok(candidate)
}

/// "tomorrow at HH:MM": always in the future, no check needed.
pub(super) fn tomorrow_at<TZ>(
    descriptor: &ScheduleDescriptor,
    now: &DateTime<TZ>,
) -> ScheduleResult<DateTime<TZ>>
where
    TZ: TimeZone,
{
    let time = require_time(descriptor, "tomorrow-at")?;
    let tomorrow = calendar::day_after(now.date_naive())?;
    calendar::at_time(now, tomorrow, time)
}

/// A specific calendar date, at the given time or midnight. The target must
/// be strictly after the reference instant.
pub(super) fn on_date<TZ>(
    descriptor: &ScheduleDescriptor,
    now: &DateTime<TZ>,
) -> ScheduleResult<DateTime<TZ>>
where
    TZ: TimeZone,
{
    let date = descriptor.specific_date.ok_or_else(|| {
        ScheduleError::Format("on-date schedule needs a date".to_string())
    })?;
    let time = descriptor.time_of_day.unwrap_or(TimeOfDay::MIDNIGHT);
    let candidate = calendar::at_time(now, date, time)?;
    if candidate <= *now {
        return Err(ScheduleError::Temporal(format!(
            "{date} at {time} is not after the reference instant"
        )));
    }
    Ok(candidate)
}

fn require_time(descriptor: &ScheduleDescriptor, kind: &str) -> ScheduleResult<TimeOfDay> {
    descriptor
        .time_of_day
        .ok_or_else(|| ScheduleError::Format(format!("{kind} schedule needs a time of day")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{parse_date, ScheduleKind, TimeUnit};
    use chrono::{TimeZone, Utc};

    fn wed_morning() -> DateTime<Utc> {
        // Wednesday
        Utc.with_ymd_and_hms(2025, 12, 24, 10, 0, 0).unwrap()
    }

    #[test]
    fn relative_offset_adds_the_given_duration() {
        let mut d = ScheduleDescriptor::new(ScheduleKind::RelativeOffset);
        d.unit_count = Some(30);
        d.unit = Some(TimeUnit::Minutes);
        let now = wed_morning();
        assert_eq!(
            relative_offset(&d, &now).unwrap(),
            Utc.with_ymd_and_hms(2025, 12, 24, 10, 30, 0).unwrap()
        );
    }

    #[test]
    fn relative_offset_rejects_missing_or_zero_fields() {
        let now = wed_morning();
        let d = ScheduleDescriptor::new(ScheduleKind::RelativeOffset);
        assert!(matches!(
            relative_offset(&d, &now),
            Err(ScheduleError::Format(_))
        ));

        let mut d = ScheduleDescriptor::new(ScheduleKind::RelativeOffset);
        d.unit_count = Some(0);
        d.unit = Some(TimeUnit::Hours);
        assert!(matches!(
            relative_offset(&d, &now),
            Err(ScheduleError::Range(_))
        ));
    }

    #[test]
    fn relative_offset_rejects_an_unrepresentable_instant() {
        // the parser accepts any u32 count; an offset of ~76 million years
        // must come back as a range error, not a panic
        let d = ScheduleDescriptor::parse("in 4000000000 weeks", None).unwrap();
        let now = wed_morning();
        assert!(matches!(
            relative_offset(&d, &now),
            Err(ScheduleError::Range(_))
        ));
    }

    #[test]
    fn today_at_a_future_time_fires_today() {
        let mut d = ScheduleDescriptor::new(ScheduleKind::TodayAt);
        d.time_of_day = Some(TimeOfDay::new(15, 30).unwrap());
        let now = wed_morning();
        assert_eq!(
            today_at(&d, &now).unwrap(),
            Utc.with_ymd_and_hms(2025, 12, 24, 15, 30, 0).unwrap()
        );
    }

    #[test]
    fn today_at_an_elapsed_time_fails_instead_of_rolling_forward() {
        let mut d = ScheduleDescriptor::new(ScheduleKind::TodayAt);
        d.time_of_day = Some(TimeOfDay::new(9, 0).unwrap());
        let now = wed_morning();
        assert!(matches!(
            today_at(&d, &now),
            Err(ScheduleError::Temporal(_))
        ));

        // exactly equal is also "already passed"
        d.time_of_day = Some(TimeOfDay::new(10, 0).unwrap());
        assert!(matches!(
            today_at(&d, &now),
            Err(ScheduleError::Temporal(_))
        ));
    }

    #[test]
    fn tomorrow_at_never_fails_on_an_elapsed_time() {
        let mut d = ScheduleDescriptor::new(ScheduleKind::TomorrowAt);
        d.time_of_day = Some(TimeOfDay::new(9, 0).unwrap());
        let now = wed_morning();
        assert_eq!(
            tomorrow_at(&d, &now).unwrap(),
            Utc.with_ymd_and_hms(2025, 12, 25, 9, 0, 0).unwrap()
        );
    }

    #[test]
    fn on_date_accepts_both_formats_identically() {
        let now = wed_morning();
        let time = TimeOfDay::new(8, 0).unwrap();

        let mut dotted = ScheduleDescriptor::new(ScheduleKind::OnDate);
        dotted.specific_date = Some(parse_date("25.12.2025").unwrap());
        dotted.time_of_day = Some(time);

        let mut iso = ScheduleDescriptor::new(ScheduleKind::OnDate);
        iso.specific_date = Some(parse_date("2025-12-25").unwrap());
        iso.time_of_day = Some(time);

        let a = on_date(&dotted, &now).unwrap();
        let b = on_date(&iso, &now).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, Utc.with_ymd_and_hms(2025, 12, 25, 8, 0, 0).unwrap());
    }

    #[test]
    fn on_date_defaults_to_midnight() {
        let now = wed_morning();
        let mut d = ScheduleDescriptor::new(ScheduleKind::OnDate);
        d.specific_date = Some(parse_date("26.12.2025").unwrap());
        assert_eq!(
            on_date(&d, &now).unwrap(),
            Utc.with_ymd_and_hms(2025, 12, 26, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn on_date_in_the_past_fails() {
        let now = wed_morning();
        let mut d = ScheduleDescriptor::new(ScheduleKind::OnDate);
        d.specific_date = Some(parse_date("24.12.2025").unwrap());
        // midnight today is before 10:00 today
        assert!(matches!(on_date(&d, &now), Err(ScheduleError::Temporal(_))));
    }
}
