mod calendar;
mod one_time;
mod recurring;

use chrono::{DateTime, Duration, TimeZone};

use crate::descriptor::{ScheduleDescriptor, ScheduleKind};
use crate::error::{ScheduleError, ScheduleResult};

/// Dispatch over the closed kind set. Each arm owns its own computation rule
/// so the kinds stay testable in isolation and no field leaks across kinds.
pub(super) fn next_run<TZ>(
    descriptor: &ScheduleDescriptor,
    now: &DateTime<TZ>,
) -> ScheduleResult<DateTime<TZ>>
where
    TZ: TimeZone,
{
    match descriptor.kind {
        ScheduleKind::RelativeOffset => one_time::relative_offset(descriptor, now),
        ScheduleKind::TodayAt => one_time::today_at(descriptor, now),
        ScheduleKind::TomorrowAt => one_time::tomorrow_at(descriptor, now),
        ScheduleKind::OnDate => one_time::on_date(descriptor, now),
        ScheduleKind::Daily => recurring::daily(descriptor, now),
        ScheduleKind::Weekly => recurring::weekly(descriptor, now),
        ScheduleKind::Monthly => recurring::monthly(descriptor, now),
        ScheduleKind::Yearly => recurring::yearly(descriptor, now),
        ScheduleKind::Interval => recurring::interval(descriptor, now),
        ScheduleKind::Hourly => recurring::hourly(now),
        ScheduleKind::Minutely => recurring::minutely(now),
    }
}

/// Shared by relative-offset and interval: both need a unit and a strictly
/// positive count, and the resulting instant must stay inside chrono's
/// representable range. The parser accepts any u32 count, so the sum can
/// overflow; that is a range error, not a panic.
fn step_by_offset<TZ>(
    descriptor: &ScheduleDescriptor,
    now: &DateTime<TZ>,
    kind: &str,
) -> ScheduleResult<DateTime<TZ>>
where
    TZ: TimeZone,
{
    let duration = offset_duration(descriptor, kind)?;
    now.clone().checked_add_signed(duration).ok_or_else(|| {
        ScheduleError::Range(format!(
            "{kind} offset lands outside the representable time range"
        ))
    })
}

fn offset_duration(descriptor: &ScheduleDescriptor, kind: &str) -> ScheduleResult<Duration> {
    let count = descriptor
        .unit_count
        .ok_or_else(|| ScheduleError::Format(format!("{kind} schedule needs a unit count")))?;
    let unit = descriptor
        .unit
        .ok_or_else(|| ScheduleError::Format(format!("{kind} schedule needs a unit")))?;
    if count == 0 {
        return Err(ScheduleError::Range(format!(
            "{kind} count must be at least 1"
        )));
    }
    Ok(unit.duration(count))
}
