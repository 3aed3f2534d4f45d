mod inner;

use chrono::{DateTime, TimeZone};
use serde::Serialize;
use tracing::debug;

use crate::descriptor::ScheduleDescriptor;
use crate::error::ScheduleResult;

/// The outcome of resolving a descriptor against a reference instant.
///
/// `next_run` is strictly after the reference instant and carries the same
/// timezone. `is_one_time` tells the caller whether to re-arm the task after
/// it fires: one-time tasks are deactivated instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(bound(serialize = ""))]
pub struct Resolution<TZ: TimeZone> {
    pub next_run: DateTime<TZ>,
    pub is_one_time: bool,
}

/// Resolve `descriptor` against the reference instant `now`.
///
/// Purely computational: no clock reads, no I/O, no shared state, so calling
/// it twice with the same inputs gives the same output and it is safe from
/// any number of threads. All arithmetic happens in `now`'s timezone, and the
/// result carries that timezone; this is the crate's single timezone policy.
///
/// After a recurring task fires, call this again with the previous
/// `next_run` as the new reference instant to re-arm it.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use heron_schedule::descriptor::ScheduleDescriptor;
/// use heron_schedule::resolver;
///
/// let descriptor = ScheduleDescriptor::parse("daily", Some("09:00")).unwrap();
/// let now = Utc.with_ymd_and_hms(2025, 12, 24, 10, 0, 0).unwrap();
///
/// let resolution = resolver::resolve(&descriptor, &now).unwrap();
/// // 09:00 has already passed today, so the next run is tomorrow morning
/// assert_eq!(
///     resolution.next_run,
///     Utc.with_ymd_and_hms(2025, 12, 25, 9, 0, 0).unwrap()
/// );
/// assert!(!resolution.is_one_time);
/// ```
pub fn resolve<TZ>(
    descriptor: &ScheduleDescriptor,
    now: &DateTime<TZ>,
) -> ScheduleResult<Resolution<TZ>>
where
    TZ: TimeZone,
{
    debug!(kind = ?descriptor.kind, "Heron Schedule: resolving descriptor");
    let next_run = inner::next_run(descriptor, now)?;
    Ok(Resolution {
        next_run,
        is_one_time: descriptor.kind.is_one_time(),
    })
}
