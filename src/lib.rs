//! Deterministic schedule resolution for one-time and recurring tasks.
//!
//! Given a [`descriptor::ScheduleDescriptor`] ("daily at 09:00", "every 3
//! weeks", "on 25.12.2025", "in 30 minutes") and a reference instant,
//! [`resolver::resolve`] computes the next execution instant and whether the
//! schedule fires once or recurs. Calendar irregularities are handled
//! explicitly: month-end clamping searches forward for a month that contains
//! the requested day, leap-day schedules fail loudly outside leap years, and
//! a one-time target that has already passed is an error rather than a
//! silent roll-forward.
//!
//! The resolver is a pure function over its two inputs: no clock reads, no
//! I/O, no shared state. Storing the task record and re-arming recurring
//! tasks after they fire are the caller's concerns; re-arming is just
//! calling [`resolver::resolve`] again with the previous `next_run` as the
//! new reference instant.

pub mod descriptor;
pub mod error;
pub mod resolver;

pub use descriptor::{ScheduleDescriptor, ScheduleKind, TimeOfDay, TimeUnit};
pub use error::{ScheduleError, ScheduleResult};
pub use resolver::{resolve, Resolution};
