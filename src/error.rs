/// Error type returned by descriptor parsing and schedule resolution.
///
/// Every variant means the descriptor itself is malformed; nothing here is
/// transient, so nothing is ever retried. The reason string is meant to be
/// shown to the task creator verbatim.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// A date, time or schedule string that matches no accepted shape, or a
    /// descriptor missing a field its kind requires.
    #[error("invalid format: {0}")]
    Format(String),
    /// A numeric field outside its valid bounds (day-of-month, month, hour,
    /// minute, unit count).
    #[error("value out of range: {0}")]
    Range(String),
    /// A well-ranged (month, day) pair that names no real calendar date,
    /// e.g. February 30th.
    #[error("no such calendar date: {0}")]
    Calendar(String),
    /// A one-time schedule whose target instant is not strictly after the
    /// reference instant.
    #[error("instant already passed: {0}")]
    Temporal(String),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
