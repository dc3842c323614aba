use chrono::{DateTime, SubsecRound, Utc};

/// Source of wall-clock time for stamping command records.
///
/// Injected into [`CommandQueue`](crate::CommandQueue) so tests can pin the
/// timestamp instead of racing the system clock.
pub trait Clock: Send + Sync + 'static {
    /// Current UTC time. Sub-second precision is allowed; the queue truncates.
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system UTC time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Truncate to whole seconds, dropping the fractional part.
pub(crate) fn whole_seconds(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.trunc_subsecs(0)
}
