use chrono::{DateTime, TimeZone, Utc};
use simplecmd::exec::Clock;

/// A clock that always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Default for FixedClock {
    /// 2024-01-02T03:04:05.678Z
    fn default() -> Self {
        let at = Utc
            .with_ymd_and_hms(2024, 1, 2, 3, 4, 5)
            .single()
            .expect("valid fixed timestamp")
            + chrono::Duration::milliseconds(678);
        Self(at)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
