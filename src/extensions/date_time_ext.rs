use chrono::{DateTime, TimeZone};
use std::time::Duration;

/// Age used for timestamps that lie in the future, making them maximally stale.
pub const STALE_AGE: Duration = Duration::from_millis(999_999_999);

pub trait Age {
    /// Returns how long ago `self` happened relative to `now`, or [`STALE_AGE`] if `self` lies
    /// after `now`.
    fn age_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Duration;
}

impl<Tz1: TimeZone> Age for DateTime<Tz1> {
    fn age_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Duration {
        now.clone().signed_duration_since(self.clone()).to_std().unwrap_or(STALE_AGE)
    }
}
