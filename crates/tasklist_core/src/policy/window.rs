use chrono::{DateTime, Duration, SecondsFormat, Utc};

/// Inclusive upper date bound for a remote list query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowBound(DateTime<Utc>);

impl WindowBound {
    pub fn instant(self) -> DateTime<Utc> {
        self.0
    }

    /// RFC 3339 form with a `Z` suffix, used as the `date` query parameter.
    pub fn as_query_value(self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

/// Resolves the list bound `days_ahead` days after `now`.
pub fn window_bound(days_ahead: u32, now: DateTime<Utc>) -> WindowBound {
    WindowBound(now + Duration::days(i64::from(days_ahead)))
}
