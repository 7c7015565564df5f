//! Process-wide monotonic timestamps.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, SecondsFormat, Utc};

static LAST_MICROS: AtomicI64 = AtomicI64::new(i64::MIN);

/// Current UTC time, clamped so it never precedes a previously issued value.
#[must_use]
pub fn next_timestamp() -> DateTime<Utc> {
    let now = Utc::now();
    let micros = now.timestamp_micros();
    let previous = LAST_MICROS.fetch_max(micros, Ordering::AcqRel);
    DateTime::from_timestamp_micros(previous.max(micros)).unwrap_or(now)
}

/// RFC 3339 with microsecond precision and a `Z` suffix.
#[must_use]
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}
