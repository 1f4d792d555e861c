//! Timestamp formatting for Glacier response bodies.

use chrono::{DateTime, Utc};

/// Format a timestamp the way Glacier renders dates on the wire,
/// e.g. `2012-06-01T12:00:00+0000`.
#[must_use]
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%z").to_string()
}
