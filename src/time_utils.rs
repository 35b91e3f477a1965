// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.
//!
//! Stored timestamps use a fixed-width RFC3339 form so that string
//! comparison in Firestore queries matches chronological order.

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

/// Last value handed out by [`now_rfc3339`], in nanoseconds since the epoch.
static LAST_STAMP_NANOS: AtomicI64 = AtomicI64::new(0);

/// Format a UTC timestamp as RFC3339 with nanoseconds and a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Current time in stored-timestamp form.
///
/// Strictly increasing within the process, so records written back to back
/// keep their order even when the clock has not advanced.
pub fn now_rfc3339() -> String {
    let wall = Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX);

    let previous = LAST_STAMP_NANOS
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(wall.max(last.saturating_add(1)))
        })
        .unwrap_or_else(|last| last);
    let stamp = wall.max(previous.saturating_add(1));

    format_utc_rfc3339(Utc.timestamp_nanos(stamp))
}
