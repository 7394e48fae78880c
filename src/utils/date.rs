// ABOUTME: Date formatting helpers for backend ISO-8601 timestamps
// ABOUTME: Renders due dates and submission times in a short US-English form
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const DISPLAY_FORMAT: &str = "%b %-d, %Y, %I:%M %p";

/// Placeholder for a missing timestamp
pub const MISSING_DATE: &str = "N/A";

/// Format an ISO-8601 timestamp as `Jun 15, 2025, 11:59 PM`
///
/// Timestamps with an offset are shown in UTC; naive timestamps are shown as
/// written. Missing or empty input yields `N/A`, unparsable input is returned
/// unchanged.
#[must_use]
pub fn format_date(iso: Option<&str>) -> String {
    let Some(raw) = iso.map(str::trim).filter(|s| !s.is_empty()) else {
        return MISSING_DATE.to_owned();
    };

    parse_timestamp(raw).map_or_else(
        || raw.to_owned(),
        |ts| ts.format(DISPLAY_FORMAT).to_string(),
    )
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Some(with_offset.with_timezone(&Utc).naive_utc());
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
