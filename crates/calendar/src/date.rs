//! Date parsing for calendar sources.
//!
//! Upstream date fields come in several shapes. Anything not listed below is
//! unparseable and the record is left off the calendar.

use chrono::NaiveDateTime;
use stockroom_core::lenient::parse_timestamp;

/// Parse a source date into a naive timestamp.
///
/// Accepted: RFC 3339 (offset applied, converted to UTC), `YYYY-MM-DDTHH:MM:SS`,
/// `YYYY-MM-DD HH:MM:SS` (both with optional fractional seconds, or without
/// seconds) and plain `YYYY-MM-DD` (midnight). Entity timestamps go through
/// the same parser, so a date the calendar accepts also survives a list decode.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    parse_timestamp(raw)
}

/// First date field (in priority order) that parses.
pub fn first_date<'a, I>(candidates: I) -> Option<NaiveDateTime>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    candidates.into_iter().flatten().find_map(parse_date)
}
