use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";
pub const TIME_WITH_SECONDS_FORMAT: &str = "%H:%M:%S";

/// Date layouts accepted besides [DATE_FORMAT] when reading stored dates.
const EXTRA_DATE_FORMATS: [&str; 5] = ["%Y/%m/%d", "%Y.%m.%d", "%d %B %Y", "%B %d %Y", "%B %d, %Y"];

/// Date-time layouts whose time part is ignored when reading stored dates.
const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
];

/// This is the standard way of converting a date to a string in worklog.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Times are written as `HH:MM`, seconds are only added when there are any.
pub fn format_time(time: NaiveTime) -> String {
    if time.second() == 0 {
        time.format(TIME_FORMAT).to_string()
    } else {
        time.format(TIME_WITH_SECONDS_FORMAT).to_string()
    }
}

/// Parses a stored date. Besides plain `YYYY-MM-DD` this accepts a few other common layouts and
/// date-time strings, in which case the time part is thrown away.
pub fn parse_date_lenient(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    std::iter::once(DATE_FORMAT)
        .chain(EXTRA_DATE_FORMATS)
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .or_else(|| {
            DATE_TIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
                .map(|v| v.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .map(|v| v.date_naive())
                .ok()
        })
}

/// Parses a time of day written either as `HH:MM` or `HH:MM:SS`. Anything finer than a second
/// can't be stored, so it isn't accepted.
pub fn parse_time_lenient(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(value, TIME_WITH_SECONDS_FORMAT))
        .ok()
}
