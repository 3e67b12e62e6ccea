//! Working time arithmetic. A shift is described by a date, entry and exit time of day, hours
//! spent on breaks and overtime hours that are added on top.

use chrono::{Duration, NaiveDate, NaiveTime};

const SECONDS_IN_HOUR: f64 = 3600.;

/// Computes the amount of hours worked during a shift.
///
/// If exit is earlier than entry the shift is assumed to end on the next day. Shifts longer than a
/// day can't be expressed this way. Negative break or overtime values are treated as 0, and the
/// result never goes below 0.
pub fn compute_total(
    date: NaiveDate,
    entry_time: NaiveTime,
    exit_time: NaiveTime,
    break_hours: f64,
    extra_hours: f64,
) -> f64 {
    let entry = date.and_time(entry_time);
    let mut exit = date.and_time(exit_time);
    if exit < entry {
        exit += Duration::days(1);
    }

    let elapsed = (exit - entry).num_seconds() as f64 / SECONDS_IN_HOUR;
    (elapsed - non_negative(break_hours) + non_negative(extra_hours)).max(0.)
}

fn non_negative(hours: f64) -> f64 {
    if hours.is_finite() {
        hours.max(0.)
    } else {
        0.
    }
}
