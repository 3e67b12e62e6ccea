//! Filtering and aggregation of attendance records.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::storage::entities::{AttendanceLog, AttendanceRecord};

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// The range covering every record in the log. When the log is empty both ends fall on
    /// `today`.
    pub fn spanning(log: &[AttendanceRecord], today: NaiveDate) -> Self {
        let start = log.iter().map(|v| v.date).min().unwrap_or(today);
        let end = log.iter().map(|v| v.date).max().unwrap_or(today);
        Self { start, end }
    }

    /// Fills the bounds that weren't chosen explicitly with [DateRange::spanning].
    pub fn with_defaults(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        log: &[AttendanceRecord],
        today: NaiveDate,
    ) -> Self {
        let spanning = Self::spanning(log, today);
        Self {
            start: start.unwrap_or(spanning.start),
            end: end.unwrap_or(spanning.end),
        }
    }
}

/// Hours worked during a single calendar day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total_hours: f64,
}

/// Returns records with dates inside `range`, keeping their order. A range with `start` after
/// `end` matches nothing.
pub fn filter_range(log: &[AttendanceRecord], range: DateRange) -> AttendanceLog {
    log.iter()
        .filter(|v| range.contains(v.date))
        .cloned()
        .collect()
}

/// Sums hours per day. Days are ordered from the earliest.
pub fn aggregate_daily<'a>(
    records: impl IntoIterator<Item = &'a AttendanceRecord>,
) -> Vec<DailyTotal> {
    let mut days = BTreeMap::<NaiveDate, f64>::new();
    for record in records {
        *days.entry(record.date).or_insert(0.) += record.total_hours;
    }

    days.into_iter()
        .map(|(date, total_hours)| DailyTotal { date, total_hours })
        .collect()
}

pub fn sum_total(days: &[DailyTotal]) -> f64 {
    days.iter().map(|v| v.total_hours).sum()
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};

    use crate::storage::entities::AttendanceRecord;

    use super::{aggregate_daily, filter_range, sum_total, DailyTotal, DateRange};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    fn record(day: u32, total_hours: f64) -> AttendanceRecord {
        AttendanceRecord::new(
            date(day),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            0.,
            0.,
        )
        .with_total(total_hours)
    }

    #[test]
    fn test_filter_single_day() {
        let log = vec![record(14, 1.), record(15, 2.), record(16, 3.), record(15, 4.)];
        let filtered = filter_range(&log, DateRange::new(date(15), date(15)));
        assert_eq!(filtered, vec![record(15, 2.), record(15, 4.)]);
    }

    #[test]
    fn test_filter_is_inclusive() {
        let log = vec![record(13, 1.), record(14, 1.), record(15, 1.), record(16, 1.), record(17, 1.)];
        let filtered = filter_range(&log, DateRange::new(date(14), date(16)));
        assert_eq!(
            filtered.iter().map(|v| v.date).collect::<Vec<_>>(),
            vec![date(14), date(15), date(16)]
        );
    }

    #[test]
    fn test_filter_reversed_range() {
        let log = vec![record(14, 1.), record(15, 1.)];
        assert!(filter_range(&log, DateRange::new(date(15), date(14))).is_empty());
    }

    #[test]
    fn test_aggregate_same_day() {
        let days = aggregate_daily(&[record(15, 3.), record(15, 4.5)]);
        assert_eq!(
            days,
            vec![DailyTotal {
                date: date(15),
                total_hours: 7.5
            }]
        );
    }

    #[test]
    fn test_aggregate_is_ordered_by_date() {
        let log = [record(20, 1.), record(3, 2.), record(11, 3.), record(3, 1.)];
        let days = aggregate_daily(&log);
        assert_eq!(
            days.iter().map(|v| (v.date, v.total_hours)).collect::<Vec<_>>(),
            vec![(date(3), 3.), (date(11), 3.), (date(20), 1.)]
        );
        assert_eq!(sum_total(&days), 7.);
    }

    #[test]
    fn test_empty_log() {
        let today = date(19);
        let range = DateRange::spanning(&[], today);
        assert_eq!(range, DateRange::new(today, today));

        let filtered = filter_range(&[], range);
        assert!(filtered.is_empty());
        let days = aggregate_daily(&filtered);
        assert!(days.is_empty());
        assert_eq!(sum_total(&days), 0.);
    }

    #[test]
    fn test_default_range_spans_log() {
        let log = [record(11, 1.), record(3, 1.), record(20, 1.)];
        assert_eq!(
            DateRange::spanning(&log, date(30)),
            DateRange::new(date(3), date(20))
        );
        assert_eq!(
            DateRange::with_defaults(Some(date(5)), None, &log, date(30)),
            DateRange::new(date(5), date(20))
        );
        assert_eq!(
            DateRange::with_defaults(None, None, &[], date(30)),
            DateRange::new(date(30), date(30))
        );
    }
}
