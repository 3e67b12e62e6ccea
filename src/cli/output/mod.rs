pub mod chart;

use crate::{
    query::DailyTotal,
    storage::entities::AttendanceRecord,
    utils::time::format_date,
};

pub const RECORD_HEADER: &str = "Date\t\tEntry\tExit\tBreak\tExtra\tTotal";

pub fn format_hours(hours: f64) -> String {
    format!("{hours:.2}")
}

pub fn format_record(record: &AttendanceRecord) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}",
        format_date(record.date),
        record.entry_time,
        record.exit_time,
        format_hours(record.break_hours),
        format_hours(record.extra_hours),
        format_hours(record.total_hours)
    )
}

pub fn format_daily_total(day: &DailyTotal) -> String {
    format!("{}\t{}", format_date(day.date), format_hours(day.total_hours))
}
