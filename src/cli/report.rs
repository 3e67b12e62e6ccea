use std::fmt::Display;

use anyhow::Result;
use ansi_term::Colour;
use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_english::parse_date_string;
use clap::{CommandFactory, Parser, ValueEnum};
use tracing::debug;

use crate::{
    query::{aggregate_daily, filter_range, sum_total, DateRange},
    storage::record_storage::{AttendanceStore, RecordStorage},
    utils::{clock::Clock, time::parse_date_lenient},
};

use super::{
    output::{chart::render_chart, format_daily_total, format_hours, format_record, RECORD_HEADER},
    Args,
};

const CHART_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

#[derive(Debug, Parser)]
pub struct RangeCommand {
    #[arg(
        long = "from",
        short,
        help = "First day of the range. Examples are \"yesterday\", \"last monday\", \"15/03/2025\", \"2025-03-15\". Defaults to the earliest record"
    )]
    from: Option<String>,
    #[arg(
        long = "to",
        short,
        help = "Last day of the range, inclusive. Defaults to the latest record"
    )]
    to: Option<String>,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
}

/// Parses a date typed by a user. ISO dates are read as is, anything else goes through
/// chrono-english relative to `now`.
pub fn parse_user_date(value: &str, now: NaiveDateTime, style: DateStyle) -> Result<NaiveDate> {
    if let Some(date) = parse_date_lenient(value) {
        return Ok(date);
    }

    // Local wall time is pinned to UTC so that relative phrases don't shift across days.
    let anchor = Utc.from_utc_datetime(&now);
    match parse_date_string(value, anchor, style.into()) {
        Ok(v) => Ok(v.date_naive()),
        Err(e) => Err(Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!("Failed to validate date {value:?}: {e}"),
            )
            .into()),
    }
}

impl RangeCommand {
    fn parse_bounds(
        &self,
        now: NaiveDateTime,
    ) -> Result<(Option<NaiveDate>, Option<NaiveDate>)> {
        let start = self
            .from
            .as_deref()
            .map(|v| parse_user_date(v, now, self.date_style))
            .transpose()?;
        let end = self
            .to
            .as_deref()
            .map(|v| parse_user_date(v, now, self.date_style))
            .transpose()?;
        Ok((start, end))
    }
}

/// Command to process `records` command. Prints every record between the dates.
pub async fn process_records_command(
    command: RangeCommand,
    storage: impl RecordStorage,
    clock: &dyn Clock,
) -> Result<()> {
    let (start, end) = command.parse_bounds(clock.now())?;
    let store = AttendanceStore::open(storage).await;
    let range = DateRange::with_defaults(start, end, store.records(), clock.today());
    debug!("Showing records in {range:?}");

    let filtered = filter_range(store.records(), range);
    if filtered.is_empty() {
        println!("{}", Colour::Yellow.paint("No records found."));
        return Ok(());
    }

    println!("{}", Colour::White.bold().paint(RECORD_HEADER));
    for record in &filtered {
        println!("{}", format_record(record));
    }
    Ok(())
}

/// Command to process `daily` command. Prints hours per day, a chart of them and the sum.
pub async fn process_daily_command(
    command: RangeCommand,
    show_chart: bool,
    storage: impl RecordStorage,
    clock: &dyn Clock,
) -> Result<()> {
    let (start, end) = command.parse_bounds(clock.now())?;
    let store = AttendanceStore::open(storage).await;
    let range = DateRange::with_defaults(start, end, store.records(), clock.today());
    debug!("Aggregating records in {range:?}");

    let days = aggregate_daily(&filter_range(store.records(), range));
    if days.is_empty() {
        println!("{}", Colour::Blue.paint("No data available"));
        return Ok(());
    }

    for day in &days {
        println!("{}", format_daily_total(day));
    }

    if show_chart {
        println!();
        for line in render_chart(&days, CHART_WIDTH) {
            println!("{}", Colour::Cyan.paint(line));
        }
    }

    println!();
    println!(
        "{}",
        Colour::Blue.paint(format!("Total work hours: {} hours", format_hours(sum_total(&days))))
    );
    Ok(())
}
