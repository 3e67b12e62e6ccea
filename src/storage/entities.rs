use std::fmt::Display;

use anyhow::{anyhow, Result};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::{
    utils::time::{format_time, parse_date_lenient, parse_time_lenient},
    worktime::compute_total,
};

/// Entry or exit time of a record. Stored files may contain values that aren't times at all,
/// those are carried as they were found so that saving doesn't destroy them.
#[derive(PartialEq, Debug, Clone)]
pub enum ShiftTime {
    Time(NaiveTime),
    Raw(Value),
}

impl ShiftTime {
    pub fn time(&self) -> Option<NaiveTime> {
        match self {
            ShiftTime::Time(time) => Some(*time),
            ShiftTime::Raw(_) => None,
        }
    }

    fn from_stored(value: Value) -> Self {
        match value.as_str().and_then(parse_time_lenient) {
            Some(time) => ShiftTime::Time(time),
            None => ShiftTime::Raw(value),
        }
    }
}

impl From<NaiveTime> for ShiftTime {
    fn from(value: NaiveTime) -> Self {
        ShiftTime::Time(value)
    }
}

impl Display for ShiftTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShiftTime::Time(time) => write!(f, "{}", format_time(*time)),
            ShiftTime::Raw(Value::String(s)) => write!(f, "{s}"),
            ShiftTime::Raw(Value::Null) => write!(f, "-"),
            ShiftTime::Raw(v) => write!(f, "{v}"),
        }
    }
}

impl Serialize for ShiftTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ShiftTime::Time(time) => serializer.serialize_str(&format_time(*time)),
            ShiftTime::Raw(value) => value.serialize(serializer),
        }
    }
}

/// One attendance entry as it is stored on the disk. Field names follow the persisted format, so a
/// record is written as `{"Date":"2025-03-15","Entry":"09:00","Exit":"17:00",...}`.
#[derive(PartialEq, Debug, Serialize, Clone)]
pub struct AttendanceRecord {
    #[serde(rename = "Date", with = "date_ser")]
    pub date: NaiveDate,
    #[serde(rename = "Entry")]
    pub entry_time: ShiftTime,
    #[serde(rename = "Exit")]
    pub exit_time: ShiftTime,
    #[serde(rename = "Break")]
    pub break_hours: f64,
    #[serde(rename = "Extra")]
    pub extra_hours: f64,
    #[serde(rename = "Total")]
    pub total_hours: f64,
}

impl AttendanceRecord {
    /// Creates a record with `total_hours` derived from the rest of the fields.
    pub fn new(
        date: NaiveDate,
        entry_time: NaiveTime,
        exit_time: NaiveTime,
        break_hours: f64,
        extra_hours: f64,
    ) -> Self {
        Self {
            date,
            entry_time: entry_time.into(),
            exit_time: exit_time.into(),
            break_hours,
            extra_hours,
            total_hours: compute_total(date, entry_time, exit_time, break_hours, extra_hours),
        }
    }

    pub fn with_total(self, total_hours: f64) -> Self {
        Self {
            total_hours,
            ..self
        }
    }
}

/// Ordered attendance records. Insertion order is kept and the same date may appear many times.
pub type AttendanceLog = Vec<AttendanceRecord>;

mod date_ser {
    use chrono::NaiveDate;
    use serde::Serializer;

    use crate::utils::time::format_date;

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_date(*date))
    }
}

/// Loosely typed view of a stored record. Files might have been edited by hand or written by an
/// older version, so every field is read as an arbitrary json value and coerced afterwards.
#[derive(Debug, Deserialize, Default)]
pub struct RawAttendanceEntity {
    #[serde(rename = "Date", default)]
    pub date: Value,
    #[serde(rename = "Entry", default)]
    pub entry: Value,
    #[serde(rename = "Exit", default)]
    pub exit: Value,
    #[serde(rename = "Break", default)]
    pub break_hours: Value,
    #[serde(rename = "Extra", default)]
    pub extra_hours: Value,
    #[serde(rename = "Total", default)]
    pub total_hours: Value,
}

impl TryFrom<RawAttendanceEntity> for AttendanceRecord {
    type Error = anyhow::Error;

    /// Only the date is required. Every other field is coerced or kept as is.
    fn try_from(raw: RawAttendanceEntity) -> Result<Self> {
        let date = raw
            .date
            .as_str()
            .and_then(parse_date_lenient)
            .ok_or_else(|| anyhow!("illegal date {}", raw.date))?;

        Ok(AttendanceRecord {
            date,
            entry_time: ShiftTime::from_stored(raw.entry),
            exit_time: ShiftTime::from_stored(raw.exit),
            break_hours: coerce_hours(&raw.break_hours),
            extra_hours: coerce_hours(&raw.extra_hours),
            total_hours: coerce_hours(&raw.total_hours),
        })
    }
}

/// Numbers and numeric strings are accepted, everything else counts as 0 hours.
fn coerce_hours(value: &Value) -> f64 {
    let hours = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    hours.filter(|v| v.is_finite()).unwrap_or(0.)
}
