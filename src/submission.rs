use anyhow::Result;
use chrono::{NaiveDate, NaiveTime, Timelike};
use tracing::{info, instrument, warn};

use crate::{
    storage::{
        entities::AttendanceRecord,
        record_storage::{AttendanceStore, RecordStorage},
    },
    utils::clock::Clock,
};

/// Raw input for a new attendance record. Every field is optional, fields that weren't provided
/// take the same defaults an entry form would show: today, the current time and no extra hours.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Submission {
    pub date: Option<NaiveDate>,
    pub entry_time: Option<NaiveTime>,
    pub exit_time: Option<NaiveTime>,
    pub break_hours: Option<f64>,
    pub extra_hours: Option<f64>,
}

impl Submission {
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.entry_time.is_none()
            && self.exit_time.is_none()
            && self.break_hours.is_none()
            && self.extra_hours.is_none()
    }

    /// Builds a record out of the submission. Returns [None] if nothing was filled in.
    pub fn into_record(self, clock: &dyn Clock) -> Option<AttendanceRecord> {
        if self.is_empty() {
            return None;
        }

        let now = clock.now();
        // Seconds never reach the disk, so they are dropped here to keep the total consistent
        // with the stored times.
        let current_time = NaiveTime::from_hms_opt(now.hour(), now.minute(), 0)
            .unwrap_or(NaiveTime::MIN);

        Some(AttendanceRecord::new(
            self.date.unwrap_or(now.date()),
            self.entry_time.unwrap_or(current_time),
            self.exit_time.unwrap_or(current_time),
            self.break_hours.unwrap_or(0.),
            self.extra_hours.unwrap_or(0.),
        ))
    }
}

#[derive(Debug, PartialEq)]
pub enum SubmitOutcome {
    Saved(AttendanceRecord),
    /// Nothing was filled in, so nothing was written.
    Empty,
}

/// Adds a single record to the log behind `storage`. The log is loaded, extended and written
/// back as a whole.
#[instrument(skip(storage, clock))]
pub async fn submit(
    storage: impl RecordStorage,
    clock: &dyn Clock,
    submission: Submission,
) -> Result<SubmitOutcome> {
    let Some(record) = submission.into_record(clock) else {
        warn!("Rejected empty submission");
        return Ok(SubmitOutcome::Empty);
    };

    let mut store = AttendanceStore::open(storage).await;
    store.append(record.clone());
    store.save().await?;
    info!("Saved attendance record {:?}", record);

    Ok(SubmitOutcome::Saved(record))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use anyhow::Result;
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
    use tempfile::tempdir;

    use crate::{
        storage::{
            entities::AttendanceRecord,
            record_storage::{JsonFileStorage, RecordStorage},
        },
        utils::{clock::MockClock, logging::TEST_LOGGING},
    };

    use super::{submit, SubmitOutcome, Submission};

    const TEST_DATE: NaiveDate = NaiveDate::from_ymd_opt(2018, 7, 4).unwrap();

    fn time(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    fn test_clock() -> MockClock {
        let mut clock = MockClock::new();
        clock.expect_now().returning(|| {
            NaiveDateTime::new(TEST_DATE, NaiveTime::from_hms_opt(18, 20, 42).unwrap())
        });
        clock
    }

    #[test]
    fn test_empty_submission() {
        let mut clock = MockClock::new();
        clock.expect_now().never();
        assert!(Submission::default().is_empty());
        assert_eq!(Submission::default().into_record(&clock), None);
    }

    #[test]
    fn test_defaults_are_filled() {
        let submission = Submission {
            entry_time: Some(time(9, 0)),
            ..Default::default()
        };
        let record = submission.into_record(&test_clock()).unwrap();
        assert_eq!(
            record,
            AttendanceRecord::new(TEST_DATE, time(9, 0), time(18, 20), 0., 0.)
        );
        assert!((record.total_hours - (9. + 20. / 60.)).abs() < 1e-9);
    }

    #[test]
    fn test_full_submission() {
        let submission = Submission {
            date: NaiveDate::from_ymd_opt(2025, 3, 15),
            entry_time: Some(time(22, 0)),
            exit_time: Some(time(6, 0)),
            break_hours: Some(1.),
            extra_hours: Some(0.5),
        };
        let record = submission.into_record(&test_clock()).unwrap();
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2025, 3, 15).unwrap());
        assert_eq!(record.total_hours, 7.5);
    }

    #[tokio::test]
    async fn test_submit_appends() -> Result<()> {
        *TEST_LOGGING;
        let dir = tempdir()?;
        let path = dir.path().join("attendance.json");
        let clock = test_clock();

        let first = Submission {
            entry_time: Some(time(9, 0)),
            exit_time: Some(time(12, 0)),
            ..Default::default()
        };
        let second = Submission {
            entry_time: Some(time(13, 0)),
            exit_time: Some(time(17, 30)),
            break_hours: Some(0.5),
            ..Default::default()
        };

        let outcome = submit(JsonFileStorage::new(path.clone()), &clock, first).await?;
        assert!(matches!(outcome, SubmitOutcome::Saved(ref v) if v.total_hours == 3.));
        submit(JsonFileStorage::new(path.clone()), &clock, second).await?;

        let log = JsonFileStorage::new(path).load().await;
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].entry_time.time(), Some(time(9, 0)));
        assert_eq!(log[1].total_hours, 4.);
        Ok(())
    }

    #[tokio::test]
    async fn test_submit_empty_writes_nothing() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("attendance.json");

        let outcome = submit(
            JsonFileStorage::new(path.clone()),
            &test_clock(),
            Submission::default(),
        )
        .await?;

        assert_eq!(outcome, SubmitOutcome::Empty);
        assert!(!path.exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_submit_recovers_from_malformed_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("attendance.json");
        fs::write(&path, "definitely not json")?;

        let submission = Submission {
            extra_hours: Some(2.),
            ..Default::default()
        };
        submit(JsonFileStorage::new(path.clone()), &test_clock(), submission).await?;

        let log = JsonFileStorage::new(path).load().await;
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].total_hours, 2.);
        Ok(())
    }

    #[tokio::test]
    async fn test_submit_reports_write_failure() -> Result<()> {
        let dir = tempdir()?;
        let submission = Submission {
            entry_time: Some(time(9, 0)),
            ..Default::default()
        };
        let result = submit(
            JsonFileStorage::new(dir.path().to_owned()),
            &test_clock(),
            submission,
        )
        .await;
        assert!(result.is_err());
        Ok(())
    }
}
