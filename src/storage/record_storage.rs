use std::{
    future::Future,
    io::ErrorKind,
    ops::Deref,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde_json::Value;
use tokio::{fs, io::AsyncWriteExt};
use tracing::{debug, info, warn};

use super::entities::{AttendanceLog, AttendanceRecord, RawAttendanceEntity};

/// Interface for abstracting storage of attendance records.
pub trait RecordStorage {
    /// Reads the whole log. Never fails: anything that can't be read is treated as an empty log,
    /// and records that can't be understood are skipped.
    fn load(&self) -> impl Future<Output = AttendanceLog>;

    /// Overwrites stored data with `log`.
    fn save(&self, log: &[AttendanceRecord]) -> impl Future<Output = Result<()>>;
}

impl<T: Deref> RecordStorage for T
where
    T::Target: RecordStorage,
{
    fn load(&self) -> impl Future<Output = AttendanceLog> {
        self.deref().load()
    }

    fn save(&self, log: &[AttendanceRecord]) -> impl Future<Output = Result<()>> {
        self.deref().save(log)
    }
}

/// The main realization of [RecordStorage]. All records are kept in a single json array that is
/// rewritten on every save.
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_values(path: &Path) -> Option<Vec<Value>> {
        let content = match fs::read_to_string(path).await {
            Ok(v) => v,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No attendance file at {path:?}");
                return None;
            }
            Err(e) => {
                warn!("Failed to read attendance file {path:?}: {e}");
                return None;
            }
        };

        match serde_json::from_str::<Vec<Value>>(&content) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("Attendance file {path:?} is not a json array of records: {e}");
                None
            }
        }
    }
}

impl RecordStorage for JsonFileStorage {
    async fn load(&self) -> AttendanceLog {
        let Some(values) = Self::read_values(&self.path).await else {
            return vec![];
        };

        let log = parse_records(values);
        debug!("Loaded {} records from {:?}", log.len(), self.path);
        log
    }

    async fn save(&self, log: &[AttendanceRecord]) -> Result<()> {
        let buffer = serde_json::to_vec(log)?;

        if let Some(parent) = self.path.parent().filter(|v| !v.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory {parent:?}"))?;
        }

        let mut file = fs::File::create(&self.path)
            .await
            .with_context(|| format!("Failed to open {:?} for writing", self.path))?;
        file.write_all(&buffer)
            .await
            .with_context(|| format!("Failed to write records into {:?}", self.path))?;
        file.flush().await?;

        debug!("Saved {} records into {:?}", log.len(), self.path);
        Ok(())
    }
}

fn parse_records(values: Vec<Value>) -> AttendanceLog {
    values
        .into_iter()
        .filter_map(|value| {
            let raw = match serde_json::from_value::<RawAttendanceEntity>(value) {
                Ok(v) => v,
                Err(e) => {
                    warn!("Skipping stored value that is not a record: {e}");
                    return None;
                }
            };
            // Dropping the record loses it on the next save. Kept that way since there's no
            // sensible value to replace a broken date with.
            AttendanceRecord::try_from(raw)
                .inspect_err(|e| warn!("Skipping stored record: {e}"))
                .ok()
        })
        .collect()
}

/// Owns the attendance log for the duration of a command. The log is loaded once when the store
/// is opened and then can only grow through [AttendanceStore::append]. Nothing reaches the disk
/// until [AttendanceStore::save].
pub struct AttendanceStore<S: RecordStorage> {
    storage: S,
    log: AttendanceLog,
}

impl<S: RecordStorage> AttendanceStore<S> {
    pub async fn open(storage: S) -> Self {
        let log = storage.load().await;
        Self { storage, log }
    }

    pub fn records(&self) -> &[AttendanceRecord] {
        &self.log
    }

    pub fn append(&mut self, record: AttendanceRecord) {
        self.log.push(record);
    }

    pub async fn save(&self) -> Result<()> {
        self.storage.save(&self.log).await?;
        info!("Persisted {} attendance records", self.log.len());
        Ok(())
    }

    pub fn into_records(self) -> AttendanceLog {
        self.log
    }
}
