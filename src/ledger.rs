use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::LedgerError;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/**
Which (doctor, appointment time) pairs already triggered a notification.

Stored as a JSON object of doctor id -> list of ISO-8601 timestamps. Every
successful `record_notified` is written through to disk, so the file is
never behind the in-memory state. Entries are never expired.

One process at a time: nothing here locks the file.
*/
#[derive(Debug)]
pub struct NotificationLedger {
    path: PathBuf,
    entries: BTreeMap<String, Vec<String>>,
}

impl NotificationLedger {
    /// Opens the ledger at `path`, creating an empty one if it does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let path = path.into();

        let raw = match fs::read_to_string(&path) {
            Ok(raw) => Some(raw),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(source) => return Err(LedgerError::Io { path, source }),
        };

        let Some(raw) = raw else {
            info!(path = %path.display(), "creating notification ledger");
            let ledger = NotificationLedger {
                path,
                entries: BTreeMap::new(),
            };
            ledger.flush()?;
            return Ok(ledger);
        };

        let entries = if raw.trim().is_empty() {
            BTreeMap::new()
        } else {
            Self::decode(&path, &raw)?
        };

        debug!(
            path = %path.display(),
            doctors = entries.len(),
            "notification ledger opened"
        );
        Ok(NotificationLedger { path, entries })
    }

    fn decode(path: &Path, raw: &str) -> Result<BTreeMap<String, Vec<String>>, LedgerError> {
        let corrupt = |reason: String| LedgerError::Corrupt {
            path: path.to_path_buf(),
            reason,
        };

        let entries: BTreeMap<String, Vec<String>> =
            serde_json::from_str(raw).map_err(|e| corrupt(e.to_string()))?;

        for (doctor_id, times) in &entries {
            for time in times {
                NaiveDateTime::parse_from_str(time, TIMESTAMP_FORMAT).map_err(|e| {
                    corrupt(format!("bad timestamp {time:?} for doctor {doctor_id}: {e}"))
                })?;
            }
        }

        Ok(entries)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn has_notified(&self, doctor_id: &str, appointment_time: NaiveDateTime) -> bool {
        let key = appointment_time.format(TIMESTAMP_FORMAT).to_string();
        self.entries
            .get(doctor_id)
            .is_some_and(|times| times.contains(&key))
    }

    /// Appends the pair unless already present and persists the change.
    /// Returns whether anything was added.
    pub fn record_notified(
        &mut self,
        doctor_id: &str,
        appointment_time: NaiveDateTime,
    ) -> Result<bool, LedgerError> {
        let key = appointment_time.format(TIMESTAMP_FORMAT).to_string();
        let times = self.entries.entry(doctor_id.to_string()).or_default();
        if times.contains(&key) {
            return Ok(false);
        }

        times.push(key);
        self.flush()?;
        Ok(true)
    }

    /// Atomically replaces the file with the current contents.
    pub fn flush(&self) -> Result<(), LedgerError> {
        let io = |source: std::io::Error| LedgerError::Io {
            path: self.path.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(io)?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(io)?;
        serde_json::to_writer_pretty(&mut tmp, &self.entries)
            .map_err(|e| io(std::io::Error::other(e)))?;
        tmp.write_all(b"\n").map_err(io)?;
        tmp.as_file().sync_all().map_err(io)?;
        tmp.persist(&self.path).map_err(|e| io(e.error))?;
        Ok(())
    }

    /// Flushes and releases the ledger.
    pub fn close(self) -> Result<(), LedgerError> {
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 11, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn open_creates_missing_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("notified.json");

        let ledger = NotificationLedger::open(&path).unwrap();
        assert!(path.exists());
        assert!(!ledger.has_notified("3311", at(3, 8)));
    }

    #[test]
    fn record_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = NotificationLedger::open(dir.path().join("n.json")).unwrap();

        assert!(ledger.record_notified("3311", at(3, 8)).unwrap());
        assert!(!ledger.record_notified("3311", at(3, 8)).unwrap());
        assert!(ledger.has_notified("3311", at(3, 8)));
        assert_eq!(ledger.entries["3311"].len(), 1);
    }

    #[test]
    fn keys_are_per_doctor_and_time() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = NotificationLedger::open(dir.path().join("n.json")).unwrap();
        ledger.record_notified("3311", at(3, 8)).unwrap();

        assert!(!ledger.has_notified("3311", at(3, 9)));
        assert!(!ledger.has_notified("4000", at(3, 8)));
    }

    #[test]
    fn survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("n.json");

        let mut ledger = NotificationLedger::open(&path).unwrap();
        ledger.record_notified("3311", at(3, 8)).unwrap();
        ledger.record_notified("3311", at(4, 10)).unwrap();
        ledger.close().unwrap();

        let reopened = NotificationLedger::open(&path).unwrap();
        assert!(reopened.has_notified("3311", at(3, 8)));
        assert!(reopened.has_notified("3311", at(4, 10)));
        assert_eq!(
            reopened.entries["3311"],
            vec!["2026-11-03T08:00:00", "2026-11-04T10:00:00"]
        );
    }

    #[test]
    fn empty_file_is_an_empty_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("n.json");
        fs::write(&path, "").unwrap();

        let ledger = NotificationLedger::open(&path).unwrap();
        assert!(ledger.entries.is_empty());
    }

    #[test]
    fn garbage_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("n.json");
        fs::write(&path, "not json").unwrap();

        let err = NotificationLedger::open(&path).unwrap_err();
        assert!(matches!(err, LedgerError::Corrupt { .. }));
    }

    #[test]
    fn wrong_shape_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("n.json");
        fs::write(&path, r#"{"3311": "2026-11-03T08:00:00"}"#).unwrap();

        assert!(matches!(
            NotificationLedger::open(&path),
            Err(LedgerError::Corrupt { .. })
        ));
    }

    #[test]
    fn bad_timestamp_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("n.json");
        fs::write(&path, r#"{"3311": ["tomorrow"]}"#).unwrap();

        let err = NotificationLedger::open(&path).unwrap_err();
        assert!(err.to_string().contains("tomorrow"));
    }
}
