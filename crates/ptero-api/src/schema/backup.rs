// Backup schema and its entity transform.
//
// Backups are the one resource whose in-memory form differs from the wire:
// timestamp strings become parsed date-times. The transform is pure and is
// applied by every manager method that hands out a backup.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::common::{Pagination, Timestamp, nullable};
use super::Schema;

/// Backup attributes exactly as the panel sends them (`object: "backup"`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BackupAttributes {
    pub uuid: String,
    pub is_successful: bool,
    pub is_locked: bool,
    pub name: String,
    pub ignored_files: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub checksum: Option<String>,
    pub bytes: u64,
    pub created_at: Timestamp,
    #[serde(deserialize_with = "nullable")]
    pub completed_at: Option<Timestamp>,
}

impl Schema for BackupAttributes {
    const OBJECT: &'static str = "backup";
    type Entity = Backup;
}

/// A backup as handed to callers, with parsed timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Backup {
    pub uuid: String,
    pub is_successful: bool,
    pub is_locked: bool,
    pub name: String,
    pub ignored_files: Vec<String>,
    pub checksum: Option<String>,
    pub bytes: u64,
    pub created_at: DateTime<FixedOffset>,
    pub completed_at: Option<DateTime<FixedOffset>>,
}

impl Backup {
    /// `true` once the daemon has finished writing the archive.
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }
}

impl From<BackupAttributes> for Backup {
    fn from(raw: BackupAttributes) -> Self {
        Self {
            uuid: raw.uuid,
            is_successful: raw.is_successful,
            is_locked: raw.is_locked,
            name: raw.name,
            ignored_files: raw.ignored_files,
            checksum: raw.checksum,
            bytes: raw.bytes,
            created_at: raw.created_at.to_datetime(),
            completed_at: raw.completed_at.as_ref().map(Timestamp::to_datetime),
        }
    }
}

/// Meta block of a backup list. Unlike other lists it is required.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BackupListMeta {
    pub backup_count: u64,
    pub pagination: Pagination,
}
