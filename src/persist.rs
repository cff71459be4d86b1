// 4.0 persist.rs: durable snapshot writer/reader. a crash at any point leaves
// either the old snapshot or the new one on disk, never a partial file.
//
// write path: temp file in the snapshot's own directory → fsync → back up the
// prior snapshot → prune backups to the retention cap → atomic rename.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::Utc;
use tracing::{debug, info};

use crate::record::TradeRecord;

const BACKUP_DIR: &str = "backups";

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("snapshot io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // fatal at startup. never silently replaced with an empty collection.
    #[error("corrupt snapshot at {path}: {source}")]
    CorruptSnapshot {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/** 4.1: owns the snapshot path and backup policy */
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
    backup_retention: usize,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>, backup_retention: usize) -> Self {
        Self {
            path: path.into(),
            backup_retention,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing snapshot means a fresh deployment: empty collection.
    /// An unparseable snapshot is a hard error.
    pub fn load(&self) -> Result<Vec<TradeRecord>, PersistError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let bytes = fs::read(&self.path).map_err(|e| self.io_err(e))?;
        let records = serde_json::from_slice(&bytes).map_err(|e| PersistError::CorruptSnapshot {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(records)
    }

    /// Durably replaces the snapshot with `records`. The temp file is removed
    /// on any failure (drop), so the canonical path is never truncated.
    pub fn save(&self, records: &[TradeRecord]) -> Result<(), PersistError> {
        let dir = self.snapshot_dir();
        fs::create_dir_all(&dir).map_err(|e| self.io_err(e))?;

        // same directory as the target so the final rename is atomic
        let mut tmp = tempfile::Builder::new()
            .prefix("trades_")
            .suffix(".tmp")
            .tempfile_in(&dir)
            .map_err(|e| self.io_err(e))?;
        serde_json::to_writer_pretty(&mut tmp, records).map_err(|e| self.json_io_err(e))?;
        tmp.flush().map_err(|e| self.io_err(e))?;
        tmp.as_file().sync_all().map_err(|e| self.io_err(e))?;

        if self.path.exists() {
            self.backup_current(&dir)?;
        }

        tmp.persist(&self.path)
            .map_err(|e| self.io_err(e.error))?;
        info!(path = %self.path.display(), records = records.len(), "snapshot committed");
        Ok(())
    }

    // copies the current snapshot into backups/ under a timestamped name,
    // then deletes the oldest backups beyond the retention cap
    fn backup_current(&self, dir: &Path) -> Result<(), PersistError> {
        let backup_dir = dir.join(BACKUP_DIR);
        fs::create_dir_all(&backup_dir).map_err(|e| self.io_err(e))?;

        // nanosecond component keeps rapid successive saves from colliding
        let name = format!("trades_{}.json", Utc::now().format("%Y%m%d_%H%M%S_%f"));
        let backup_path = backup_dir.join(name);
        fs::copy(&self.path, &backup_path).map_err(|e| self.io_err(e))?;
        debug!(path = %backup_path.display(), "snapshot backed up");

        self.prune_backups(&backup_dir)
    }

    fn prune_backups(&self, backup_dir: &Path) -> Result<(), PersistError> {
        let mut backups: Vec<(SystemTime, PathBuf)> = Vec::new();
        for entry in fs::read_dir(backup_dir).map_err(|e| self.io_err(e))? {
            let entry = entry.map_err(|e| self.io_err(e))?;
            let path = entry.path();
            if path.extension().map(|ext| ext == "json") != Some(true) {
                continue;
            }
            let modified = entry
                .metadata()
                .and_then(|m| m.modified())
                .map_err(|e| self.io_err(e))?;
            backups.push((modified, path));
        }

        // oldest first
        backups.sort();
        while backups.len() > self.backup_retention {
            let (_, oldest) = backups.remove(0);
            fs::remove_file(&oldest).map_err(|e| self.io_err(e))?;
            debug!(path = %oldest.display(), "old backup pruned");
        }
        Ok(())
    }

    fn snapshot_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if parent != Path::new("") => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn io_err(&self, source: std::io::Error) -> PersistError {
        PersistError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn json_io_err(&self, source: serde_json::Error) -> PersistError {
        PersistError::Io {
            path: self.path.clone(),
            source: source.into(),
        }
    }
}
