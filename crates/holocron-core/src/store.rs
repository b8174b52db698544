//! Record Store
//!
//! Stores progression records as JSON files in `~/.holocron/records/`,
//! one file per agent.

use crate::config::ProgressionConfig;
use crate::error::{Error, Result};
use crate::force_user::{ForceUser, ProgressionRecord};
use crate::ids::AgentId;
use crate::roster::Roster;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default records directory
const DEFAULT_RECORDS_DIR: &str = ".holocron/records";

/// JSON file store for progression records
#[derive(Debug)]
pub struct RecordStore {
    data_dir: PathBuf,
}

impl RecordStore {
    /// Create store with default path (`~/.holocron/records/`)
    #[must_use]
    pub fn new() -> Self {
        let data_dir = dirs::home_dir()
            .map(|h| h.join(DEFAULT_RECORDS_DIR))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RECORDS_DIR));

        Self { data_dir }
    }

    /// Create store with custom path
    #[must_use]
    pub fn with_path(path: impl AsRef<Path>) -> Self {
        Self {
            data_dir: path.as_ref().to_path_buf(),
        }
    }

    /// Return data directory path
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Save one record
    ///
    /// Filename format: `{agent}.json`. Bytes outside `[a-z0-9-]` are written
    /// as `_` plus two hex digits, so distinct ids never share a file, even on
    /// case-insensitive filesystems.
    pub fn save(&self, record: &ProgressionRecord) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.data_dir).map_err(|e| {
            Error::Internal(format!(
                "Failed to create records directory {:?}: {}",
                self.data_dir, e
            ))
        })?;

        let path = self.path_for(&record.agent);
        let content = serde_json::to_string_pretty(record)
            .map_err(|e| Error::Serialization(format!("Failed to serialize record: {}", e)))?;

        std::fs::write(&path, content).map_err(|e| {
            Error::Internal(format!("Failed to write record to {:?}: {}", path, e))
        })?;

        info!(agent = %record.agent, level = record.experience.level(), path = ?path, "Record saved");
        Ok(path)
    }

    /// Save every record in the roster
    pub fn save_roster(&self, roster: &Roster) -> Result<usize> {
        let records = roster.records();
        for record in &records {
            self.save(record)?;
        }
        Ok(records.len())
    }

    /// Load one record, repaired
    ///
    /// Fails when the file holds another agent's record. The host still has
    /// to run [`ForceUser::resync_abilities`] before any other engine call.
    pub fn load(&self, agent: &AgentId, config: &ProgressionConfig) -> Result<Option<ForceUser>> {
        let path = self.path_for(agent);
        if !path.exists() {
            return Ok(None);
        }

        let record = self.load_file(&path)?;
        if &record.agent != agent {
            warn!(requested = %agent, stored = %record.agent, path = ?path, "Record belongs to another agent");
            return Err(Error::Internal(format!(
                "{:?} holds the record of '{}', not '{}'",
                path, record.agent, agent
            )));
        }
        debug!(agent = %record.agent, "Record loaded");
        Ok(Some(ForceUser::from_record(record, config)))
    }

    /// Load every readable record
    ///
    /// Unreadable files are logged and skipped.
    pub fn load_all(&self) -> Result<Vec<ProgressionRecord>> {
        let mut records = Vec::new();
        if !self.data_dir.exists() {
            return Ok(records);
        }

        let entries = std::fs::read_dir(&self.data_dir).map_err(|e| {
            Error::Internal(format!(
                "Failed to read records directory {:?}: {}",
                self.data_dir, e
            ))
        })?;

        let mut paths: Vec<_> = entries.flatten().map(|e| e.path()).collect();
        paths.sort();

        for path in paths {
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            match self.load_file(&path) {
                Ok(record) => records.push(record),
                Err(e) => warn!(path = ?path, error = %e, "Failed to load record"),
            }
        }

        Ok(records)
    }

    /// Load every record into a repaired roster
    pub fn load_roster(&self, config: &ProgressionConfig) -> Result<Roster> {
        Ok(Roster::from_records(self.load_all()?, config))
    }

    /// Agent ids with a stored record, sorted
    pub fn list_agents(&self) -> Result<Vec<AgentId>> {
        let mut agents: Vec<_> = self.load_all()?.into_iter().map(|r| r.agent).collect();
        agents.sort();
        Ok(agents)
    }

    /// Delete one record
    pub fn delete(&self, agent: &AgentId) -> Result<bool> {
        let path = self.path_for(agent);
        if !path.exists() {
            return Ok(false);
        }

        std::fs::remove_file(&path)
            .map_err(|e| Error::Internal(format!("Failed to delete record {:?}: {}", path, e)))?;

        info!(agent = %agent, "Record deleted");
        Ok(true)
    }

    /// Check if a record exists
    #[must_use]
    pub fn exists(&self, agent: &AgentId) -> bool {
        self.path_for(agent).exists()
    }

    fn load_file(&self, path: &Path) -> Result<ProgressionRecord> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Internal(format!("Failed to read {:?}: {}", path, e)))?;

        serde_json::from_str(&content)
            .map_err(|e| Error::Serialization(format!("Failed to parse {:?}: {}", path, e)))
    }

    fn path_for(&self, agent: &AgentId) -> PathBuf {
        self.data_dir.join(Self::filename(agent))
    }

    fn filename(agent: &AgentId) -> String {
        let mut stem = String::with_capacity(agent.as_str().len());
        for byte in agent.as_str().bytes() {
            match byte {
                b'a'..=b'z' | b'0'..=b'9' | b'-' => stem.push(char::from(byte)),
                _ => stem.push_str(&format!("_{byte:02x}")),
            }
        }
        format!("{}.json", stem)
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}
