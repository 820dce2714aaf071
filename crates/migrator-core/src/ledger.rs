//! Append-only ledger of migrated rows.
//!
//! `goals_processed.csv` records one row per fully migrated goal. Later runs
//! read it to skip goals that already made it across.

use crate::{MigratorError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Ledger column names, in file order.
pub const LEDGER_HEADERS: [&str; 3] = ["goal_index", "goal_id", "asana_goal_gid"];

/// One migrated row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedEntry {
    /// Row position in the goals export.
    pub goal_index: String,
    pub goal_id: String,
    pub asana_goal_gid: String,
}

impl ProcessedEntry {
    pub fn new(goal_index: usize, goal_id: &str, asana_goal_gid: &str) -> Self {
        Self {
            goal_index: goal_index.to_string(),
            goal_id: goal_id.to_string(),
            asana_goal_gid: asana_goal_gid.to_string(),
        }
    }
}

/// The processed-goals ledger file and the goal ids it contains.
#[derive(Debug)]
pub struct ProcessedLedger {
    path: PathBuf,
    goal_ids: HashSet<String>,
}

impl ProcessedLedger {
    /// Open an existing ledger, or create one holding only the header row.
    ///
    /// An empty file is treated as missing.
    pub fn open_or_create(path: &Path) -> Result<Self> {
        let is_empty = path.is_file()
            && std::fs::metadata(path)
                .map_err(|e| MigratorError::io_with_path(e, path))?
                .len()
                == 0;
        if !path.is_file() || is_empty {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .map_err(|e| MigratorError::io_with_path(e, parent))?;
            }
            let mut writer =
                csv::Writer::from_path(path).map_err(|e| MigratorError::csv_with_path(e, path))?;
            writer
                .write_record(LEDGER_HEADERS)
                .map_err(|e| MigratorError::csv_with_path(e, path))?;
            writer
                .flush()
                .map_err(|e| MigratorError::io_with_path(e, path))?;
            info!("Created processed ledger at {}", path.display());
            return Ok(Self {
                path: path.to_path_buf(),
                goal_ids: HashSet::new(),
            });
        }

        let mut reader =
            csv::Reader::from_path(path).map_err(|e| MigratorError::csv_with_path(e, path))?;
        let headers = reader
            .headers()
            .map_err(|e| MigratorError::csv_with_path(e, path))?;
        if headers.iter().ne(LEDGER_HEADERS) {
            return Err(MigratorError::validation(
                "ledger",
                format!(
                    "{} has header {:?}, expected {:?}",
                    path.display(),
                    headers.iter().collect::<Vec<_>>(),
                    LEDGER_HEADERS
                ),
            ));
        }

        let mut goal_ids = HashSet::new();
        for entry in reader.deserialize::<ProcessedEntry>() {
            let entry = entry.map_err(|e| MigratorError::csv_with_path(e, path))?;
            goal_ids.insert(entry.goal_id);
        }
        info!(
            "Loaded {} processed goals from {}",
            goal_ids.len(),
            path.display()
        );
        Ok(Self {
            path: path.to_path_buf(),
            goal_ids,
        })
    }

    pub fn contains(&self, goal_id: &str) -> bool {
        self.goal_ids.contains(goal_id)
    }

    pub fn len(&self) -> usize {
        self.goal_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goal_ids.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry and flush it to disk.
    pub fn append(&mut self, entry: &ProcessedEntry) -> Result<()> {
        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| MigratorError::io_with_path(e, &self.path))?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer
            .serialize(entry)
            .map_err(|e| MigratorError::csv_with_path(e, &self.path))?;
        writer
            .flush()
            .map_err(|e| MigratorError::io_with_path(e, &self.path))?;

        debug!(
            "Recorded goal {} as {} in ledger",
            entry.goal_id, entry.asana_goal_gid
        );
        self.goal_ids.insert(entry.goal_id.clone());
        Ok(())
    }
}
