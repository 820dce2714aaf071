//! Goals export loading and row mapping.
//!
//! The export is read positionally against [`CsvSchema::COLUMN_NAMES`]. Row 0
//! is the export's own header and is kept in the sheet so row indices match
//! the file, but it is never mapped.

use crate::config::CsvSchema;
use crate::record::{Checkins, GoalRecord};
use crate::{MigratorError, Result};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

/// One CSV row, addressed by schema column name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalRow {
    /// Position in the file; 0 is the header row.
    pub index: usize,
    cells: Vec<Option<String>>,
}

impl GoalRow {
    /// Build a row from raw cells. Blank cells become absent.
    pub fn new<I, S>(index: usize, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let cells = cells
            .into_iter()
            .take(CsvSchema::COLUMN_NAMES.len())
            .map(|cell| {
                let cell = cell.as_ref();
                if cell.trim().is_empty() {
                    None
                } else {
                    Some(cell.to_string())
                }
            })
            .collect();
        Self { index, cells }
    }

    pub fn is_header(&self) -> bool {
        self.index == 0
    }

    /// Whether both rows hold the same cell values, wherever they sit in the file.
    pub fn same_cells(&self, other: &GoalRow) -> bool {
        self.cells == other.cells
    }

    /// Cell value for a schema column; missing columns read as absent.
    pub fn get(&self, column: &str) -> Option<&str> {
        CsvSchema::position(column)
            .and_then(|pos| self.cells.get(pos))
            .and_then(|cell| cell.as_deref())
    }

    fn owned(&self, column: &str) -> Option<String> {
        self.get(column).map(str::to_string)
    }

    /// Every cell from `marker` to the end of the schema, in column order.
    fn cells_from(&self, marker: &str) -> Vec<Option<String>> {
        let Some(start) = CsvSchema::position(marker) else {
            return Vec::new();
        };
        (start..CsvSchema::COLUMN_NAMES.len())
            .map(|pos| self.cells.get(pos).cloned().flatten())
            .collect()
    }
}

/// Map one row into a [`GoalRecord`].
///
/// Only presence is checked; the `Id` must be numeric because it becomes the
/// reference tag that later runs parse back.
pub fn map_row(row: &GoalRow) -> Result<GoalRecord> {
    let id = row.owned(CsvSchema::ID).ok_or_else(|| {
        MigratorError::validation(CsvSchema::ID, format!("row {} has no goal id", row.index))
    })?;
    let id = id.trim().to_string();
    if !id.chars().all(|c| c.is_ascii_digit()) {
        return Err(MigratorError::validation(
            CsvSchema::ID,
            format!("row {} has non-numeric goal id '{}'", row.index, id),
        ));
    }

    Ok(GoalRecord {
        id,
        name: row.owned(CsvSchema::TITLE),
        owner: row.owned(CsvSchema::CREATOR),
        notes: row.owned(CsvSchema::DESCRIPTION),
        goal_type: row.owned(CsvSchema::OKR_TYPE),
        period: row.owned(CsvSchema::PERIOD),
        start_on: row.owned(CsvSchema::START_DATE),
        due_on: row.owned(CsvSchema::END_DATE),
        initial_number_value: row.owned(CsvSchema::START),
        current_number_value: row.owned(CsvSchema::PROGRESS),
        target_number_value: row.owned(CsvSchema::TARGET),
        status: row.owned(CsvSchema::STATUS),
        last_status_timestamp: row.owned(CsvSchema::LAST_CHECKIN),
        last_status_update: row.owned(CsvSchema::LAST_CHECKIN_NOTE),
        checkins: Checkins::from_export_cells(row.cells_from(CsvSchema::CHECKINS_MARKER)),
        aligned_to: row.owned(CsvSchema::ALIGNED_TO),
    })
}

/// The full goals export, in file order with exact duplicates removed.
#[derive(Debug, Clone, Default)]
pub struct GoalSheet {
    rows: Vec<GoalRow>,
}

impl GoalSheet {
    /// Read a goals export from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(|e| MigratorError::csv_with_path(e, path))?;
        let sheet = Self::from_reader(reader).map_err(|e| match e {
            MigratorError::Csv {
                message, source, ..
            } => MigratorError::Csv {
                message,
                path: Some(path.to_path_buf()),
                source,
            },
            other => other,
        })?;
        info!("Imported <{}> goals from {}", sheet.goal_count(), path.display());
        Ok(sheet)
    }

    /// Read a goals export from any CSV reader configured without headers.
    pub fn from_reader<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Self> {
        let mut seen: HashSet<Vec<Option<String>>> = HashSet::new();
        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record?;
            let row = GoalRow::new(index, record.iter());
            if !seen.insert(row.cells.clone()) {
                debug!("Dropping duplicate row {}", index);
                continue;
            }
            rows.push(row);
        }
        Ok(Self { rows })
    }

    /// Build a sheet from rows already in memory.
    pub fn from_rows(rows: Vec<GoalRow>) -> Self {
        Self { rows }
    }

    /// All rows including the header.
    pub fn rows(&self) -> &[GoalRow] {
        &self.rows
    }

    /// Number of goal rows, excluding the header.
    pub fn goal_count(&self) -> usize {
        self.rows.iter().filter(|row| !row.is_header()).count()
    }

    /// First goal row whose `Id` cell equals `goal_id`.
    pub fn find_by_id(&self, goal_id: &str) -> Option<&GoalRow> {
        self.rows.iter().find(|row| {
            !row.is_header() && row.get(CsvSchema::ID).map(str::trim) == Some(goal_id)
        })
    }
}
