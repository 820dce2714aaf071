//! Goal records mapped from the CSV export.

use crate::parsers;

/// Maximum number of historical check-ins a row can carry: the `Checkins`
/// column plus the thirteen unnamed columns after it.
pub const MAX_CHECKINS: usize = 14;

/// Historical check-in blobs for one goal, earliest first.
///
/// Bounded by [`MAX_CHECKINS`]; blank cells are not stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Checkins(Vec<String>);

impl Checkins {
    /// Build from cells in export order (newest first).
    ///
    /// Cells past [`MAX_CHECKINS`] are ignored.
    pub fn from_export_cells<I>(cells: I) -> Self
    where
        I: IntoIterator<Item = Option<String>>,
    {
        let mut entries: Vec<String> = cells
            .into_iter()
            .take(MAX_CHECKINS)
            .flatten()
            .collect();
        entries.reverse();
        Self(entries)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// A parent reference parsed from an `Aligned To` cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentRef {
    pub goal_id: String,
    pub weight: Option<String>,
}

/// One goal as described by a CSV row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoalRecord {
    /// Local id from the export; written into the remote goal's notes.
    pub id: String,
    pub name: Option<String>,
    /// Display name of the owner, resolved through the members export.
    pub owner: Option<String>,
    /// Original description.
    pub notes: Option<String>,
    pub goal_type: Option<String>,
    pub period: Option<String>,
    pub start_on: Option<String>,
    pub due_on: Option<String>,
    /// Progress numbers as percentages (0-100), unparsed.
    pub initial_number_value: Option<String>,
    pub current_number_value: Option<String>,
    pub target_number_value: Option<String>,
    pub status: Option<String>,
    pub last_status_timestamp: Option<String>,
    pub last_status_update: Option<String>,
    pub checkins: Checkins,
    /// Free text such as `weight: 1, Id: 42`.
    pub aligned_to: Option<String>,
}

impl GoalRecord {
    /// Only `Organization` goals live at the workspace level.
    pub fn is_workspace_level(&self) -> bool {
        self.goal_type.as_deref() == Some("Organization")
    }

    pub fn has_alignment(&self) -> bool {
        self.aligned_to.is_some()
    }

    /// Parent reference, if the alignment cell names a goal id.
    pub fn alignment(&self) -> Option<AlignmentRef> {
        let text = self.aligned_to.as_deref()?;
        let goal_id = parsers::parse_goal_id(text)?;
        Some(AlignmentRef {
            goal_id,
            weight: parsers::parse_goal_weight(text),
        })
    }
}
