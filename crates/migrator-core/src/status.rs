//! Check-in status labels and their Asana equivalents.

use serde::Serialize;

/// Status label as written in the export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLabel {
    OnTrack,
    AtRisk,
    Behind,
    Closed,
}

/// `status_type` of an Asana status update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusUpdateType {
    OnTrack,
    AtRisk,
    OffTrack,
    Achieved,
}

/// `status` field of an Asana goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    Green,
    Yellow,
    Red,
    Achieved,
}

impl StatusLabel {
    /// Exact match against the four known labels; anything else is `None`.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim_end() {
            "On Track" => Some(StatusLabel::OnTrack),
            "At Risk" => Some(StatusLabel::AtRisk),
            "Behind" => Some(StatusLabel::Behind),
            "Closed" => Some(StatusLabel::Closed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusLabel::OnTrack => "On Track",
            StatusLabel::AtRisk => "At Risk",
            StatusLabel::Behind => "Behind",
            StatusLabel::Closed => "Closed",
        }
    }

    pub fn status_update_type(&self) -> StatusUpdateType {
        match self {
            StatusLabel::OnTrack => StatusUpdateType::OnTrack,
            StatusLabel::AtRisk => StatusUpdateType::AtRisk,
            StatusLabel::Behind => StatusUpdateType::OffTrack,
            StatusLabel::Closed => StatusUpdateType::Achieved,
        }
    }

    pub fn goal_status(&self) -> GoalStatus {
        match self {
            StatusLabel::OnTrack => GoalStatus::Green,
            StatusLabel::AtRisk => GoalStatus::Yellow,
            StatusLabel::Behind => GoalStatus::Red,
            StatusLabel::Closed => GoalStatus::Achieved,
        }
    }
}

impl std::fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
