//! Asana request and response types.
//!
//! Only the fields the migration reads or writes are modelled.

use crate::status::{GoalStatus, StatusUpdateType};
use serde::{Deserialize, Serialize};

/// Asana wraps every request and response body in `{"data": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// One page of a list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub next_page: Option<NextPage>,
}

/// Cursor for the next page; absent on the last page.
#[derive(Debug, Clone, Deserialize)]
pub struct NextPage {
    pub offset: String,
}

/// Minimal object reference returned by create and update calls.
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectRef {
    pub gid: String,
}

/// A goal as listed from the workspace (`opt_fields=notes`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteGoal {
    pub gid: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A workspace user (`opt_fields=gid,email,name`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceUser {
    pub gid: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// A fiscal quarter or year configured in the workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimePeriod {
    pub gid: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub start_on: Option<String>,
    #[serde(default)]
    pub end_on: Option<String>,
}

/// Body for creating or fully updating a goal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub notes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_on: Option<String>,
    pub is_workspace_level: bool,
    pub owner: String,
    pub workspace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_period: Option<String>,
}

/// Partial goal update (owner reassignment or status colour).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GoalPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<GoalStatus>,
}

/// How a goal metric computes progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressSource {
    /// Rolled up automatically from supporting sub-goals.
    SubgoalProgress,
    Manual,
}

/// Body for `POST /goals/{gid}/setMetric`. Replaces any existing metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricParams {
    pub progress_source: ProgressSource,
    pub precision: u32,
    pub unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_number_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_number_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_number_value: Option<f64>,
}

impl MetricParams {
    /// Automatic percentage metric driven by sub-goals.
    pub fn subgoal_progress() -> Self {
        Self {
            progress_source: ProgressSource::SubgoalProgress,
            precision: 1,
            unit: "percentage".to_string(),
            initial_number_value: None,
            current_number_value: None,
            target_number_value: None,
        }
    }

    /// Manual percentage metric; values are fractions in `0.0..=1.0`.
    pub fn manual(initial: f64, current: f64, target: f64) -> Self {
        Self {
            progress_source: ProgressSource::Manual,
            precision: 1,
            unit: "percentage".to_string(),
            initial_number_value: Some(initial),
            current_number_value: Some(current),
            target_number_value: Some(target),
        }
    }
}

/// Body for `POST /status_updates`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusUpdateParams {
    pub parent: String,
    pub status_type: StatusUpdateType,
    pub text: String,
    pub title: String,
}

/// Body for `POST /goals/{gid}/addSupportingRelationship`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupportingRelationshipParams {
    pub supporting_resource: String,
    pub contribution_weight: u32,
}
