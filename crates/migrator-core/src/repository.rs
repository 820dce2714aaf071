//! Remote goal repository trait.
//!
//! The migration only talks to Asana through this trait, so the driver can be
//! exercised against an in-memory implementation.

use crate::models::{
    GoalParams, GoalPatch, MetricParams, RemoteGoal, StatusUpdateParams,
    SupportingRelationshipParams, TimePeriod, WorkspaceUser,
};
use crate::Result;
use async_trait::async_trait;

/// Goal, user and time period operations against one workspace.
#[async_trait]
pub trait GoalRepository: Send + Sync {
    /// Every goal in the workspace with its notes.
    async fn list_goals(&self) -> Result<Vec<RemoteGoal>>;

    /// Every user in the workspace.
    async fn list_users(&self) -> Result<Vec<WorkspaceUser>>;

    /// Every time period in the workspace.
    async fn list_time_periods(&self) -> Result<Vec<TimePeriod>>;

    /// Create a goal and return its gid.
    async fn create_goal(&self, params: &GoalParams) -> Result<String>;

    /// Replace a goal's fields and return its gid.
    async fn update_goal(&self, goal_gid: &str, params: &GoalParams) -> Result<String>;

    /// Change only the fields set in `patch`.
    async fn patch_goal(&self, goal_gid: &str, patch: &GoalPatch) -> Result<String>;

    /// Create or overwrite the goal's progress metric.
    async fn set_goal_metric(&self, goal_gid: &str, params: &MetricParams) -> Result<()>;

    /// Post a status update and return its gid.
    async fn create_status_update(&self, params: &StatusUpdateParams) -> Result<String>;

    /// Make `params.supporting_resource` a sub-goal of `parent_gid`.
    async fn add_supporting_relationship(
        &self,
        parent_gid: &str,
        params: &SupportingRelationshipParams,
    ) -> Result<()>;
}
