//! Run-scoped migration state.
//!
//! [`MigrationContext`] holds everything fetched from the workspace at
//! startup plus the goals processed during this run. It is created once by
//! [`MigrationContext::load`] and passed to each component.

use crate::members::{MemberDirectory, OwnerDirectory};
use crate::models::{RemoteGoal, TimePeriod};
use crate::record::GoalRecord;
use crate::reference::ReferenceCodec;
use crate::repository::GoalRepository;
use crate::time_period::resolve_time_period;
use crate::Result;
use std::collections::HashMap;
use tracing::info;

/// Workspace identifiers a run needs for request bodies.
#[derive(Debug, Clone)]
pub struct WorkspaceSettings {
    pub workspace_gid: String,
    /// Initial owner of every created goal, so the migration account keeps
    /// edit rights after ownership moves.
    pub super_admin_gid: String,
}

/// Cached workspace state and per-run bookkeeping.
#[derive(Debug)]
pub struct MigrationContext {
    settings: WorkspaceSettings,
    remote_goals: Vec<RemoteGoal>,
    time_periods: Vec<TimePeriod>,
    owners: OwnerDirectory,
    /// Local goal id → remote gid for goals synchronized during this run.
    processed: HashMap<String, String>,
}

impl MigrationContext {
    /// Fetch goals, users and time periods once for the whole run.
    pub async fn load<R>(
        repo: &R,
        settings: WorkspaceSettings,
        members: &MemberDirectory,
    ) -> Result<Self>
    where
        R: GoalRepository + ?Sized,
    {
        let users = repo.list_users().await?;
        let time_periods = repo.list_time_periods().await?;
        let remote_goals = repo.list_goals().await?;
        let owners = OwnerDirectory::build(members, &users);
        info!(
            "Loaded workspace state: {} goals, {} users, {} time periods",
            remote_goals.len(),
            users.len(),
            time_periods.len()
        );
        Ok(Self::new(settings, remote_goals, time_periods, owners))
    }

    /// Build a context from already-fetched state.
    pub fn new(
        settings: WorkspaceSettings,
        remote_goals: Vec<RemoteGoal>,
        time_periods: Vec<TimePeriod>,
        owners: OwnerDirectory,
    ) -> Self {
        Self {
            settings,
            remote_goals,
            time_periods,
            owners,
            processed: HashMap::new(),
        }
    }

    pub fn settings(&self) -> &WorkspaceSettings {
        &self.settings
    }

    /// Remote goal whose notes carry the tag for `goal_id`.
    pub fn find_remote_goal(&self, goal_id: &str) -> Option<&RemoteGoal> {
        self.remote_goals.iter().find(|goal| {
            goal.notes
                .as_deref()
                .and_then(ReferenceCodec::decode)
                .as_deref()
                == Some(goal_id)
        })
    }

    /// Remember a goal created during this run so later lookups find it.
    pub fn register_remote_goal(&mut self, gid: String, notes: String) {
        self.remote_goals.push(RemoteGoal {
            gid,
            notes: Some(notes),
        });
    }

    pub fn remote_goal_count(&self) -> usize {
        self.remote_goals.len()
    }

    /// Time period gid for a record, if one matches.
    pub fn time_period_for(&self, record: &GoalRecord) -> Option<String> {
        resolve_time_period(
            &self.time_periods,
            record.start_on.as_deref(),
            record.due_on.as_deref(),
            record.period.as_deref(),
        )
        .map(|period| period.gid.clone())
    }

    /// Workspace user gid for an owner display name.
    pub fn owner_gid(&self, owner: &str) -> Option<&str> {
        self.owners.resolve(owner)
    }

    /// Gid recorded for a goal synchronized earlier in this run.
    pub fn processed_gid(&self, goal_id: &str) -> Option<&str> {
        self.processed.get(goal_id).map(String::as_str)
    }

    pub fn mark_processed(&mut self, goal_id: &str, gid: &str) {
        self.processed.insert(goal_id.to_string(), gid.to_string());
    }
}
