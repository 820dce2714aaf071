//! Create-or-update of a single goal.
//!
//! Every goal is written with the super admin as owner first and reassigned
//! afterwards, so the migration account keeps edit rights on goals it creates.
//! History (status updates) is only backfilled for goals created in this run;
//! re-running against an existing goal never duplicates it.

use crate::models::{GoalParams, GoalPatch, MetricParams, StatusUpdateParams};
use crate::parsers;
use crate::record::GoalRecord;
use crate::reference::ReferenceCodec;
use crate::repository::GoalRepository;
use crate::session::MigrationContext;
use crate::status::StatusLabel;
use crate::{MigratorError, Result};
use tracing::{debug, error, info, warn};

/// Whether a goal was newly created or an existing one was updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Created,
    Updated,
}

/// Result of synchronizing one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncedGoal {
    pub gid: String,
    pub outcome: SyncOutcome,
}

/// Writes goal records to a [`GoalRepository`].
pub struct GoalSynchronizer<'r, R: GoalRepository + ?Sized> {
    repo: &'r R,
}

impl<'r, R: GoalRepository + ?Sized> GoalSynchronizer<'r, R> {
    pub fn new(repo: &'r R) -> Self {
        Self { repo }
    }

    /// Create or update the remote goal for `record`.
    pub async fn sync(&self, ctx: &mut MigrationContext, record: &GoalRecord) -> Result<SyncedGoal> {
        let params = build_goal_params(ctx, record);
        let existing = ctx.find_remote_goal(&record.id).map(|goal| goal.gid.clone());

        let synced = match existing {
            Some(gid) => {
                debug!("Goal {} already exists as {}", record.id, gid);
                let gid = self.repo.update_goal(&gid, &params).await?;
                SyncedGoal {
                    gid,
                    outcome: SyncOutcome::Updated,
                }
            }
            None => {
                let gid = self.repo.create_goal(&params).await?;
                ctx.register_remote_goal(gid.clone(), params.notes.clone());
                self.backfill_status_updates(&gid, record).await?;
                SyncedGoal {
                    gid,
                    outcome: SyncOutcome::Created,
                }
            }
        };

        if let Some(owner) = record.owner.as_deref() {
            self.reassign_owner(ctx, &synced.gid, owner).await?;
        }

        if record.current_number_value.is_some() {
            let metric = metric_params(record)?;
            self.repo.set_goal_metric(&synced.gid, &metric).await?;
            debug!("Set {:?} metric on goal {}", metric.progress_source, record.id);

            if synced.outcome == SyncOutcome::Created
                && record.checkins.is_empty()
                && record.last_status_update.is_none()
            {
                if let Some(status) = record.status.as_deref() {
                    self.set_status(&synced.gid, status).await?;
                }
            }
        }

        info!(
            "{} goal {} as {}",
            match synced.outcome {
                SyncOutcome::Created => "Created",
                SyncOutcome::Updated => "Updated",
            },
            record.id,
            synced.gid
        );
        Ok(synced)
    }

    /// Overwrite a goal's metric with automatic sub-goal progress.
    pub async fn force_subgoal_progress(&self, goal_gid: &str) -> Result<()> {
        self.repo
            .set_goal_metric(goal_gid, &MetricParams::subgoal_progress())
            .await
    }

    /// Replay check-in history on a freshly created goal.
    ///
    /// Returns the number of status updates created.
    async fn backfill_status_updates(&self, goal_gid: &str, record: &GoalRecord) -> Result<usize> {
        let mut created = 0;

        if record.checkins.is_empty() {
            if let Some(notes) = record.last_status_update.as_deref() {
                let params = status_update_params(
                    goal_gid,
                    record.status.as_deref(),
                    record.last_status_timestamp.as_deref(),
                    Some(notes),
                );
                if let Some(params) = params {
                    self.repo.create_status_update(&params).await?;
                    created += 1;
                }
            }
            return Ok(created);
        }

        for checkin in record.checkins.iter() {
            let status = parsers::parse_checkin_status(checkin);
            let timestamp = parsers::parse_checkin_timestamp(checkin);
            let notes = parsers::parse_checkin_notes(checkin);
            match status_update_params(
                goal_gid,
                status.as_deref(),
                timestamp.as_deref(),
                notes.as_deref(),
            ) {
                Some(params) => {
                    self.repo.create_status_update(&params).await?;
                    created += 1;
                }
                None => debug!("Skipping check-in with status {:?}", status),
            }
        }

        debug!(
            "Backfilled {} of {} check-ins on goal {}",
            created,
            record.checkins.len(),
            goal_gid
        );
        Ok(created)
    }

    async fn reassign_owner(&self, ctx: &MigrationContext, goal_gid: &str, owner: &str) -> Result<()> {
        let Some(owner_gid) = ctx.owner_gid(owner) else {
            error!(
                "Could not find owner <{}> in the members export for goal {}; keeping the super admin as owner",
                owner, goal_gid
            );
            return Ok(());
        };

        let patch = GoalPatch {
            owner: Some(owner_gid.to_string()),
            ..Default::default()
        };
        self.repo.patch_goal(goal_gid, &patch).await?;
        Ok(())
    }

    async fn set_status(&self, goal_gid: &str, status: &str) -> Result<()> {
        let Some(label) = StatusLabel::parse(status) else {
            warn!("Unknown status <{}> on goal {}, leaving it unset", status, goal_gid);
            return Ok(());
        };
        let patch = GoalPatch {
            status: Some(label.goal_status()),
            ..Default::default()
        };
        self.repo.patch_goal(goal_gid, &patch).await?;
        Ok(())
    }
}

/// Create/update body for a record.
pub fn build_goal_params(ctx: &MigrationContext, record: &GoalRecord) -> GoalParams {
    let settings = ctx.settings();
    GoalParams {
        name: record.name.clone(),
        notes: ReferenceCodec::goal_notes(&record.id, record.notes.as_deref()),
        start_on: record.start_on.clone(),
        due_on: record.due_on.clone(),
        is_workspace_level: record.is_workspace_level(),
        owner: settings.super_admin_gid.clone(),
        workspace: settings.workspace_gid.clone(),
        time_period: ctx.time_period_for(record),
    }
}

/// Metric for a record that carries a progress value.
///
/// Goals that are not aligned anywhere roll up from their sub-goals. Aligned
/// goals keep the export's numbers as a manual metric.
pub fn metric_params(record: &GoalRecord) -> Result<MetricParams> {
    if !record.has_alignment() {
        return Ok(MetricParams::subgoal_progress());
    }
    Ok(MetricParams::manual(
        percent_to_fraction("Start", record.initial_number_value.as_deref())?,
        percent_to_fraction("Progress %", record.current_number_value.as_deref())?,
        percent_to_fraction("Target", record.target_number_value.as_deref())?,
    ))
}

/// `45` → `0.45`.
pub fn percent_to_fraction(field: &str, value: Option<&str>) -> Result<f64> {
    let raw = value.ok_or_else(|| MigratorError::validation(field, "value is missing"))?;
    let percent: f64 = raw.trim().parse().map_err(|_| {
        MigratorError::validation(field, format!("'{}' is not a number", raw))
    })?;
    Ok(percent / 100.0)
}

/// Status update body, or `None` when the label is absent or unknown.
pub fn status_update_params(
    goal_gid: &str,
    status: Option<&str>,
    timestamp: Option<&str>,
    notes: Option<&str>,
) -> Option<StatusUpdateParams> {
    let label = StatusLabel::parse(status?)?;
    let timestamp = timestamp.unwrap_or_default();
    Some(StatusUpdateParams {
        parent: goal_gid.to_string(),
        status_type: label.status_update_type(),
        text: ReferenceCodec::checkin_text(timestamp, notes.unwrap_or_default()),
        title: format!("Status Update: {} - {}", label, timestamp),
    })
}
