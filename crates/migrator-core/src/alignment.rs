//! Parent/child goal linking.

use crate::config::CsvSchema;
use crate::mapper::{map_row, GoalSheet};
use crate::models::SupportingRelationshipParams;
use crate::record::GoalRecord;
use crate::repository::GoalRepository;
use crate::session::MigrationContext;
use crate::sync::{GoalSynchronizer, SyncOutcome};
use crate::Result;
use tracing::{debug, info, warn};

/// Contribution weight of every supporting relationship.
pub const CONTRIBUTION_WEIGHT: u32 = 1;

/// Result of linking a child to its parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedParent {
    pub goal_id: String,
    pub gid: String,
    /// `Some` when the parent was synchronized by this call rather than
    /// reused from earlier in the run.
    pub outcome: Option<SyncOutcome>,
}

/// Links goals to the parent named in their `Aligned To` cell.
pub struct AlignmentLinker<'a, R: GoalRepository + ?Sized> {
    repo: &'a R,
    sheet: &'a GoalSheet,
}

impl<'a, R: GoalRepository + ?Sized> AlignmentLinker<'a, R> {
    pub fn new(repo: &'a R, sheet: &'a GoalSheet) -> Self {
        Self { repo, sheet }
    }

    /// Synchronize the child's parent (once per run) and make the child
    /// support it.
    ///
    /// Returns `None` when the child has no resolvable parent row.
    pub async fn link(
        &self,
        ctx: &mut MigrationContext,
        child: &GoalRecord,
        child_gid: &str,
    ) -> Result<Option<LinkedParent>> {
        let Some(alignment) = child.alignment() else {
            if child.has_alignment() {
                warn!(
                    "Goal {} has alignment text without a goal id: {:?}",
                    child.id, child.aligned_to
                );
            }
            return Ok(None);
        };

        let Some(parent_row) = self.sheet.find_by_id(&alignment.goal_id) else {
            warn!(
                "Goal {} is aligned to {}, which is not in the export",
                child.id, alignment.goal_id
            );
            return Ok(None);
        };
        debug!(
            "Goal {} supports {} with weight {:?}",
            child.id, alignment.goal_id, alignment.weight
        );

        let synchronizer = GoalSynchronizer::new(self.repo);
        let memoized = ctx.processed_gid(&alignment.goal_id).map(str::to_string);
        let (parent_gid, outcome) = match memoized {
            Some(gid) => (gid, None),
            None => {
                let parent = map_row(parent_row)?;
                let synced = synchronizer.sync(ctx, &parent).await?;
                ctx.mark_processed(&parent.id, &synced.gid);
                (synced.gid, Some(synced.outcome))
            }
        };

        if parent_row.get(CsvSchema::ALIGNED_TO).is_some() {
            synchronizer.force_subgoal_progress(&parent_gid).await?;
        }

        info!(
            "Linking child goal <{}> to parent goal <{}>",
            child_gid, parent_gid
        );
        let params = SupportingRelationshipParams {
            supporting_resource: child_gid.to_string(),
            contribution_weight: CONTRIBUTION_WEIGHT,
        };
        self.repo
            .add_supporting_relationship(&parent_gid, &params)
            .await?;

        Ok(Some(LinkedParent {
            goal_id: alignment.goal_id,
            gid: parent_gid,
            outcome,
        }))
    }
}
