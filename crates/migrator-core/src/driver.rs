//! Migration driver.
//!
//! Walks the goals export in file order. Each row is synchronized (or reused
//! if a child already pulled it in as a parent), linked to its parent, and
//! then recorded in the ledger. The first error aborts the run; rows already
//! in the ledger stay there, so a re-run picks up where this one stopped.

use crate::alignment::AlignmentLinker;
use crate::config::CsvSchema;
use crate::ledger::{ProcessedEntry, ProcessedLedger};
use crate::mapper::{map_row, GoalSheet};
use crate::repository::GoalRepository;
use crate::session::MigrationContext;
use crate::sync::{GoalSynchronizer, SyncOutcome};
use crate::Result;
use tracing::{debug, info, warn};

/// Run-wide switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationOptions {
    /// Skip rows whose goal id is already in the ledger.
    pub skip_processed: bool,
}

impl Default for MigrationOptions {
    fn default() -> Self {
        Self {
            skip_processed: true,
        }
    }
}

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationSummary {
    /// Rows handled and written to the ledger.
    pub processed: usize,
    /// Rows skipped because the ledger already had them.
    pub skipped: usize,
    /// Goals created, including parents created through alignment.
    pub created: usize,
    /// Existing goals updated, including parents.
    pub updated: usize,
    /// Rows whose goal had already been synchronized as a parent.
    pub reused: usize,
    /// Supporting relationships added.
    pub linked: usize,
    /// Reused rows whose cells differ from the row that was synchronized.
    pub conflicts: usize,
}

impl MigrationSummary {
    fn record(&mut self, outcome: SyncOutcome) {
        match outcome {
            SyncOutcome::Created => self.created += 1,
            SyncOutcome::Updated => self.updated += 1,
        }
    }
}

/// Drives one migration run over a goals export.
pub struct Migrator<'a, R: GoalRepository + ?Sized> {
    repo: &'a R,
    sheet: &'a GoalSheet,
    ledger: ProcessedLedger,
    ctx: MigrationContext,
    options: MigrationOptions,
}

impl<'a, R: GoalRepository + ?Sized> Migrator<'a, R> {
    pub fn new(
        repo: &'a R,
        sheet: &'a GoalSheet,
        ledger: ProcessedLedger,
        ctx: MigrationContext,
        options: MigrationOptions,
    ) -> Self {
        Self {
            repo,
            sheet,
            ledger,
            ctx,
            options,
        }
    }

    pub fn context(&self) -> &MigrationContext {
        &self.ctx
    }

    pub fn ledger(&self) -> &ProcessedLedger {
        &self.ledger
    }

    /// Process every goal row.
    pub async fn run(&mut self) -> Result<MigrationSummary> {
        info!("Beginning migration of {} goals", self.sheet.goal_count());
        if self.options.skip_processed {
            info!(
                "Ignoring previously processed goals. See {} for more information.",
                self.ledger.path().display()
            );
        } else {
            info!("Processing all goals, including previously processed ones.");
        }

        let sheet = self.sheet;
        let synchronizer = GoalSynchronizer::new(self.repo);
        let linker = AlignmentLinker::new(self.repo, sheet);
        let mut summary = MigrationSummary::default();

        for row in sheet.rows().iter().filter(|row| !row.is_header()) {
            if self.options.skip_processed {
                if let Some(goal_id) = row.get(CsvSchema::ID).map(str::trim) {
                    if self.ledger.contains(goal_id) {
                        info!("Skipping goal ID: {}", goal_id);
                        summary.skipped += 1;
                        continue;
                    }
                }
            }

            info!("Processing goal index: {}", row.index);
            let record = map_row(row)?;

            let memoized = self.ctx.processed_gid(&record.id).map(str::to_string);
            let gid = match memoized {
                Some(gid) => {
                    debug!("Goal {} was already synchronized as {}", record.id, gid);
                    if let Some(synced_row) = sheet.find_by_id(&record.id) {
                        if synced_row.index != row.index && !synced_row.same_cells(row) {
                            warn!(
                                "Goal {} at index {} differs from index {}, which was synchronized; its changes are not applied",
                                record.id, row.index, synced_row.index
                            );
                            summary.conflicts += 1;
                        }
                    }
                    summary.reused += 1;
                    gid
                }
                None => {
                    let synced = synchronizer.sync(&mut self.ctx, &record).await?;
                    self.ctx.mark_processed(&record.id, &synced.gid);
                    summary.record(synced.outcome);
                    synced.gid
                }
            };

            if let Some(parent) = linker.link(&mut self.ctx, &record, &gid).await? {
                if let Some(outcome) = parent.outcome {
                    summary.record(outcome);
                }
                summary.linked += 1;
            }

            self.ledger
                .append(&ProcessedEntry::new(row.index, &record.id, &gid))?;
            summary.processed += 1;
        }

        info!(
            "COMPLETE: processed {}, skipped {}, created {}, updated {}, linked {}",
            summary.processed, summary.skipped, summary.created, summary.updated, summary.linked
        );
        if summary.conflicts > 0 {
            warn!(
                "{} rows repeated an already synchronized goal id with different content",
                summary.conflicts
            );
        }
        Ok(summary)
    }
}
