//! Goal Migrator - moves OKR goals from a CSV export into Asana.
//!
//! The library reads a goals export and a members export, then creates or
//! updates one Asana goal per row. Along the way it replays check-in history
//! as status updates, reassigns owners, sets progress metrics and links each
//! goal to the parent it is aligned to. Remote goals carry a reference tag in
//! their notes, so re-running the migration updates goals instead of
//! duplicating them.
//!
//! # Example
//!
//! ```rust,ignore
//! use goal_migrator::{
//!     AsanaClient, GoalSheet, MemberDirectory, MigrationContext, MigrationOptions,
//!     MigratorConfig, Migrator, ProcessedLedger, WorkspaceSettings,
//! };
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> goal_migrator::Result<()> {
//!     let config = MigratorConfig::from_env()?;
//!     let client = AsanaClient::new(&config)?;
//!
//!     let sheet = GoalSheet::load(Path::new("./goals.csv"))?;
//!     let members = MemberDirectory::load(Path::new("./members.csv"))?;
//!     let ledger = ProcessedLedger::open_or_create(Path::new("./goals_processed.csv"))?;
//!     let ctx = MigrationContext::load(&client, config.workspace_settings(), &members).await?;
//!
//!     let summary = Migrator::new(&client, &sheet, ledger, ctx, MigrationOptions::default())
//!         .run()
//!         .await?;
//!     println!("Migrated {} goals", summary.processed);
//!     Ok(())
//! }
//! ```

pub mod alignment;
pub mod config;
pub mod driver;
pub mod error;
pub mod ledger;
pub mod mapper;
pub mod members;
pub mod models;
pub mod network;
pub mod parsers;
pub mod record;
pub mod reference;
pub mod repository;
pub mod session;
pub mod status;
pub mod sync;
pub mod time_period;

// Re-export commonly used types
pub use alignment::{AlignmentLinker, LinkedParent};
pub use config::{CsvSchema, MigratorConfig, NetworkConfig, PathsConfig};
pub use driver::{MigrationOptions, MigrationSummary, Migrator};
pub use error::{MigratorError, Result};
pub use ledger::{ProcessedEntry, ProcessedLedger};
pub use mapper::{map_row, GoalRow, GoalSheet};
pub use members::{MemberDirectory, OwnerDirectory};
pub use network::{AsanaClient, HttpClient, RetryConfig};
pub use record::{AlignmentRef, Checkins, GoalRecord, MAX_CHECKINS};
pub use reference::ReferenceCodec;
pub use repository::GoalRepository;
pub use session::{MigrationContext, WorkspaceSettings};
pub use status::{GoalStatus, StatusLabel, StatusUpdateType};
pub use sync::{GoalSynchronizer, SyncOutcome, SyncedGoal};
