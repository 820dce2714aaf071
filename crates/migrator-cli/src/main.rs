//! Goal Migrator CLI - migrates a goals CSV export into an Asana workspace.
//!
//! Credentials come from the environment (or a `.env` file):
//! `ASANA_TOKEN`, `WORKSPACE_GID` and `SUPER_ADMIN_GID`.

mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use goal_migrator::{
    AsanaClient, GoalSheet, MemberDirectory, MigrationContext, MigrationOptions, Migrator,
    MigratorConfig, PathsConfig, ProcessedLedger,
};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "goal-migrator")]
#[command(about = "Migrate goals from a CSV export into Asana")]
struct Args {
    /// Process every goal, including ones already in the ledger
    #[arg(short, long)]
    all: bool,

    /// Goals export
    #[arg(long, default_value = PathsConfig::GOALS_CSV)]
    goals: PathBuf,

    /// Organization members export (Name, Email Address)
    #[arg(long, default_value = PathsConfig::MEMBERS_CSV)]
    members: PathBuf,

    /// Ledger of processed goals
    #[arg(long, default_value = PathsConfig::LEDGER_CSV)]
    ledger: PathBuf,

    /// Directory for per-run log files
    #[arg(long, default_value = PathsConfig::LOGS_DIR)]
    log_dir: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

impl Args {
    fn options(&self) -> MigrationOptions {
        MigrationOptions {
            skip_processed: !self.all,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // A missing .env is fine; variables may already be exported
    let dotenv = dotenvy::dotenv().ok();

    let (_guard, log_path) = logging::init(&args.log_dir, args.debug)?;
    info!("Beginning main execution of goals migrator");
    info!("Logging to {}", log_path.display());
    if let Some(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }
    info!("skip_processed flag set to: {}", !args.all);

    if let Err(e) = run(&args).await {
        error!("Migration failed: {:#}", e);
        return Err(e);
    }
    Ok(())
}

async fn run(args: &Args) -> Result<()> {
    let config = MigratorConfig::from_env().context("Invalid configuration")?;
    info!("Using Asana API at {}", config.base_url);

    let sheet = GoalSheet::load(&args.goals)
        .with_context(|| format!("Failed to read goals from {}", args.goals.display()))?;
    let members = MemberDirectory::load(&args.members)
        .with_context(|| format!("Failed to read members from {}", args.members.display()))?;
    let ledger = ProcessedLedger::open_or_create(&args.ledger)
        .with_context(|| format!("Failed to open ledger {}", args.ledger.display()))?;

    let client = AsanaClient::new(&config)?;
    let ctx = MigrationContext::load(&client, config.workspace_settings(), &members)
        .await
        .context("Failed to load workspace state")?;

    let mut migrator = Migrator::new(&client, &sheet, ledger, ctx, args.options());
    let summary = migrator.run().await?;

    info!(
        "COMPLETE: Finished main execution of goals migrator ({} processed, {} skipped, {} created, {} updated)",
        summary.processed, summary.skipped, summary.created, summary.updated
    );
    Ok(())
}
