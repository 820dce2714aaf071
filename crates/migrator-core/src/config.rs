//! Centralized configuration for the goal migrator.
//!
//! Constant groups cover the Asana API, default file locations and the fixed
//! CSV schema. [`MigratorConfig`] carries the runtime credentials read from
//! the environment.

use crate::session::WorkspaceSettings;
use crate::{MigratorError, Result};
use std::time::Duration;

/// Network-related configuration.
pub struct NetworkConfig;

impl NetworkConfig {
    pub const ASANA_API_BASE: &'static str = "https://app.asana.com/api/1.0";
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
    pub const PAGE_LIMIT: u32 = 100;
    pub const MAX_RETRIES: u32 = 3;
    pub const RETRY_BASE_DELAY: Duration = Duration::from_secs(1);
    pub const RETRY_MAX_DELAY: Duration = Duration::from_secs(60);
    pub const USER_AGENT: &'static str = "goal-migrator/0.1";
}

/// Default file locations, relative to the working directory.
pub struct PathsConfig;

impl PathsConfig {
    pub const GOALS_CSV: &'static str = "./goals.csv";
    pub const MEMBERS_CSV: &'static str = "./members.csv";
    pub const LEDGER_CSV: &'static str = "./goals_processed.csv";
    pub const LOGS_DIR: &'static str = "./output_logs";
    /// chrono format string for the per-run log file.
    pub const LOG_FILE_FORMAT: &'static str = "logs_%H_%M_%d_%m_%Y.log";
}

/// Fixed positional schema of the goals export.
///
/// The export's own header row is not trusted: trailing check-in columns have
/// no names, so cells are addressed by position against these names.
pub struct CsvSchema;

impl CsvSchema {
    pub const COLUMN_NAMES: [&'static str; 37] = [
        "Id",
        "Title",
        "Tag",
        "OKR type",
        "Type name",
        "Creator",
        "Owner",
        "Period",
        "Start Date",
        "End Date",
        "Description",
        "Aligned To (weight, Objective ID)",
        "Metric Name",
        "Target",
        "Object Type",
        "Goal Type",
        "Start",
        "Created At",
        "Last Check-in",
        "Progress %",
        "Status",
        "Last Check-in Note",
        "Score",
        "Checkins",
        "Blank 1",
        "Blank 2",
        "Blank 3",
        "Blank 4",
        "Blank 5",
        "Blank 6",
        "Blank 7",
        "Blank 8",
        "Blank 9",
        "Blank 10",
        "Blank 11",
        "Blank 12",
        "Blank 13",
    ];

    pub const ID: &'static str = "Id";
    pub const TITLE: &'static str = "Title";
    pub const OKR_TYPE: &'static str = "OKR type";
    pub const CREATOR: &'static str = "Creator";
    pub const PERIOD: &'static str = "Period";
    pub const START_DATE: &'static str = "Start Date";
    pub const END_DATE: &'static str = "End Date";
    pub const DESCRIPTION: &'static str = "Description";
    pub const ALIGNED_TO: &'static str = "Aligned To (weight, Objective ID)";
    pub const TARGET: &'static str = "Target";
    pub const START: &'static str = "Start";
    pub const LAST_CHECKIN: &'static str = "Last Check-in";
    pub const PROGRESS: &'static str = "Progress %";
    pub const STATUS: &'static str = "Status";
    pub const LAST_CHECKIN_NOTE: &'static str = "Last Check-in Note";
    /// First column of the variable-length check-in history.
    pub const CHECKINS_MARKER: &'static str = "Checkins";

    /// Members export columns.
    pub const MEMBER_NAME: &'static str = "Name";
    pub const MEMBER_EMAIL: &'static str = "Email Address";

    /// Position of a named column, if it is part of the schema.
    pub fn position(column: &str) -> Option<usize> {
        Self::COLUMN_NAMES.iter().position(|name| *name == column)
    }
}

/// Environment variable names.
pub struct EnvVars;

impl EnvVars {
    pub const TOKEN: &'static str = "ASANA_TOKEN";
    pub const WORKSPACE_GID: &'static str = "WORKSPACE_GID";
    pub const SUPER_ADMIN_GID: &'static str = "SUPER_ADMIN_GID";
    pub const BASE_URL: &'static str = "ASANA_BASE_URL";
}

/// Runtime settings for one migration run.
#[derive(Clone)]
pub struct MigratorConfig {
    /// Personal access token of the super admin or service account.
    pub token: String,
    pub workspace_gid: String,
    /// Account that initially owns every created goal.
    pub super_admin_gid: String,
    pub base_url: String,
}

impl MigratorConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary lookup function.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str, what: &str, example: &str| -> Result<String> {
            match lookup(key).filter(|v| !v.trim().is_empty()) {
                Some(value) => Ok(value),
                None => Err(MigratorError::Config {
                    message: format!(
                        "Missing {key}. Please add {what} to the environment variables.\n    > Example: \"export {key}={example}\""
                    ),
                }),
            }
        };

        let token = required(
            EnvVars::TOKEN,
            "the token for the super admin or service account",
            "1/1000000000000001:e123abc456def789ghi1011jklmn01",
        )?;
        let workspace_gid = required(
            EnvVars::WORKSPACE_GID,
            "the GID for the workspace",
            "1001234567890000",
        )?;
        let super_admin_gid = required(
            EnvVars::SUPER_ADMIN_GID,
            "the GID for the super admin or service account",
            "1001234567890000",
        )?;

        let base_url = lookup(EnvVars::BASE_URL)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| NetworkConfig::ASANA_API_BASE.to_string());
        url::Url::parse(&base_url).map_err(|e| MigratorError::Config {
            message: format!("Invalid {} '{}': {}", EnvVars::BASE_URL, base_url, e),
        })?;

        Ok(Self {
            token,
            workspace_gid,
            super_admin_gid,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Workspace identifiers for the migration session.
    pub fn workspace_settings(&self) -> WorkspaceSettings {
        WorkspaceSettings {
            workspace_gid: self.workspace_gid.clone(),
            super_admin_gid: self.super_admin_gid.clone(),
        }
    }
}

impl std::fmt::Debug for MigratorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MigratorConfig")
            .field("token", &"<redacted>")
            .field("workspace_gid", &self.workspace_gid)
            .field("super_admin_gid", &self.super_admin_gid)
            .field("base_url", &self.base_url)
            .finish()
    }
}
