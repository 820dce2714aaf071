//! Goal owner resolution.
//!
//! The export names owners by display name. The members export maps names to
//! email addresses, and the workspace user list maps emails to user gids.
//! [`OwnerDirectory`] joins the two once at startup.

use crate::config::CsvSchema;
use crate::models::WorkspaceUser;
use crate::{MigratorError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct MemberRow {
    #[serde(rename = "Name", default)]
    name: Option<String>,
    #[serde(rename = "Email Address", default)]
    email: Option<String>,
}

/// Display name → email, from the organization members export.
#[derive(Debug, Clone, Default)]
pub struct MemberDirectory {
    emails: HashMap<String, String>,
}

impl MemberDirectory {
    /// Read a members export (`Name`, `Email Address`; other columns ignored).
    pub fn load(path: &Path) -> Result<Self> {
        let reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(|e| MigratorError::csv_with_path(e, path))?;
        let directory =
            Self::from_reader(reader).map_err(|e| match e {
                MigratorError::Csv { source: Some(source), .. } => {
                    MigratorError::csv_with_path(source, path)
                }
                other => other,
            })?;
        info!("Loaded {} members from {}", directory.len(), path.display());
        Ok(directory)
    }

    /// Read a members export from a CSV reader with headers.
    pub fn from_reader<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Self> {
        let headers = reader.headers()?.clone();
        for column in [CsvSchema::MEMBER_NAME, CsvSchema::MEMBER_EMAIL] {
            if !headers.iter().any(|h| h == column) {
                return Err(MigratorError::validation(
                    column,
                    "members export is missing this column",
                ));
            }
        }

        let mut pairs = Vec::new();
        for row in reader.deserialize::<MemberRow>() {
            let row = row?;
            if let (Some(name), Some(email)) = (row.name, row.email) {
                pairs.push((name, email));
            }
        }
        Ok(Self::from_pairs(pairs))
    }

    /// Build from `(name, email)` pairs; the first email for a name wins.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut emails = HashMap::new();
        for (name, email) in pairs {
            let name = name.trim().to_string();
            let email = email.trim().to_string();
            if name.is_empty() || email.is_empty() {
                continue;
            }
            emails.entry(name).or_insert(email);
        }
        Self { emails }
    }

    pub fn email_for(&self, name: &str) -> Option<&str> {
        self.emails.get(name.trim()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

/// Display name → workspace user gid.
#[derive(Debug, Clone, Default)]
pub struct OwnerDirectory {
    owners: HashMap<String, String>,
}

impl OwnerDirectory {
    /// Join members to workspace users by email (case-insensitive).
    pub fn build(members: &MemberDirectory, users: &[WorkspaceUser]) -> Self {
        let by_email: HashMap<String, &str> = users
            .iter()
            .filter_map(|user| {
                user.email
                    .as_deref()
                    .map(|email| (email.to_ascii_lowercase(), user.gid.as_str()))
            })
            .collect();

        let mut owners = HashMap::new();
        for (name, email) in &members.emails {
            match by_email.get(&email.to_ascii_lowercase()) {
                Some(gid) => {
                    owners.insert(name.clone(), gid.to_string());
                }
                None => debug!("Member {} <{}> is not a workspace user", name, email),
            }
        }
        info!("Mapped {} of {} members to workspace users", owners.len(), members.len());
        Self { owners }
    }

    /// User gid for an owner display name.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.owners.get(name.trim()).map(String::as_str)
    }
}
