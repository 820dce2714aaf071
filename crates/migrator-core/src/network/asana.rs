//! Asana implementation of [`GoalRepository`].
//!
//! API reference: <https://developers.asana.com/reference>

use crate::config::MigratorConfig;
use crate::models::{
    GoalParams, GoalPatch, MetricParams, ObjectRef, RemoteGoal, StatusUpdateParams,
    SupportingRelationshipParams, TimePeriod, WorkspaceUser,
};
use crate::network::client::HttpClient;
use crate::network::retry::RetryConfig;
use crate::repository::GoalRepository;
use crate::Result;
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, info};

/// Asana client scoped to one workspace.
pub struct AsanaClient {
    http: HttpClient,
    workspace_gid: String,
}

impl AsanaClient {
    /// Create a client from runtime configuration.
    pub fn new(config: &MigratorConfig) -> Result<Self> {
        let http = HttpClient::new(&config.base_url, &config.token)?;
        info!("Authenticated Asana client for workspace {}", config.workspace_gid);
        Ok(Self {
            http,
            workspace_gid: config.workspace_gid.clone(),
        })
    }

    /// Replace the retry policy used for every request.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.http = self.http.with_retry(retry);
        self
    }

    pub fn workspace_gid(&self) -> &str {
        &self.workspace_gid
    }

    fn workspace_query(&self) -> (&'static str, String) {
        ("workspace", self.workspace_gid.clone())
    }
}

#[async_trait]
impl GoalRepository for AsanaClient {
    async fn list_goals(&self) -> Result<Vec<RemoteGoal>> {
        let goals: Vec<RemoteGoal> = self
            .http
            .get_all(
                "/goals",
                &[self.workspace_query(), ("opt_fields", "notes".to_string())],
            )
            .await?;
        info!("Fetched {} existing goals", goals.len());
        Ok(goals)
    }

    async fn list_users(&self) -> Result<Vec<WorkspaceUser>> {
        let users: Vec<WorkspaceUser> = self
            .http
            .get_all(
                "/users",
                &[
                    self.workspace_query(),
                    ("opt_fields", "gid,email,name".to_string()),
                ],
            )
            .await?;
        info!("Fetched {} workspace users", users.len());
        Ok(users)
    }

    async fn list_time_periods(&self) -> Result<Vec<TimePeriod>> {
        let periods: Vec<TimePeriod> = self
            .http
            .get_all(
                "/time_periods",
                &[
                    self.workspace_query(),
                    (
                        "opt_fields",
                        "display_name,start_on,end_on".to_string(),
                    ),
                ],
            )
            .await?;
        info!("Fetched {} time periods", periods.len());
        Ok(periods)
    }

    async fn create_goal(&self, params: &GoalParams) -> Result<String> {
        let created: ObjectRef = self.http.send_data(Method::POST, "/goals", params).await?;
        info!("Created goal {}", created.gid);
        Ok(created.gid)
    }

    async fn update_goal(&self, goal_gid: &str, params: &GoalParams) -> Result<String> {
        let path = format!("/goals/{}", goal_gid);
        let updated: ObjectRef = self.http.send_data(Method::PUT, &path, params).await?;
        info!("Updated goal {}", updated.gid);
        Ok(updated.gid)
    }

    async fn patch_goal(&self, goal_gid: &str, patch: &GoalPatch) -> Result<String> {
        let path = format!("/goals/{}", goal_gid);
        let updated: ObjectRef = self.http.send_data(Method::PUT, &path, patch).await?;
        debug!("Patched goal {} with {:?}", updated.gid, patch);
        Ok(updated.gid)
    }

    async fn set_goal_metric(&self, goal_gid: &str, params: &MetricParams) -> Result<()> {
        let path = format!("/goals/{}/setMetric", goal_gid);
        let _: Value = self.http.send_data(Method::POST, &path, params).await?;
        debug!("Set {:?} metric on goal {}", params.progress_source, goal_gid);
        Ok(())
    }

    async fn create_status_update(&self, params: &StatusUpdateParams) -> Result<String> {
        let created: ObjectRef = self
            .http
            .send_data(Method::POST, "/status_updates", params)
            .await?;
        debug!("Created status update {} on goal {}", created.gid, params.parent);
        Ok(created.gid)
    }

    async fn add_supporting_relationship(
        &self,
        parent_gid: &str,
        params: &SupportingRelationshipParams,
    ) -> Result<()> {
        let path = format!("/goals/{}/addSupportingRelationship", parent_gid);
        let _: Value = self.http.send_data(Method::POST, &path, params).await?;
        Ok(())
    }
}
