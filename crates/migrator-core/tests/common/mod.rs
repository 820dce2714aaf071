//! Shared fixtures for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use goal_migrator::models::{
    GoalParams, GoalPatch, MetricParams, RemoteGoal, StatusUpdateParams,
    SupportingRelationshipParams, TimePeriod, WorkspaceUser,
};
use goal_migrator::{CsvSchema, GoalRepository, GoalRow, GoalSheet, Result};
use std::sync::Mutex;

/// One call made against the fake repository.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateGoal(GoalParams),
    UpdateGoal(String, GoalParams),
    PatchGoal(String, GoalPatch),
    SetMetric(String, MetricParams),
    StatusUpdate(StatusUpdateParams),
    AddSupporting(String, SupportingRelationshipParams),
}

#[derive(Debug, Default)]
struct State {
    goals: Vec<RemoteGoal>,
    next_gid: u64,
    calls: Vec<Call>,
    list_calls: usize,
}

/// In-memory workspace that records every mutating call.
#[derive(Debug, Default)]
pub struct FakeRepository {
    users: Vec<WorkspaceUser>,
    time_periods: Vec<TimePeriod>,
    state: Mutex<State>,
}

impl FakeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(mut self, users: Vec<WorkspaceUser>) -> Self {
        self.users = users;
        self
    }

    pub fn with_time_periods(mut self, periods: Vec<TimePeriod>) -> Self {
        self.time_periods = periods;
        self
    }

    pub fn with_goals(self, goals: Vec<RemoteGoal>) -> Self {
        self.state.lock().unwrap().goals = goals;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn list_calls(&self) -> usize {
        self.state.lock().unwrap().list_calls
    }

    pub fn created(&self) -> Vec<GoalParams> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::CreateGoal(params) => Some(params),
                _ => None,
            })
            .collect()
    }

    pub fn status_updates(&self) -> Vec<StatusUpdateParams> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::StatusUpdate(params) => Some(params),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl GoalRepository for FakeRepository {
    async fn list_goals(&self) -> Result<Vec<RemoteGoal>> {
        let mut state = self.state.lock().unwrap();
        state.list_calls += 1;
        Ok(state.goals.clone())
    }

    async fn list_users(&self) -> Result<Vec<WorkspaceUser>> {
        self.state.lock().unwrap().list_calls += 1;
        Ok(self.users.clone())
    }

    async fn list_time_periods(&self) -> Result<Vec<TimePeriod>> {
        self.state.lock().unwrap().list_calls += 1;
        Ok(self.time_periods.clone())
    }

    async fn create_goal(&self, params: &GoalParams) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        state.next_gid += 1;
        let gid = format!("g{}", state.next_gid);
        state.goals.push(RemoteGoal {
            gid: gid.clone(),
            notes: Some(params.notes.clone()),
        });
        state.calls.push(Call::CreateGoal(params.clone()));
        Ok(gid)
    }

    async fn update_goal(&self, goal_gid: &str, params: &GoalParams) -> Result<String> {
        self.record(Call::UpdateGoal(goal_gid.to_string(), params.clone()));
        Ok(goal_gid.to_string())
    }

    async fn patch_goal(&self, goal_gid: &str, patch: &GoalPatch) -> Result<String> {
        self.record(Call::PatchGoal(goal_gid.to_string(), patch.clone()));
        Ok(goal_gid.to_string())
    }

    async fn set_goal_metric(&self, goal_gid: &str, params: &MetricParams) -> Result<()> {
        self.record(Call::SetMetric(goal_gid.to_string(), params.clone()));
        Ok(())
    }

    async fn create_status_update(&self, params: &StatusUpdateParams) -> Result<String> {
        self.record(Call::StatusUpdate(params.clone()));
        Ok(format!("s-{}", params.parent))
    }

    async fn add_supporting_relationship(
        &self,
        parent_gid: &str,
        params: &SupportingRelationshipParams,
    ) -> Result<()> {
        self.record(Call::AddSupporting(parent_gid.to_string(), params.clone()));
        Ok(())
    }
}

pub fn user(gid: &str, email: &str) -> WorkspaceUser {
    WorkspaceUser {
        gid: gid.into(),
        email: Some(email.into()),
        name: None,
    }
}

/// A schema-width row with the named cells filled in.
pub fn row(index: usize, pairs: &[(&str, &str)]) -> GoalRow {
    let mut cells = vec![String::new(); CsvSchema::COLUMN_NAMES.len()];
    for (column, value) in pairs {
        let pos = CsvSchema::position(column).expect("schema column");
        cells[pos] = value.to_string();
    }
    GoalRow::new(index, cells)
}

/// A sheet with the export header at index 0 followed by `rows`.
pub fn sheet(rows: Vec<Vec<(&str, &str)>>) -> GoalSheet {
    let mut all = vec![GoalRow::new(0, CsvSchema::COLUMN_NAMES)];
    for (i, pairs) in rows.iter().enumerate() {
        all.push(row(i + 1, pairs));
    }
    GoalSheet::from_rows(all)
}
