//! End-to-end migration runs against an in-memory workspace.

mod common;

use common::{sheet, user, Call, FakeRepository};
use goal_migrator::models::{GoalPatch, MetricParams, ProgressSource, RemoteGoal, TimePeriod};
use goal_migrator::{
    GoalSheet, GoalStatus, MemberDirectory, MigrationContext, MigrationOptions, MigrationSummary,
    Migrator, MigratorError, ProcessedLedger, StatusUpdateType, WorkspaceSettings,
};
use std::path::Path;
use tempfile::TempDir;

fn settings() -> WorkspaceSettings {
    WorkspaceSettings {
        workspace_gid: "11".into(),
        super_admin_gid: "99".into(),
    }
}

fn members() -> MemberDirectory {
    MemberDirectory::from_pairs(vec![(
        "Jane Doe".to_string(),
        "jane@example.com".to_string(),
    )])
}

async fn migrate(
    repo: &FakeRepository,
    sheet: &GoalSheet,
    ledger_path: &Path,
    options: MigrationOptions,
) -> goal_migrator::Result<MigrationSummary> {
    let ledger = ProcessedLedger::open_or_create(ledger_path)?;
    let ctx = MigrationContext::load(repo, settings(), &members()).await?;
    Migrator::new(repo, sheet, ledger, ctx, options).run().await
}

fn checkin(date: &str, status: &str, note: &str) -> String {
    format!(
        "[{} 10:00 UTC]\nStatus: {}\nNote: {}\nMetric Name: Revenue",
        date, status, note
    )
}

#[tokio::test]
async fn test_goal_created_with_admin_then_reassigned() {
    let temp_dir = TempDir::new().unwrap();
    let repo = FakeRepository::new()
        .with_users(vec![user("501", "jane@example.com"), user("502", "bob@example.com")])
        .with_time_periods(vec![TimePeriod {
            gid: "tp-q2".into(),
            display_name: Some("Q2 FY24".into()),
            start_on: Some("2024-04-01".into()),
            end_on: Some("2024-06-30".into()),
        }]);
    let sheet = sheet(vec![vec![
        ("Id", "42"),
        ("Title", "Grow revenue"),
        ("Creator", "Jane Doe"),
        ("Period", "Q2 2024"),
        ("Description", "Top line growth"),
    ]]);

    let summary = migrate(
        &repo,
        &sheet,
        &temp_dir.path().join("ledger.csv"),
        MigrationOptions::default(),
    )
    .await
    .unwrap();
    assert_eq!(summary.created, 1);
    assert_eq!(summary.processed, 1);

    let calls = repo.calls();
    assert_eq!(calls.len(), 2);
    let Call::CreateGoal(params) = &calls[0] else {
        panic!("expected create, got {:?}", calls[0]);
    };
    assert_eq!(params.owner, "99");
    assert_eq!(params.workspace, "11");
    assert_eq!(params.notes, "[Ref: Ally Id: 42]\n\nTop line growth");
    assert_eq!(params.time_period.as_deref(), Some("tp-q2"));
    assert!(!params.is_workspace_level);
    assert_eq!(
        calls[1],
        Call::PatchGoal(
            "g1".into(),
            GoalPatch {
                owner: Some("501".into()),
                status: None,
            }
        )
    );
}

#[tokio::test]
async fn test_unknown_owner_keeps_super_admin() {
    let temp_dir = TempDir::new().unwrap();
    let repo = FakeRepository::new();
    let sheet = sheet(vec![vec![("Id", "7"), ("Creator", "Ghost Writer")]]);

    migrate(
        &repo,
        &sheet,
        &temp_dir.path().join("ledger.csv"),
        MigrationOptions::default(),
    )
    .await
    .unwrap();

    let calls = repo.calls();
    assert_eq!(calls.len(), 1);
    assert!(matches!(&calls[0], Call::CreateGoal(p) if p.owner == "99"));
}

#[tokio::test]
async fn test_second_run_skips_ledger_rows() {
    let temp_dir = TempDir::new().unwrap();
    let ledger_path = temp_dir.path().join("goals_processed.csv");
    let repo = FakeRepository::new();
    let sheet = sheet(vec![
        vec![("Id", "1"), ("Title", "One")],
        vec![("Id", "2"), ("Title", "Two")],
    ]);

    let first = migrate(&repo, &sheet, &ledger_path, MigrationOptions::default())
        .await
        .unwrap();
    assert_eq!(first.created, 2);
    assert_eq!(
        std::fs::read_to_string(&ledger_path).unwrap(),
        "goal_index,goal_id,asana_goal_gid\n1,1,g1\n2,2,g2\n"
    );

    repo.clear_calls();
    let second = migrate(&repo, &sheet, &ledger_path, MigrationOptions::default())
        .await
        .unwrap();
    assert_eq!(second.skipped, 2);
    assert_eq!(second.processed, 0);
    assert!(repo.calls().is_empty());
}

#[tokio::test]
async fn test_full_rerun_updates_without_history() {
    let temp_dir = TempDir::new().unwrap();
    let ledger_path = temp_dir.path().join("goals_processed.csv");
    let repo = FakeRepository::new();
    let sheet = sheet(vec![vec![
        ("Id", "1"),
        ("Title", "One"),
        ("Checkins", checkin("2024-02-01", "On Track", "fine").as_str()),
    ]]);

    migrate(&repo, &sheet, &ledger_path, MigrationOptions::default())
        .await
        .unwrap();
    assert_eq!(repo.status_updates().len(), 1);

    repo.clear_calls();
    let summary = migrate(
        &repo,
        &sheet,
        &ledger_path,
        MigrationOptions {
            skip_processed: false,
        },
    )
    .await
    .unwrap();
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.created, 0);

    let calls = repo.calls();
    assert_eq!(calls.len(), 1);
    assert!(matches!(&calls[0], Call::UpdateGoal(gid, _) if gid == "g1"));
}

#[tokio::test]
async fn test_existing_remote_goal_is_updated() {
    let temp_dir = TempDir::new().unwrap();
    let repo = FakeRepository::new().with_goals(vec![
        RemoteGoal {
            gid: "r-1".into(),
            notes: None,
        },
        RemoteGoal {
            gid: "r-5".into(),
            notes: Some("[Ref: Ally Id: 5]\n\nold text".into()),
        },
    ]);
    let sheet = sheet(vec![vec![("Id", "5"), ("Title", "Five"), ("Description", "new text")]]);

    let summary = migrate(
        &repo,
        &sheet,
        &temp_dir.path().join("ledger.csv"),
        MigrationOptions::default(),
    )
    .await
    .unwrap();
    assert_eq!(summary.updated, 1);

    let calls = repo.calls();
    assert_eq!(calls.len(), 1);
    let Call::UpdateGoal(gid, params) = &calls[0] else {
        panic!("expected update, got {:?}", calls[0]);
    };
    assert_eq!(gid, "r-5");
    assert_eq!(params.notes, "[Ref: Ally Id: 5]\n\nnew text");
}

#[tokio::test]
async fn test_parent_synchronized_once_per_run() {
    let temp_dir = TempDir::new().unwrap();
    let ledger_path = temp_dir.path().join("ledger.csv");
    let repo = FakeRepository::new();
    let sheet = sheet(vec![
        vec![("Id", "2"), ("Title", "Child A"), ("Aligned To (weight, Objective ID)", "weight: 3, Id: 1")],
        vec![("Id", "3"), ("Title", "Child B"), ("Aligned To (weight, Objective ID)", "weight: 1, Id: 1")],
        vec![("Id", "1"), ("Title", "Parent")],
    ]);

    let summary = migrate(&repo, &sheet, &ledger_path, MigrationOptions::default())
        .await
        .unwrap();
    assert_eq!(summary.processed, 3);
    assert_eq!(summary.created, 3);
    assert_eq!(summary.reused, 1);
    assert_eq!(summary.linked, 2);

    let names: Vec<_> = repo
        .created()
        .into_iter()
        .filter_map(|params| params.name)
        .collect();
    assert_eq!(names, ["Child A", "Parent", "Child B"]);

    let links: Vec<_> = repo
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            Call::AddSupporting(parent, params) => {
                Some((parent, params.supporting_resource, params.contribution_weight))
            }
            _ => None,
        })
        .collect();
    assert_eq!(
        links,
        [
            ("g2".to_string(), "g1".to_string(), 1),
            ("g2".to_string(), "g3".to_string(), 1)
        ]
    );

    assert_eq!(
        std::fs::read_to_string(&ledger_path).unwrap(),
        "goal_index,goal_id,asana_goal_gid\n1,2,g1\n2,3,g3\n3,1,g2\n"
    );
}

#[tokio::test]
async fn test_parent_with_own_parent_gets_subgoal_metric() {
    let temp_dir = TempDir::new().unwrap();
    let repo = FakeRepository::new();
    let sheet = sheet(vec![
        vec![("Id", "3"), ("Aligned To (weight, Objective ID)", "weight: 1, Id: 2")],
        vec![("Id", "2"), ("Aligned To (weight, Objective ID)", "weight: 1, Id: 1")],
        vec![("Id", "1")],
    ]);

    migrate(
        &repo,
        &sheet,
        &temp_dir.path().join("ledger.csv"),
        MigrationOptions::default(),
    )
    .await
    .unwrap();

    let calls = repo.calls();
    let forced = calls
        .iter()
        .position(|call| *call == Call::SetMetric("g2".into(), MetricParams::subgoal_progress()))
        .expect("parent metric forced to sub-goal progress");
    let linked = calls
        .iter()
        .position(|call| matches!(call, Call::AddSupporting(parent, p) if parent == "g2" && p.supporting_resource == "g1"))
        .expect("child linked to parent");
    assert!(forced < linked);

    // The top-level goal has no parent of its own, so its metric is untouched
    assert!(!calls
        .iter()
        .any(|call| matches!(call, Call::SetMetric(gid, _) if gid == "g3")));
}

#[tokio::test]
async fn test_missing_parent_row_is_not_linked() {
    let temp_dir = TempDir::new().unwrap();
    let repo = FakeRepository::new();
    let sheet = sheet(vec![vec![
        ("Id", "2"),
        ("Aligned To (weight, Objective ID)", "weight: 1, Id: 900"),
        ("Start", "0"),
        ("Progress %", "45"),
        ("Target", "100"),
    ]]);

    let summary = migrate(
        &repo,
        &sheet,
        &temp_dir.path().join("ledger.csv"),
        MigrationOptions::default(),
    )
    .await
    .unwrap();
    assert_eq!(summary.linked, 0);
    assert_eq!(summary.processed, 1);

    let metric = repo
        .calls()
        .into_iter()
        .find_map(|call| match call {
            Call::SetMetric(_, metric) => Some(metric),
            _ => None,
        })
        .unwrap();
    assert_eq!(metric.progress_source, ProgressSource::Manual);
    assert_eq!(metric.initial_number_value, Some(0.0));
    assert_eq!(metric.current_number_value, Some(0.45));
    assert_eq!(metric.target_number_value, Some(1.0));
}

#[tokio::test]
async fn test_checkins_replayed_oldest_first() {
    let temp_dir = TempDir::new().unwrap();
    let repo = FakeRepository::new();
    let newest = checkin("2024-03-01", "Closed", "done");
    let unknown = checkin("2024-02-15", "Paused", "waiting");
    let middle = checkin("2024-02-01", "At Risk", "slipping");
    let oldest = checkin("2024-01-01", "On Track", "kickoff");
    let sheet = sheet(vec![vec![
        ("Id", "8"),
        ("Checkins", newest.as_str()),
        ("Blank 1", unknown.as_str()),
        ("Blank 2", middle.as_str()),
        ("Blank 4", oldest.as_str()),
        ("Last Check-in Note", "ignored when history exists"),
    ]]);

    migrate(
        &repo,
        &sheet,
        &temp_dir.path().join("ledger.csv"),
        MigrationOptions::default(),
    )
    .await
    .unwrap();

    let updates = repo.status_updates();
    let titles: Vec<_> = updates.iter().map(|u| u.title.as_str()).collect();
    assert_eq!(
        titles,
        [
            "Status Update: On Track - [2024-01-01 10:00 UTC]",
            "Status Update: At Risk - [2024-02-01 10:00 UTC]",
            "Status Update: Closed - [2024-03-01 10:00 UTC]",
        ]
    );
    assert_eq!(updates[2].status_type, StatusUpdateType::Achieved);
    assert!(updates.iter().all(|u| u.parent == "g1"));
    assert!(updates[0]
        .text
        .starts_with("[Ref: Ally Checkin Timestamp: [2024-01-01 10:00 UTC]]\n\nkickoff"));
}

#[tokio::test]
async fn test_last_checkin_used_when_no_history() {
    let temp_dir = TempDir::new().unwrap();
    let repo = FakeRepository::new();
    let sheet = sheet(vec![vec![
        ("Id", "9"),
        ("Status", "At Risk"),
        ("Last Check-in", "2024-05-01"),
        ("Last Check-in Note", "Needs help"),
    ]]);

    migrate(
        &repo,
        &sheet,
        &temp_dir.path().join("ledger.csv"),
        MigrationOptions::default(),
    )
    .await
    .unwrap();

    let updates = repo.status_updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].status_type, StatusUpdateType::AtRisk);
    assert_eq!(updates[0].title, "Status Update: At Risk - 2024-05-01");
    assert_eq!(
        updates[0].text,
        "[Ref: Ally Checkin Timestamp: 2024-05-01]\n\nNeeds help"
    );
}

#[tokio::test]
async fn test_status_field_set_after_metric() {
    let temp_dir = TempDir::new().unwrap();
    let repo = FakeRepository::new();
    let sheet = sheet(vec![
        vec![("Id", "1"), ("Progress %", "100"), ("Status", "Closed")],
        vec![("Id", "2"), ("Progress %", "10"), ("Status", "Paused")],
        vec![("Id", "3"), ("Status", "Behind")],
    ]);

    migrate(
        &repo,
        &sheet,
        &temp_dir.path().join("ledger.csv"),
        MigrationOptions::default(),
    )
    .await
    .unwrap();

    let calls = repo.calls();
    assert!(repo.status_updates().is_empty());
    assert_eq!(
        calls[1],
        Call::SetMetric("g1".into(), MetricParams::subgoal_progress())
    );
    assert_eq!(
        calls[2],
        Call::PatchGoal(
            "g1".into(),
            GoalPatch {
                owner: None,
                status: Some(GoalStatus::Achieved),
            }
        )
    );

    let patches = calls
        .iter()
        .filter(|call| matches!(call, Call::PatchGoal(..)))
        .count();
    assert_eq!(patches, 1);
}

#[tokio::test]
async fn test_invalid_row_aborts_run() {
    let temp_dir = TempDir::new().unwrap();
    let ledger_path = temp_dir.path().join("ledger.csv");
    let repo = FakeRepository::new();
    let sheet = sheet(vec![
        vec![("Id", "1")],
        vec![("Id", "1b")],
        vec![("Id", "3")],
    ]);

    let result = migrate(&repo, &sheet, &ledger_path, MigrationOptions::default()).await;
    assert!(matches!(result, Err(MigratorError::Validation { .. })));
    assert_eq!(repo.created().len(), 1);

    let ledger = ProcessedLedger::open_or_create(&ledger_path).unwrap();
    assert_eq!(ledger.len(), 1);
    assert!(ledger.contains("1"));
}

#[tokio::test]
async fn test_repeated_id_with_new_content_is_counted_as_conflict() {
    let temp_dir = TempDir::new().unwrap();
    let repo = FakeRepository::new();
    let sheet = sheet(vec![
        vec![("Id", "42"), ("Title", "Grow revenue")],
        vec![("Id", "42"), ("Title", "Grow revenue")],
        vec![("Id", "42"), ("Title", "Grow revenue fast")],
    ]);

    let summary = migrate(
        &repo,
        &sheet,
        &temp_dir.path().join("ledger.csv"),
        MigrationOptions {
            skip_processed: false,
        },
    )
    .await
    .unwrap();

    assert_eq!(summary.processed, 3);
    assert_eq!(summary.reused, 2);
    assert_eq!(summary.conflicts, 1);
    let created = repo.created();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].name.as_deref(), Some("Grow revenue"));
}
